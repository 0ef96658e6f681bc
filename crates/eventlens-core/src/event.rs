//! Event data model for the extraction pipeline
//!
//! Values flow through the pipeline in this order:
//!
//! - [`RawImage`] - caller-supplied image bytes with a declared MIME type
//! - [`EncodedImage`] - canonical JPEG produced by the encoder
//! - [`ExtractedEvent`] - validated fields with zone-attached local times
//! - [`UtcEventRecord`] - the committed form handed to the calendar provider
//!
//! Each stage owns its output exclusively until handing it to the next
//! stage; nothing here is shared or mutated across pipeline instances.

use crate::error::{EventLensError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Opaque binary image payload with a declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    /// Raw image bytes as uploaded
    pub data: Vec<u8>,
    /// Declared MIME type (e.g. "image/png"); informational only, the
    /// encoder sniffs the actual format from the bytes
    pub mime_type: String,
}

impl RawImage {
    /// Create a raw image from bytes and a declared MIME type
    #[inline]
    #[must_use = "creates a raw image payload"]
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }
}

/// Canonical JPEG encoding of an input image, ready for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(Vec<u8>);

impl EncodedImage {
    /// Wrap already-encoded JPEG bytes
    #[inline]
    #[must_use = "creates an encoded image wrapper"]
    pub fn new(jpeg: Vec<u8>) -> Self {
        Self(jpeg)
    }

    /// JPEG bytes for transport
    #[inline]
    #[must_use = "returns the encoded JPEG bytes"]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encoded size in bytes
    #[inline]
    #[must_use = "returns the encoded size"]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the encoding is empty
    #[inline]
    #[must_use = "returns whether the encoding is empty"]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Structured event fields extracted from an image description.
///
/// Times are wall-clock values in the fixed local zone, attached as a
/// `FixedOffset` at parse time. A successful extraction always carries both
/// times; both-absent only appears in hand-built values (e.g. form input
/// before the user picks a date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEvent {
    /// Event title; never empty, falls back to a generic placeholder
    pub title: String,
    /// Free-text event description
    pub description: String,
    /// Local start time, if a date was found
    pub start_time: Option<DateTime<FixedOffset>>,
    /// Local end time; defaulted to start + 1 hour when the source names none
    pub end_time: Option<DateTime<FixedOffset>>,
}

impl ExtractedEvent {
    /// Convert local times to an absolute UTC record for the calendar
    /// provider.
    ///
    /// Pure function of the event value: calling it twice yields identical
    /// records.
    ///
    /// # Errors
    ///
    /// Returns [`EventLensError::TimezoneConversion`] when either time is
    /// absent. The extractor never returns such an event, so hitting this
    /// from pipeline code is a contract violation, not a user-facing error.
    pub fn to_utc(&self) -> Result<UtcEventRecord> {
        let start = self.start_time.ok_or_else(|| {
            EventLensError::TimezoneConversion("start_time absent in extracted event".to_string())
        })?;
        let end = self.end_time.ok_or_else(|| {
            EventLensError::TimezoneConversion("end_time absent in extracted event".to_string())
        })?;

        Ok(UtcEventRecord {
            title: self.title.clone(),
            description: self.description.clone(),
            start_time: start.with_timezone(&Utc),
            end_time: end.with_timezone(&Utc),
        })
    }
}

/// The committed event form: same fields as [`ExtractedEvent`] with times
/// normalized to absolute UTC instants.
///
/// Built immediately before handoff to the calendar provider and never
/// stored by this pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcEventRecord {
    /// Event title
    pub title: String,
    /// Free-text event description
    pub description: String,
    /// Absolute start instant
    pub start_time: DateTime<Utc>,
    /// Absolute end instant
    pub end_time: DateTime<Utc>,
}

/// Provider-assigned identifier of a created calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Wrap a provider-assigned id
    #[inline]
    #[must_use = "creates an event id wrapper"]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice
    #[inline]
    #[must_use = "returns the id string"]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
