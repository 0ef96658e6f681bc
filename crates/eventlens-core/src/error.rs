//! Error types for event extraction and calendar registration

use thiserror::Error;

/// Result type alias for eventlens operations
pub type Result<T> = std::result::Result<T, EventLensError>;

/// Error type shared across the extraction pipeline and its collaborators.
///
/// Every variant is terminal for the current request. The only internal
/// recovery anywhere in the pipeline is the bounded retry loop inside the
/// structured date extractor; once an error reaches the caller it carries
/// enough detail (kind + message) to display to an end user.
#[derive(Error, Debug)]
pub enum EventLensError {
    /// Input image could not be decoded or re-encoded to JPEG
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// Vision model call failed (transport, non-2xx, or malformed response)
    #[error("Vision service error: {0}")]
    VisionService(String),

    /// No valid structured date after exhausting the retry budget
    #[error("Date extraction failed after {attempts} attempts: {message}")]
    DateExtraction {
        /// Total attempts made against the model
        attempts: u32,
        /// Failure from the last attempt
        message: String,
    },

    /// A required time field was absent at UTC conversion
    ///
    /// Unreachable when the extractor's success condition was honored;
    /// seeing this variant means a programming-contract violation upstream.
    #[error("Timezone conversion error: {0}")]
    TimezoneConversion(String),

    /// Opaque failure reported by the calendar provider
    #[error("Calendar service error: {0}")]
    CalendarService(String),
}

impl EventLensError {
    /// Create a date extraction error after `attempts` failed attempts
    #[inline]
    #[must_use = "returns EventLensError for an exhausted retry budget"]
    pub fn date_extraction(attempts: u32, message: impl Into<String>) -> Self {
        Self::DateExtraction {
            attempts,
            message: message.into(),
        }
    }
}
