//! # eventlens-pipeline
//!
//! The composed image-to-calendar pipeline:
//!
//! ```text
//! RawImage -> encode_jpeg -> VisionDescriber -> StructuredDateExtractor
//!          -> ExtractedEvent -> to_utc -> CalendarService
//! ```
//!
//! Each submission runs the stages strictly in order with no internal
//! parallelism; concurrent pipeline instances are fully independent, so
//! the hosting runtime may serve many at once without locking. All
//! collaborators are constructor-injected.
//!
//! ## Example
//!
//! ```no_run
//! use eventlens_calendar::{CalendarConfig, FileCredentialStore, GoogleCalendarClient};
//! use eventlens_core::RawImage;
//! use eventlens_extract::{ExtractorConfig, OpenAiClient, StructuredDateExtractor, VisionDescriber};
//! use eventlens_pipeline::EventPipeline;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ExtractorConfig::from_env();
//! let model_client = Arc::new(OpenAiClient::new(&config)?);
//! let store = Arc::new(FileCredentialStore::new("credentials.json"));
//! let calendar = Arc::new(GoogleCalendarClient::new(CalendarConfig::from_env(), store)?);
//!
//! let pipeline = EventPipeline::new(
//!     VisionDescriber::new(model_client.clone()),
//!     StructuredDateExtractor::new(model_client, &config)?,
//!     calendar,
//! );
//!
//! let image = RawImage::new(std::fs::read("flyer.png")?, "image/png");
//! let (event, id) = pipeline.extract_and_create_event(&image).await?;
//! println!("registered '{}' as {id}", event.title);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, FixedOffset};
use eventlens_calendar::CalendarService;
use eventlens_core::{EventId, ExtractedEvent, RawImage, Result};
use eventlens_extract::{encode_jpeg, StructuredDateExtractor, VisionDescriber};
use std::sync::Arc;
use tracing::info;

/// The composed extraction-and-registration pipeline.
pub struct EventPipeline {
    describer: VisionDescriber,
    extractor: StructuredDateExtractor,
    calendar: Arc<dyn CalendarService>,
}

impl EventPipeline {
    /// Compose a pipeline from its three stages
    #[must_use = "creates a pipeline that should be used"]
    pub fn new(
        describer: VisionDescriber,
        extractor: StructuredDateExtractor,
        calendar: Arc<dyn CalendarService>,
    ) -> Self {
        Self {
            describer,
            extractor,
            calendar,
        }
    }

    /// Extract validated event fields from an image.
    ///
    /// Runs encode → describe → extract. The result carries zone-attached
    /// local times ready for review or direct registration.
    ///
    /// # Errors
    ///
    /// Propagates the failing stage's error unchanged; no partial result
    /// is ever returned.
    pub async fn extract_event(&self, image: &RawImage) -> Result<ExtractedEvent> {
        let encoded = encode_jpeg(image)?;
        let description = self.describer.describe(&encoded).await?;
        info!("image described ({} chars)", description.len());
        self.extractor.extract(&description).await
    }

    /// Register an event from explicit local-time fields.
    ///
    /// This is the path taken after a human reviews or edits the extracted
    /// fields in a form.
    ///
    /// # Errors
    ///
    /// Returns a timezone-conversion error on a malformed event value, or
    /// the provider's failure unchanged.
    pub async fn create_calendar_event(
        &self,
        title: &str,
        description: &str,
        start_local: DateTime<FixedOffset>,
        end_local: DateTime<FixedOffset>,
    ) -> Result<EventId> {
        let event = ExtractedEvent {
            title: title.to_string(),
            description: description.to_string(),
            start_time: Some(start_local),
            end_time: Some(end_local),
        };
        let record = event.to_utc()?;
        self.calendar.create_event(&record, None).await
    }

    /// Extract an event from an image and register it in one step.
    ///
    /// # Errors
    ///
    /// Fails before touching the calendar provider if extraction fails.
    pub async fn extract_and_create_event(
        &self,
        image: &RawImage,
    ) -> Result<(ExtractedEvent, EventId)> {
        let event = self.extract_event(image).await?;
        let record = event.to_utc()?;
        let id = self.calendar.create_event(&record, None).await?;
        info!("registered '{}' as calendar event {id}", event.title);
        Ok((event, id))
    }
}
