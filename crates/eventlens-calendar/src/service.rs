//! Calendar provider interface

use async_trait::async_trait;
use eventlens_core::{EventId, Result, UtcEventRecord};

/// Calendar provider operations consumed by the pipeline.
///
/// The pipeline treats any provider failure (expired auth, quota, invalid
/// payload) as opaque and surfaces it unchanged as
/// [`eventlens_core::EventLensError::CalendarService`].
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Insert an event and return the provider-assigned id.
    async fn create_event(
        &self,
        event: &UtcEventRecord,
        location: Option<&str>,
    ) -> Result<EventId>;
}
