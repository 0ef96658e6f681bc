//! Free-text description of an image via a vision-capable model

use eventlens_core::{EncodedImage, EventLensError, Result};
use std::sync::Arc;
use tracing::debug;

use crate::client::VisionModelClient;

/// Prompt sent alongside the image.
///
/// Deliberately free-text: constraining the same call to both describe the
/// image and emit valid JSON proved brittle, so date structuring happens in
/// a second, JSON-constrained call over this description.
const DESCRIBE_PROMPT: &str = "Describe the text and contents of this image in detail. \
     If the image contains any date or time information, include it exactly as written.";

/// Turns an encoded image into a natural-language description.
pub struct VisionDescriber {
    client: Arc<dyn VisionModelClient>,
}

impl VisionDescriber {
    /// Create a describer backed by the given model client
    #[must_use = "creates a describer that should be used"]
    pub fn new(client: Arc<dyn VisionModelClient>) -> Self {
        Self { client }
    }

    /// Describe the image contents in free text.
    ///
    /// One outbound model call, no retry at this layer: transient failures
    /// here are rare and should surface immediately rather than be masked
    /// (the retry budget belongs to the date extractor).
    ///
    /// # Errors
    ///
    /// Returns [`EventLensError::VisionService`] on transport failure,
    /// non-2xx response, or an empty model reply.
    pub async fn describe(&self, image: &EncodedImage) -> Result<String> {
        let text = self
            .client
            .describe_image(image, DESCRIBE_PROMPT)
            .await
            .map_err(|e| EventLensError::VisionService(format!("{e:#}")))?;

        if text.trim().is_empty() {
            return Err(EventLensError::VisionService(
                "model returned an empty description".to_string(),
            ));
        }

        debug!(chars = text.len(), "vision model described image");
        Ok(text)
    }
}
