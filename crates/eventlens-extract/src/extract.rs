//! JSON-constrained extraction of event fields from free text
//!
//! This is the hard stage of the pipeline. The model is non-deterministic
//! and only guaranteed to return syntactically valid JSON, so every reply
//! goes through parse + validate + timezone attachment, and any failure
//! burns one attempt out of a fixed budget of three. A retry repeats the
//! full request rather than patching a partial result; a later attempt can
//! succeed where an earlier one did not.

use anyhow::Context;
use chrono::{DateTime, Duration, FixedOffset};
use eventlens_core::timezone::{self, LOCAL_DATETIME_FORMAT};
use eventlens_core::{EventLensError, ExtractedEvent, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::TextModelClient;
use crate::config::ExtractorConfig;

/// Total attempts against the model, including the first
const MAX_ATTEMPTS: u32 = 3;

/// Fallback title when the model provides none
const DEFAULT_TITLE: &str = "Untitled Event";

/// Wire shape of the model's JSON reply
#[derive(Debug, Deserialize)]
struct EventJson {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
}

fn system_prompt(zone: FixedOffset) -> String {
    format!(
        r#"You extract calendar event details from a text description of an image.

Return a JSON object with exactly these keys:
  "title": short event title as a string, or null if none can be determined
  "description": one or two sentence summary of the event
  "start_time": event start as "YYYY-MM-DD HH:MM:SS", or null if the text contains no date
  "end_time": event end as "YYYY-MM-DD HH:MM:SS", or null if the text names no end time

Rules:
- Interpret every date and time as local time in UTC{zone}.
- A date without a time of day means midnight (00:00:00).
- If an end time is missing but a start time exists, use the start time plus one hour.
- If the year is not stated, use the most plausible upcoming year.
- Return ONLY the JSON object, no markdown and no explanation."#
    )
}

/// Extracts validated, zone-attached event fields from a description.
pub struct StructuredDateExtractor {
    client: Arc<dyn TextModelClient>,
    zone: FixedOffset,
}

impl StructuredDateExtractor {
    /// Create an extractor interpreting times at the configured offset.
    ///
    /// # Errors
    ///
    /// Returns [`EventLensError::TimezoneConversion`] when the configured
    /// offset is outside the representable range.
    pub fn new(client: Arc<dyn TextModelClient>, config: &ExtractorConfig) -> Result<Self> {
        let zone = timezone::local_zone(config.utc_offset_hours).ok_or_else(|| {
            EventLensError::TimezoneConversion(format!(
                "invalid UTC offset: {} hours",
                config.utc_offset_hours
            ))
        })?;
        Ok(Self { client, zone })
    }

    /// Extract event fields from free text, retrying until valid.
    ///
    /// Up to [`MAX_ATTEMPTS`] full request/parse/validate cycles. Text with
    /// no date signal at all is expected input, not a bug: it still burns
    /// the whole budget (a non-deterministic model may find something on a
    /// later pass) and then fails explicitly instead of guessing a time.
    ///
    /// # Errors
    ///
    /// Returns [`EventLensError::DateExtraction`] carrying the attempt
    /// count once the budget is exhausted. Intermediate failures stay
    /// internal and are only logged.
    pub async fn extract(&self, description: &str) -> Result<ExtractedEvent> {
        let prompt = system_prompt(self.zone);
        let mut last_failure = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(&prompt, description).await {
                Ok(event) => {
                    debug!("structured extraction succeeded on attempt {attempt}");
                    return Ok(event);
                }
                Err(e) => {
                    warn!("extraction attempt {attempt} failed: {e:#}");
                    last_failure = format!("{e:#}");
                }
            }
        }

        Err(EventLensError::date_extraction(MAX_ATTEMPTS, last_failure))
    }

    /// One full request/parse/validate cycle
    async fn attempt(&self, prompt: &str, description: &str) -> anyhow::Result<ExtractedEvent> {
        let reply = self.client.complete_json(prompt, description).await?;
        self.validate(reply)
    }

    /// Validate a model reply into a terminal event state.
    ///
    /// Terminal success requires a parseable `start_time`; a null
    /// `end_time` is normalized to start + 1 hour. A null `start_time`
    /// (with or without an end) is a failed attempt.
    fn validate(&self, reply: serde_json::Value) -> anyhow::Result<ExtractedEvent> {
        let raw: EventJson =
            serde_json::from_value(reply).context("reply keys do not match the event schema")?;

        let start = self.parse_field(raw.start_time.as_deref(), "start_time")?;
        let end = self.parse_field(raw.end_time.as_deref(), "end_time")?;

        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, start + Duration::hours(1)),
            (None, Some(_)) => anyhow::bail!("end_time present without start_time"),
            (None, None) => anyhow::bail!("no date or time found in the description"),
        };

        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Ok(ExtractedEvent {
            title,
            description: raw.description.unwrap_or_default(),
            start_time: Some(start),
            end_time: Some(end),
        })
    }

    fn parse_field(
        &self,
        value: Option<&str>,
        field: &str,
    ) -> anyhow::Result<Option<DateTime<FixedOffset>>> {
        match value {
            None => Ok(None),
            Some(s) => {
                let parsed = timezone::parse_local_datetime(s, self.zone).with_context(|| {
                    format!("{field} '{s}' does not match {LOCAL_DATETIME_FORMAT}")
                })?;
                Ok(Some(parsed))
            }
        }
    }
}
