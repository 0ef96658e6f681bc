//! Google Calendar REST client

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use eventlens_core::{EventId, EventLensError, Result, UtcEventRecord};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::CalendarConfig;
use crate::credentials::{CredentialStore, StoredCredentials};
use crate::service::CalendarService;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Event resource for the Calendar v3 insert endpoint
#[derive(Debug, Serialize)]
struct EventResource<'a> {
    summary: &'a str,
    description: &'a str,
    start: EventDateTime,
    end: EventDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
}

/// Date/time object in the Calendar API shape
#[derive(Debug, Serialize)]
struct EventDateTime {
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "timeZone")]
    time_zone: String,
}

impl EventDateTime {
    fn from_instant(instant: DateTime<Utc>, time_zone: &str) -> Self {
        Self {
            date_time: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_zone: time_zone.to_string(),
        }
    }
}

/// Created-event response (fields we use)
#[derive(Debug, Deserialize)]
struct CreatedEvent {
    id: String,
    #[serde(rename = "htmlLink")]
    html_link: Option<String>,
}

/// Token refresh response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// HTTP client for Google Calendar event insertion
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    store: Arc<dyn CredentialStore>,
    config: CalendarConfig,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Create a client over the given credential store.
    ///
    /// Credentials are loaded lazily at call time, so construction never
    /// touches the store. `GOOGLE_API_BASE` overrides the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: CalendarConfig, store: Arc<dyn CredentialStore>) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = env::var("GOOGLE_API_BASE")
            .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".to_string());

        Ok(Self {
            http_client,
            store,
            config,
            base_url,
        })
    }

    /// Current bearer token, refreshed and re-persisted when expired
    async fn access_token(&self) -> anyhow::Result<String> {
        let credentials = self.store.load()?;
        if !credentials.is_expired(Utc::now()) {
            return Ok(credentials.access_token);
        }

        let refresh_token = credentials
            .refresh_token
            .clone()
            .context("access token expired and no refresh token is stored")?;
        let client_id = self
            .config
            .client_id
            .as_deref()
            .context("access token expired and GOOGLE_CLIENT_ID is not configured")?;
        let client_secret = self
            .config
            .client_secret
            .as_deref()
            .context("access token expired and GOOGLE_CLIENT_SECRET is not configured")?;

        debug!("refreshing expired calendar access token");
        let response = self
            .http_client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()
            .await
            .context("Failed to send token refresh request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read token refresh response")?;
        if !status.is_success() {
            anyhow::bail!("Token refresh failed with status {status}: {body}");
        }

        let token: TokenResponse =
            serde_json::from_str(&body).context("Failed to parse token refresh response")?;

        let renewed = StoredCredentials {
            access_token: token.access_token.clone(),
            refresh_token: Some(refresh_token),
            expires_at: token.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        };
        self.store.save(&renewed)?;

        Ok(token.access_token)
    }

    async fn insert(
        &self,
        event: &UtcEventRecord,
        location: Option<&str>,
    ) -> anyhow::Result<EventId> {
        let token = self.access_token().await?;

        let body = EventResource {
            summary: &event.title,
            description: &event.description,
            start: EventDateTime::from_instant(event.start_time, &self.config.timezone_name),
            end: EventDateTime::from_instant(event.end_time, &self.config.timezone_name),
            location,
        };

        let response = self
            .http_client
            .post(format!(
                "{}/calendars/{}/events",
                self.base_url, self.config.calendar_id
            ))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .context("Failed to send calendar insert request")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read calendar insert response")?;

        if !status.is_success() {
            anyhow::bail!("Calendar API request failed with status {status}: {response_text}");
        }

        let created: CreatedEvent = serde_json::from_str(&response_text)
            .context("Failed to parse calendar insert response")?;

        info!(
            "created calendar event {} ({})",
            created.id,
            created.html_link.as_deref().unwrap_or("no link")
        );
        Ok(EventId::new(created.id))
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarClient {
    async fn create_event(
        &self,
        event: &UtcEventRecord,
        location: Option<&str>,
    ) -> Result<EventId> {
        self.insert(event, location)
            .await
            .map_err(|e| EventLensError::CalendarService(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_datetime_is_rfc3339_utc() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 20, 1, 0, 0).unwrap();
        let dt = EventDateTime::from_instant(instant, "Asia/Tokyo");
        assert_eq!(dt.date_time, "2024-03-20T01:00:00Z");
        assert_eq!(dt.time_zone, "Asia/Tokyo");
    }

    #[test]
    fn test_event_resource_serializes_to_calendar_shape() {
        let start = Utc.with_ymd_and_hms(2024, 3, 20, 1, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 20, 2, 0, 0).unwrap();

        let resource = EventResource {
            summary: "Weekly sync",
            description: "Meeting room A",
            start: EventDateTime::from_instant(start, "Asia/Tokyo"),
            end: EventDateTime::from_instant(end, "Asia/Tokyo"),
            location: None,
        };

        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["summary"], "Weekly sync");
        assert_eq!(value["start"]["dateTime"], "2024-03-20T01:00:00Z");
        assert_eq!(value["start"]["timeZone"], "Asia/Tokyo");
        assert_eq!(value["end"]["dateTime"], "2024-03-20T02:00:00Z");
        assert!(value.get("location").is_none());
    }

    #[test]
    fn test_event_resource_includes_location_when_present() {
        let start = Utc.with_ymd_and_hms(2024, 3, 20, 1, 0, 0).unwrap();
        let resource = EventResource {
            summary: "t",
            description: "d",
            start: EventDateTime::from_instant(start, "UTC"),
            end: EventDateTime::from_instant(start, "UTC"),
            location: Some("Meeting room A"),
        };

        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["location"], "Meeting room A");
    }

    #[test]
    fn test_created_event_parses_insert_response() {
        let created: CreatedEvent = serde_json::from_str(
            r#"{"id": "evt123", "htmlLink": "https://calendar.google.com/event?eid=abc", "status": "confirmed"}"#,
        )
        .unwrap();
        assert_eq!(created.id, "evt123");
        assert!(created.html_link.unwrap().contains("calendar.google.com"));
    }
}
