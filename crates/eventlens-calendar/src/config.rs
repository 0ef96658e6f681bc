//! Configuration for the calendar provider client

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for Google Calendar event insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Target calendar (default: "primary")
    pub calendar_id: String,

    /// IANA timezone label attached to event payloads
    ///
    /// Instants are sent as UTC; this label only controls how the provider
    /// displays them.
    pub timezone_name: String,

    /// OAuth client id, required for token refresh
    pub client_id: Option<String>,

    /// OAuth client secret, required for token refresh
    pub client_secret: Option<String>,
}

impl CalendarConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `EVENTLENS_CALENDAR_ID`: target calendar (default: "primary")
    /// - `EVENTLENS_CALENDAR_TIMEZONE`: payload timezone label (default: "Asia/Tokyo")
    /// - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET`: OAuth client for refresh
    #[must_use = "creates config from environment variables"]
    pub fn from_env() -> Self {
        Self {
            calendar_id: env::var("EVENTLENS_CALENDAR_ID")
                .unwrap_or_else(|_| "primary".to_string()),
            timezone_name: env::var("EVENTLENS_CALENDAR_TIMEZONE")
                .unwrap_or_else(|_| "Asia/Tokyo".to_string()),
            client_id: env::var("GOOGLE_CLIENT_ID").ok(),
            client_secret: env::var("GOOGLE_CLIENT_SECRET").ok(),
        }
    }
}

impl Default for CalendarConfig {
    #[inline]
    fn default() -> Self {
        Self {
            calendar_id: "primary".to_string(),
            timezone_name: "Asia/Tokyo".to_string(),
            client_id: None,
            client_secret: None,
        }
    }
}
