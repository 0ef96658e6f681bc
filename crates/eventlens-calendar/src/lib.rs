//! # eventlens-calendar
//!
//! Calendar provider interface for the eventlens pipeline plus a Google
//! Calendar implementation.
//!
//! The pipeline depends only on the [`CalendarService`] trait; the concrete
//! [`GoogleCalendarClient`] inserts events through the Calendar v3 REST API
//! using bearer tokens from an injected [`CredentialStore`]. Tokens are
//! refreshed against the Google OAuth endpoint when expired; the
//! interactive consent flow that mints them in the first place is out of
//! scope here.
//!
//! ## Example
//!
//! ```no_run
//! use eventlens_calendar::{CalendarConfig, CalendarService, FileCredentialStore, GoogleCalendarClient};
//! use std::sync::Arc;
//!
//! # async fn example(record: eventlens_core::UtcEventRecord) -> anyhow::Result<()> {
//! let store = Arc::new(FileCredentialStore::new("credentials.json"));
//! let client = GoogleCalendarClient::new(CalendarConfig::from_env(), store)?;
//!
//! let id = client.create_event(&record, None).await?;
//! println!("created {id}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod google;
pub mod service;

pub use config::CalendarConfig;
pub use credentials::{CredentialStore, FileCredentialStore, StoredCredentials};
pub use google::GoogleCalendarClient;
pub use service::CalendarService;
