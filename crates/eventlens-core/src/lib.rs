//! # eventlens-core
//!
//! Core data model for the eventlens extraction pipeline: turning a
//! photograph of a flyer, ticket, or notice into a validated,
//! timezone-correct calendar event record.
//!
//! ## Pipeline Position
//!
//! ```text
//! image -> encoder -> vision model -> text -> date extractor -> ExtractedEvent
//!                                                                   |
//!                                                          to_utc() v
//!                                                           UtcEventRecord -> calendar provider
//! ```
//!
//! This crate holds the values that cross those stage boundaries plus the
//! shared error enum and the fixed-timezone rules. The stages themselves
//! live in `eventlens-extract`, `eventlens-calendar`, and
//! `eventlens-pipeline`.
//!
//! ## Timezone Model
//!
//! Extracted wall-clock times carry a fixed UTC offset (default +9) from
//! the moment they are parsed; [`ExtractedEvent::to_utc`] converts them to
//! absolute instants right before the calendar handoff. There is no DST
//! handling and no zone database lookup.

pub mod error;
pub mod event;
pub mod timezone;

pub use error::{EventLensError, Result};
pub use event::{EncodedImage, EventId, ExtractedEvent, RawImage, UtcEventRecord};
