//! # eventlens-extract
//!
//! The extraction stages of the eventlens pipeline: canonical JPEG
//! re-encoding, free-text image description through a vision-capable
//! model, and JSON-constrained structuring of date/time fields with a
//! bounded retry loop.
//!
//! ## Two Model Calls, Not One
//!
//! Description and date structuring are deliberately separate calls.
//! Asking a single call to both describe an image and emit strict JSON
//! proved brittle; splitting lets the second call run in JSON mode while
//! the first stays free-text.
//!
//! ## Example
//!
//! ```no_run
//! use eventlens_core::RawImage;
//! use eventlens_extract::{
//!     encode_jpeg, ExtractorConfig, OpenAiClient, StructuredDateExtractor, VisionDescriber,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ExtractorConfig::from_env();
//! let client = Arc::new(OpenAiClient::new(&config)?);
//!
//! let describer = VisionDescriber::new(client.clone());
//! let extractor = StructuredDateExtractor::new(client, &config)?;
//!
//! let image = RawImage::new(std::fs::read("flyer.png")?, "image/png");
//! let encoded = encode_jpeg(&image)?;
//! let description = describer.describe(&encoded).await?;
//! let event = extractor.extract(&description).await?;
//!
//! println!("{}: {:?} - {:?}", event.title, event.start_time, event.end_time);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`client`] - collaborator traits and the `OpenAI` implementation
//! - [`config`] - env-driven extraction configuration
//! - [`encoder`] - JPEG re-encoding of arbitrary input images
//! - [`describe`] - free-text vision description
//! - [`extract`] - the retry-until-valid structured date extractor

pub mod client;
pub mod config;
pub mod describe;
pub mod encoder;
pub mod extract;

pub use client::{OpenAiClient, TextModelClient, VisionModelClient};
pub use config::ExtractorConfig;
pub use describe::VisionDescriber;
pub use encoder::encode_jpeg;
pub use extract::StructuredDateExtractor;
