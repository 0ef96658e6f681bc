//! Image-to-calendar event extraction CLI
//!
//! Extract event fields from flyer/ticket photos and register them on a
//! Google calendar.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eventlens_calendar::{CalendarConfig, FileCredentialStore, GoogleCalendarClient};
use eventlens_core::timezone::{self, LOCAL_DATETIME_FORMAT};
use eventlens_core::RawImage;
use eventlens_extract::{ExtractorConfig, OpenAiClient, StructuredDateExtractor, VisionDescriber};
use eventlens_pipeline::EventPipeline;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "eventlens")]
#[command(about = "Extract calendar events from flyer and ticket photos")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract event fields from an image and print them as JSON
    Extract {
        /// Path to the image file
        #[arg(short, long)]
        image: PathBuf,
    },

    /// Create a calendar event from explicit fields
    Create {
        /// Event title
        #[arg(long)]
        title: String,

        /// Event description
        #[arg(long, default_value = "")]
        description: String,

        /// Local start time, "YYYY-MM-DD HH:MM:SS"
        #[arg(long)]
        start: String,

        /// Local end time; defaults to one hour after start
        #[arg(long)]
        end: Option<String>,
    },

    /// Extract an event from an image and register it in one step
    Register {
        /// Path to the image file
        #[arg(short, long)]
        image: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "eventlens_cli=info,eventlens_pipeline=info,eventlens_extract=info,eventlens_calendar=info",
                )
            }),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Extract { image } => extract(&image).await,
        Command::Create {
            title,
            description,
            start,
            end,
        } => create(&title, &description, &start, end.as_deref()).await,
        Command::Register { image } => register(&image).await,
    }
}

fn build_pipeline(config: &ExtractorConfig) -> Result<EventPipeline> {
    let model_client = Arc::new(OpenAiClient::new(config)?);

    let credentials_path = std::env::var("EVENTLENS_CREDENTIALS_PATH")
        .unwrap_or_else(|_| "credentials.json".to_string());
    let store = Arc::new(FileCredentialStore::new(credentials_path));
    let calendar = Arc::new(GoogleCalendarClient::new(CalendarConfig::from_env(), store)?);

    Ok(EventPipeline::new(
        VisionDescriber::new(model_client.clone()),
        StructuredDateExtractor::new(model_client, config)?,
        calendar,
    ))
}

fn load_image(path: &Path) -> Result<RawImage> {
    let data = std::fs::read(path)
        .with_context(|| format!("cannot read image file {}", path.display()))?;
    let mime_type = match path.extension().and_then(|e| e.to_str()) {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(RawImage::new(data, mime_type))
}

async fn extract(image_path: &Path) -> Result<()> {
    let config = ExtractorConfig::from_env();
    let pipeline = build_pipeline(&config)?;
    let image = load_image(image_path)?;

    info!("extracting event from {}", image_path.display());
    let event = pipeline.extract_event(&image).await?;

    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}

async fn create(title: &str, description: &str, start: &str, end: Option<&str>) -> Result<()> {
    let config = ExtractorConfig::from_env();
    let pipeline = build_pipeline(&config)?;

    let zone = timezone::local_zone(config.utc_offset_hours)
        .with_context(|| format!("invalid UTC offset: {} hours", config.utc_offset_hours))?;
    let start_local = timezone::parse_local_datetime(start, zone)
        .with_context(|| format!("start must match {LOCAL_DATETIME_FORMAT}"))?;
    let end_local = match end {
        Some(e) => timezone::parse_local_datetime(e, zone)
            .with_context(|| format!("end must match {LOCAL_DATETIME_FORMAT}"))?,
        None => start_local + chrono::Duration::hours(1),
    };

    let id = pipeline
        .create_calendar_event(title, description, start_local, end_local)
        .await?;

    println!("created calendar event {id}");
    Ok(())
}

async fn register(image_path: &Path) -> Result<()> {
    let config = ExtractorConfig::from_env();
    let pipeline = build_pipeline(&config)?;
    let image = load_image(image_path)?;

    info!("registering event from {}", image_path.display());
    let (event, id) = pipeline.extract_and_create_event(&image).await?;

    println!("{}", serde_json::to_string_pretty(&event)?);
    println!("created calendar event {id}");
    Ok(())
}
