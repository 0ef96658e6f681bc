//! End-to-end pipeline tests with scripted collaborators
//!
//! Every model and provider call is mocked; these tests pin the stage
//! ordering, the timezone normalization, and the no-partial-results
//! guarantees of the composed pipeline.

use anyhow::anyhow;
use async_trait::async_trait;
use eventlens_calendar::CalendarService;
use eventlens_core::{
    EncodedImage, EventId, EventLensError, RawImage, Result, UtcEventRecord,
};
use eventlens_extract::{
    ExtractorConfig, StructuredDateExtractor, TextModelClient, VisionDescriber, VisionModelClient,
};
use eventlens_pipeline::EventPipeline;
use serde_json::json;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

struct MockVision {
    description: anyhow::Result<String>,
    calls: AtomicU32,
}

impl MockVision {
    fn returning(description: &str) -> Arc<Self> {
        Arc::new(Self {
            description: Ok(description.to_string()),
            calls: AtomicU32::new(0),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            description: Err(anyhow!("{message}")),
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl VisionModelClient for MockVision {
    async fn describe_image(&self, _image: &EncodedImage, _prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.description {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(anyhow!("{e}")),
        }
    }
}

struct MockText {
    replies: Mutex<VecDeque<anyhow::Result<serde_json::Value>>>,
    calls: AtomicU32,
}

impl MockText {
    fn scripted(replies: Vec<anyhow::Result<serde_json::Value>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl TextModelClient for MockText {
    async fn complete_json(
        &self,
        _system_prompt: &str,
        _user_text: &str,
    ) -> anyhow::Result<serde_json::Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("script exhausted")))
    }
}

#[derive(Default)]
struct MockCalendar {
    created: Mutex<Vec<UtcEventRecord>>,
}

#[async_trait]
impl CalendarService for MockCalendar {
    async fn create_event(
        &self,
        event: &UtcEventRecord,
        _location: Option<&str>,
    ) -> Result<EventId> {
        self.created.lock().unwrap().push(event.clone());
        Ok(EventId::new("evt_mock_1"))
    }
}

fn png_image() -> RawImage {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 30, 30]));
    let mut buffer = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    RawImage::new(buffer.into_inner(), "image/png")
}

fn pipeline(
    vision: Arc<MockVision>,
    text: Arc<MockText>,
    calendar: Arc<MockCalendar>,
) -> EventPipeline {
    let config = ExtractorConfig::default();
    EventPipeline::new(
        VisionDescriber::new(vision),
        StructuredDateExtractor::new(text, &config).unwrap(),
        calendar,
    )
}

#[tokio::test]
async fn test_flyer_image_becomes_utc_calendar_event() {
    let vision = MockVision::returning("3月20日 10時から11時まで会議室Aで定例会議");
    let text = MockText::scripted(vec![Ok(json!({
        "title": "定例会議",
        "description": "会議室Aで開催される定例会議",
        "start_time": "2024-03-20 10:00:00",
        "end_time": "2024-03-20 11:00:00"
    }))]);
    let calendar = Arc::new(MockCalendar::default());

    let (event, id) = pipeline(vision, text, calendar.clone())
        .extract_and_create_event(&png_image())
        .await
        .unwrap();

    assert!(!event.title.is_empty());
    let start = event.start_time.unwrap();
    let end = event.end_time.unwrap();
    assert_eq!(start.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-20 10:00:00");
    assert_eq!(end.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-20 11:00:00");
    assert_eq!(id.as_str(), "evt_mock_1");

    let created = calendar.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].start_time.to_rfc3339(), "2024-03-20T01:00:00+00:00");
    assert_eq!(created[0].end_time.to_rfc3339(), "2024-03-20T02:00:00+00:00");
    assert_eq!(created[0].title, "定例会議");
}

#[tokio::test]
async fn test_malformed_replies_never_reach_the_calendar() {
    let vision = MockVision::returning("a flyer with a date");
    let text = MockText::scripted(vec![
        Err(anyhow!("reply was not JSON")),
        Err(anyhow!("reply was not JSON")),
        Err(anyhow!("reply was not JSON")),
    ]);
    let calendar = Arc::new(MockCalendar::default());

    let err = pipeline(vision, text.clone(), calendar.clone())
        .extract_and_create_event(&png_image())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EventLensError::DateExtraction { attempts: 3, .. }
    ));
    assert_eq!(text.calls.load(Ordering::SeqCst), 3);
    assert!(calendar.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_extract_event_returns_review_ready_fields() {
    let vision = MockVision::returning("Concert on July 1st, doors 18:30");
    let text = MockText::scripted(vec![Ok(json!({
        "title": "Concert",
        "description": "Doors open at 18:30",
        "start_time": "2024-07-01 18:30:00",
        "end_time": null
    }))]);
    let calendar = Arc::new(MockCalendar::default());

    let event = pipeline(vision, text, calendar.clone())
        .extract_event(&png_image())
        .await
        .unwrap();

    // end defaults to start + 1h; nothing is registered yet
    let start = event.start_time.unwrap();
    let end = event.end_time.unwrap();
    assert_eq!(end - start, chrono::Duration::hours(1));
    assert!(calendar.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_calendar_event_converts_reviewed_fields_to_utc() {
    let vision = MockVision::returning("unused");
    let text = MockText::scripted(vec![]);
    let calendar = Arc::new(MockCalendar::default());
    let pipeline = pipeline(vision, text, calendar.clone());

    let zone = eventlens_core::timezone::local_zone(9).unwrap();
    let start = eventlens_core::timezone::parse_local_datetime("2024-03-20 10:00:00", zone).unwrap();
    let end = eventlens_core::timezone::parse_local_datetime("2024-03-20 11:00:00", zone).unwrap();

    let id = pipeline
        .create_calendar_event("Edited title", "Edited description", start, end)
        .await
        .unwrap();

    assert_eq!(id.as_str(), "evt_mock_1");
    let created = calendar.created.lock().unwrap();
    assert_eq!(created[0].title, "Edited title");
    assert_eq!(created[0].start_time.to_rfc3339(), "2024-03-20T01:00:00+00:00");
}

#[tokio::test]
async fn test_undecodable_image_fails_before_any_model_call() {
    let vision = MockVision::returning("unused");
    let text = MockText::scripted(vec![]);
    let calendar = Arc::new(MockCalendar::default());

    let garbage = RawImage::new(vec![1, 2, 3], "image/jpeg");
    let err = pipeline(vision.clone(), text, calendar)
        .extract_event(&garbage)
        .await
        .unwrap_err();

    assert!(matches!(err, EventLensError::ImageProcessing(_)));
    assert_eq!(vision.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_vision_failure_is_terminal_and_skips_extraction() {
    let vision = MockVision::failing("service unavailable");
    let text = MockText::scripted(vec![]);
    let calendar = Arc::new(MockCalendar::default());

    let err = pipeline(vision, text.clone(), calendar)
        .extract_event(&png_image())
        .await
        .unwrap_err();

    assert!(matches!(err, EventLensError::VisionService(_)));
    assert_eq!(text.calls.load(Ordering::SeqCst), 0);
}
