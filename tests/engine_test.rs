use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use url::Url;

use event_radar::extract::PRICE_NOT_LISTED;
use event_radar::geocode::Geocoder;
use event_radar::pipeline::{DedupGate, Engine, GateOutcome, PageContext, SkipReason};
use event_radar::store::{EventStore, InMemoryStore};
use event_radar::{Category, CategoryHint, Coordinates, EventRecord, RawEventBlock, ScoutError};

const ZORLU: Coordinates = Coordinates {
    lat: 41.0677,
    lng: 29.0128,
};

/// Knows a single venue and counts lookups
#[derive(Default)]
struct OneVenueGeocoder {
    calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for OneVenueGeocoder {
    async fn lookup(&self, query: &str) -> event_radar::Result<Option<Coordinates>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((query == "Zorlu PSM").then_some(ZORLU))
    }

    fn provider_name(&self) -> &'static str {
        "one-venue"
    }
}

/// Wraps the in-memory store and records every call the gate makes
#[derive(Default)]
struct RecordingStore {
    inner: InMemoryStore,
    existing: Vec<String>,
    fail_inserts: bool,
    report_duplicate_on_insert: bool,
    inserts: Mutex<Vec<String>>,
}

#[async_trait]
impl EventStore for RecordingStore {
    async fn exists(&self, ticket_url: &str) -> event_radar::Result<bool> {
        if self.existing.iter().any(|u| u == ticket_url) {
            return Ok(true);
        }
        if self.report_duplicate_on_insert {
            return Ok(false);
        }
        self.inner.exists(ticket_url).await
    }

    async fn insert(&self, record: &EventRecord) -> event_radar::Result<()> {
        self.inserts.lock().unwrap().push(record.ticket_url.clone());
        if self.fail_inserts {
            return Err(ScoutError::Store {
                status: 500,
                message: "internal error".to_string(),
            });
        }
        if self.report_duplicate_on_insert {
            return Err(ScoutError::Duplicate(record.ticket_url.clone()));
        }
        self.inner.insert(record).await
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn page() -> PageContext {
    PageContext {
        base: Url::parse("https://www.example.com").unwrap(),
        now: now(),
    }
}

fn kalhor_block() -> RawEventBlock {
    RawEventBlock::new(
        "Kayhan Kalhor & Erdal Erzincan\nZorlu PSM\n20 Kasım 2025 21:00\n350 TL",
        Some("/istanbul/etkinlik/x".to_string()),
        CategoryHint::Fixed(Category::Music),
    )
    .with_image("/images/kalhor.jpg")
}

fn engine_with(store: Arc<dyn EventStore>) -> (Engine, Arc<OneVenueGeocoder>) {
    let geocoder = Arc::new(OneVenueGeocoder::default());
    let engine = Engine::new(geocoder.clone(), store, Duration::ZERO);
    (engine, geocoder)
}

#[tokio::test]
async fn end_to_end_card_becomes_draft_record() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let (engine, _) = engine_with(store.clone());

    let report = engine
        .process_page("example", &[kalhor_block()], &page())
        .await;

    assert_eq!(report.summary.written, 1);
    let stored = store.records();
    assert_eq!(stored.len(), 1);

    let record = &stored[0];
    assert_eq!(record.title, "Kayhan Kalhor & Erdal Erzincan");
    assert_eq!(record.venue_name, "Zorlu PSM");
    assert_eq!(record.address, "Zorlu PSM");
    assert_eq!(record.description, "Zorlu PSM mekanında gerçekleşecek.");
    assert_eq!(record.category, Category::Music);
    assert_eq!(record.price, "350 TL");
    assert_eq!(
        record.start_time,
        NaiveDate::from_ymd_opt(2025, 11, 20)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap()
    );
    assert_eq!(record.ticket_url, "https://www.example.com/istanbul/etkinlik/x");
    assert_eq!(record.image_url, "https://www.example.com/images/kalhor.jpg");
    assert_eq!((record.lat, record.lng), (ZORLU.lat, ZORLU.lng));
    assert!(!record.is_approved);
    assert!(!record.sold_out);
    Ok(())
}

#[tokio::test]
async fn serialized_record_matches_table_shape() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let (engine, _) = engine_with(store.clone());
    engine
        .process_page("example", &[kalhor_block()], &page())
        .await;

    let json = serde_json::to_value(&store.records()[0])?;
    assert_eq!(json["start_time"], "2025-11-20T21:00:00");
    assert_eq!(json["category"], "Müzik");
    assert_eq!(json["is_approved"], false);

    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "address",
            "category",
            "description",
            "image_url",
            "is_approved",
            "lat",
            "lng",
            "price",
            "sold_out",
            "start_time",
            "ticket_url",
            "title",
            "venue_name"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn blocks_without_link_produce_no_record_and_no_lookup() {
    let store = Arc::new(InMemoryStore::new());
    let (engine, geocoder) = engine_with(store.clone());

    let block = RawEventBlock::new(
        "Kayhan Kalhor\nZorlu PSM\n350 TL",
        None,
        CategoryHint::Fixed(Category::Music),
    );
    let report = engine.process_page("example", &[block], &page()).await;

    assert!(store.is_empty());
    assert!(report.records.is_empty());
    assert_eq!(report.summary.skipped.len(), 1);
    assert_eq!(report.summary.skipped[0].reason, SkipReason::MissingTicketLink);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blank_text_is_skipped_but_batch_continues() {
    let store = Arc::new(InMemoryStore::new());
    let (engine, _) = engine_with(store.clone());

    let blocks = vec![
        RawEventBlock::new(
            "  \n\t ",
            Some("/istanbul/etkinlik/bos".to_string()),
            CategoryHint::Detect,
        ),
        kalhor_block(),
    ];
    let report = engine.process_page("example", &blocks, &page()).await;

    assert_eq!(report.summary.blocks_seen, 2);
    assert_eq!(report.summary.written, 1);
    assert_eq!(report.summary.skipped[0].index, 0);
    assert_eq!(report.summary.skipped[0].reason, SkipReason::InsufficientText);
}

#[tokio::test]
async fn degraded_fields_get_documented_defaults() {
    let store = Arc::new(InMemoryStore::new());
    let (engine, geocoder) = engine_with(store.clone());

    let block = RawEventBlock::new(
        "Gizemli Gece Konser",
        Some("https://www.example.com/etkinlik/gizem".to_string()),
        CategoryHint::Detect,
    );
    engine.process_page("example", &[block], &page()).await;

    let record = &store.records()[0];
    assert_eq!(record.venue_name, "Unknown");
    assert_eq!(record.price, PRICE_NOT_LISTED);
    assert_eq!(record.category, Category::Music);
    assert_eq!(record.image_url, "");
    assert_eq!((record.lat, record.lng), (41.0082, 28.9784));
    assert_eq!(
        record.start_time,
        NaiveDate::from_ymd_opt(2025, 11, 2)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap()
    );
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn gate_never_inserts_a_known_ticket_url() {
    let store = Arc::new(RecordingStore {
        existing: vec!["https://x/e1".to_string()],
        ..RecordingStore::default()
    });
    let (engine, _) = engine_with(store.clone());

    let block = RawEventBlock::new(
        "Duman\nKüçükÇiftlik Park\n750 TL",
        Some("https://x/e1".to_string()),
        CategoryHint::Fixed(Category::Music),
    );
    let report = engine.process_page("example", &[block], &page()).await;

    assert_eq!(report.summary.already_stored, 1);
    assert_eq!(report.summary.written, 0);
    assert!(store.inserts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn second_run_inserts_nothing_new() {
    let store = Arc::new(InMemoryStore::new());
    let (engine, _) = engine_with(store.clone());

    let blocks = vec![
        kalhor_block(),
        RawEventBlock::new(
            "Duman\nKüçükÇiftlik Park\n6 Eylül 21:00\n750 TL",
            Some("/istanbul/etkinlik/duman".to_string()),
            CategoryHint::Fixed(Category::Music),
        ),
        // Same link as the first block, seen again on the same page
        kalhor_block(),
    ];

    let first = engine.process_page("example", &blocks, &page()).await;
    assert_eq!(first.summary.written, 2);
    assert_eq!(first.summary.already_stored, 1);

    let second = engine.process_page("example", &blocks, &page()).await;
    assert_eq!(second.summary.written, 0);
    assert_eq!(second.summary.already_stored, 3);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn insert_failures_are_counted_not_fatal() {
    let store = Arc::new(RecordingStore {
        fail_inserts: true,
        ..RecordingStore::default()
    });
    let (engine, _) = engine_with(store.clone());

    let blocks = vec![
        kalhor_block(),
        RawEventBlock::new(
            "Duman\nKüçükÇiftlik Park",
            Some("/istanbul/etkinlik/duman".to_string()),
            CategoryHint::Fixed(Category::Music),
        ),
    ];
    let report = engine.process_page("example", &blocks, &page()).await;

    assert_eq!(report.summary.failed_writes, 2);
    assert_eq!(store.inserts.lock().unwrap().len(), 2);
    assert_eq!(report.records.len(), 2);
}

#[tokio::test]
async fn uniqueness_violation_counts_as_already_stored() {
    let store = Arc::new(RecordingStore {
        report_duplicate_on_insert: true,
        ..RecordingStore::default()
    });
    let gate = DedupGate::new(store.clone());

    let store_for_records = Arc::new(InMemoryStore::new());
    let (engine, _) = engine_with(store_for_records.clone());
    engine
        .process_page("example", &[kalhor_block()], &page())
        .await;
    let record = store_for_records.records().remove(0);

    assert_eq!(gate.admit(&record).await, GateOutcome::AlreadyStored);
    assert_eq!(store.inserts.lock().unwrap().len(), 1);
}
