//! Block-by-block normalization and persistence.

pub mod gate;
pub mod normalize;
pub mod summary;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::geocode::Geocoder;
use crate::models::{EventRecord, RawEventBlock};
use crate::store::EventStore;

pub use gate::{DedupGate, GateOutcome};
pub use normalize::{resolve_link, BlockOutcome, Normalizer, PageContext, SkipReason};
pub use summary::{RunSummary, SkippedBlock};

/// Everything one page produced
#[derive(Debug, Default)]
pub struct PageReport {
    pub summary: RunSummary,
    /// Every record built from the page, stored or not
    pub records: Vec<EventRecord>,
}

/// Single sequential worker: normalize a block, pass it through the gate,
/// move on. One bad block never stops the page.
pub struct Engine {
    normalizer: Normalizer,
    gate: DedupGate,
    write_delay: Duration,
}

impl Engine {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        store: Arc<dyn EventStore>,
        write_delay: Duration,
    ) -> Self {
        Self {
            normalizer: Normalizer::new(geocoder),
            gate: DedupGate::new(store),
            write_delay,
        }
    }

    pub async fn process_page(
        &self,
        source: &str,
        blocks: &[RawEventBlock],
        page: &PageContext,
    ) -> PageReport {
        let mut report = PageReport::default();
        info!("[{}] Processing {} blocks", source, blocks.len());

        for (index, block) in blocks.iter().enumerate() {
            report.summary.blocks_seen += 1;

            let record = match self.normalizer.normalize(block, page).await {
                Ok(record) => record,
                Err(reason) => {
                    warn!("[{}] Skipped block {}: {}", source, index, reason);
                    report.summary.record_skip(source, index, reason);
                    continue;
                }
            };

            let outcome = self.gate.admit(&record).await;
            report.summary.record_gate(&outcome);

            if outcome == GateOutcome::Inserted {
                info!(
                    "[{}] Added: {} | {} ({}, {})",
                    source, record.title, record.venue_name, record.lat, record.lng
                );
                if !self.write_delay.is_zero() {
                    tokio::time::sleep(self.write_delay).await;
                }
            }

            report.records.push(record);
        }

        info!(
            "[{}] {} written, {} already stored, {} skipped",
            source,
            report.summary.written,
            report.summary.already_stored,
            report.summary.skipped.len()
        );
        report
    }
}
