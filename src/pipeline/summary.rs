use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::pipeline::gate::GateOutcome;
use crate::pipeline::normalize::SkipReason;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedBlock {
    pub source: String,
    pub index: usize,
    pub reason: SkipReason,
}

/// Counts for one run, across every page processed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub blocks_seen: usize,
    pub written: usize,
    pub already_stored: usize,
    pub failed_writes: usize,
    pub failed_pages: Vec<String>,
    pub skipped: Vec<SkippedBlock>,
}

impl RunSummary {
    pub fn record_skip(&mut self, source: &str, index: usize, reason: SkipReason) {
        self.skipped.push(SkippedBlock {
            source: source.to_string(),
            index,
            reason,
        });
    }

    pub fn record_gate(&mut self, outcome: &GateOutcome) {
        match outcome {
            GateOutcome::Inserted => self.written += 1,
            GateOutcome::AlreadyStored => self.already_stored += 1,
            GateOutcome::Failed(_) => self.failed_writes += 1,
        }
    }

    pub fn record_page_failure(&mut self, source: &str) {
        self.failed_pages.push(source.to_string());
    }

    pub fn merge(&mut self, other: RunSummary) {
        self.blocks_seen += other.blocks_seen;
        self.written += other.written;
        self.already_stored += other.already_stored;
        self.failed_writes += other.failed_writes;
        self.failed_pages.extend(other.failed_pages);
        self.skipped.extend(other.skipped);
    }

    /// Skip counts grouped by reason kind
    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for skipped in &self.skipped {
            let kind = match skipped.reason {
                SkipReason::MissingTicketLink => "missing_ticket_link",
                SkipReason::UnresolvableLink { .. } => "unresolvable_link",
                SkipReason::InsufficientText => "insufficient_text",
            };
            *counts.entry(kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn log(&self) {
        info!(
            "Run finished: {} written, {} already stored, {} failed writes, {} skipped of {} blocks",
            self.written,
            self.already_stored,
            self.failed_writes,
            self.skipped.len(),
            self.blocks_seen
        );
        for (kind, count) in self.skip_counts() {
            info!("  skipped ({}): {}", kind, count);
        }
        if !self.failed_pages.is_empty() {
            warn!("Pages that could not be fetched: {}", self.failed_pages.join(", "));
        }
    }
}
