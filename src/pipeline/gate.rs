use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::error::ScoutError;
use crate::models::EventRecord;
use crate::store::EventStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Inserted,
    AlreadyStored,
    Failed(String),
}

/// Check-then-insert in front of the store.
///
/// The two calls are not atomic: two concurrent runs can both see
/// `exists == false`. The store's unique constraint settles that race and
/// the loser is reported as `AlreadyStored`.
pub struct DedupGate {
    store: Arc<dyn EventStore>,
}

impl DedupGate {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn admit(&self, record: &EventRecord) -> GateOutcome {
        match self.store.exists(&record.ticket_url).await {
            Ok(true) => {
                debug!("Already stored: {}", record.ticket_url);
                return GateOutcome::AlreadyStored;
            }
            Ok(false) => {}
            Err(e) => {
                error!(
                    "{} lookup failed for {}: {}",
                    self.store.backend_name(),
                    record.ticket_url,
                    e
                );
                return GateOutcome::Failed(e.to_string());
            }
        }

        match self.store.insert(record).await {
            Ok(()) => GateOutcome::Inserted,
            Err(ScoutError::Duplicate(url)) => {
                warn!("Inserted concurrently by another writer: {}", url);
                GateOutcome::AlreadyStored
            }
            Err(e) => {
                error!(
                    "{} insert failed for '{}': {}",
                    self.store.backend_name(),
                    record.title,
                    e
                );
                GateOutcome::Failed(e.to_string())
            }
        }
    }
}
