pub mod memory;
pub mod supabase;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::EventRecord;

pub use memory::InMemoryStore;
pub use supabase::SupabaseStore;

/// Persistence contract for draft events, keyed on `ticket_url`.
///
/// Implementations must enforce `ticket_url` uniqueness themselves and
/// report a violation as `ScoutError::Duplicate`; callers only use
/// `exists` to avoid pointless writes.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn exists(&self, ticket_url: &str) -> Result<bool>;

    async fn insert(&self, record: &EventRecord) -> Result<()>;

    /// Get the name of the store backend
    fn backend_name(&self) -> &'static str;
}
