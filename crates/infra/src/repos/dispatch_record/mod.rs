mod inmemory;
mod postgres;

pub use inmemory::InMemoryDispatchRecordRepo;
use lotus_booking_domain::{DispatchRecord, ReminderTier};
pub use postgres::PostgresDispatchRecordRepo;

/// The reminder idempotency ledger.
///
/// `reserve` is the at-most-once guarantee point of the whole
/// dispatcher: it must insert atomically and report whether this call
/// won the (event, tier) pair. Everything else is bookkeeping.
#[async_trait::async_trait]
pub trait IDispatchRecordRepo: Send + Sync {
    /// Insert-if-absent. Returns `false` when the pair was already
    /// reserved by an earlier or concurrent run.
    async fn reserve(&self, record: &DispatchRecord) -> anyhow::Result<bool>;
    async fn find_by_event(&self, event_id: &str) -> Vec<DispatchRecord>;
    /// Operator escape hatch: clearing an entry requeues that one
    /// reminder on the next eligible run.
    async fn delete(&self, event_id: &str, tier: ReminderTier) -> anyhow::Result<bool>;
    /// Reaps entries for events that are long past. Returns what was
    /// removed.
    async fn delete_all_before(&self, before: i64) -> Vec<DispatchRecord>;
}
