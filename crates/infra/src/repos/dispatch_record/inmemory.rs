use super::IDispatchRecordRepo;
use lotus_booking_domain::{DispatchRecord, ReminderTier};
use std::sync::Mutex;

/// Single process ledger. The mutex around the whole vector is what
/// makes `reserve` atomic here.
pub struct InMemoryDispatchRecordRepo {
    records: Mutex<Vec<DispatchRecord>>,
}

impl InMemoryDispatchRecordRepo {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IDispatchRecordRepo for InMemoryDispatchRecordRepo {
    async fn reserve(&self, record: &DispatchRecord) -> anyhow::Result<bool> {
        let mut records = self.records.lock().unwrap();
        let taken = records
            .iter()
            .any(|r| r.event_id == record.event_id && r.tier == record.tier);
        if taken {
            return Ok(false);
        }
        records.push(record.clone());
        Ok(true)
    }

    async fn find_by_event(&self, event_id: &str) -> Vec<DispatchRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect()
    }

    async fn delete(&self, event_id: &str, tier: ReminderTier) -> anyhow::Result<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !(r.event_id == event_id && r.tier == tier));
        Ok(records.len() < before)
    }

    async fn delete_all_before(&self, before: i64) -> Vec<DispatchRecord> {
        let mut records = self.records.lock().unwrap();
        let mut deleted = Vec::new();
        for i in (0..records.len()).rev() {
            if records[i].dispatched_at <= before {
                deleted.push(records.remove(i));
            }
        }
        deleted
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn reserve_is_first_writer_wins() {
        let repo = InMemoryDispatchRecordRepo::new();
        let record = DispatchRecord::new("evt-1", ReminderTier::H24, 100);

        assert!(repo.reserve(&record).await.unwrap());
        assert!(!repo.reserve(&record).await.unwrap());

        // A different tier for the same event is its own pair
        let other_tier = DispatchRecord::new("evt-1", ReminderTier::H1, 100);
        assert!(repo.reserve(&other_tier).await.unwrap());

        assert_eq!(repo.find_by_event("evt-1").await.len(), 2);
    }

    #[tokio::test]
    async fn delete_requeues_a_single_pair() {
        let repo = InMemoryDispatchRecordRepo::new();
        let record = DispatchRecord::new("evt-1", ReminderTier::Min5, 100);
        repo.reserve(&record).await.unwrap();

        assert!(repo.delete("evt-1", ReminderTier::Min5).await.unwrap());
        assert!(!repo.delete("evt-1", ReminderTier::Min5).await.unwrap());
        assert!(repo.reserve(&record).await.unwrap());
    }

    #[tokio::test]
    async fn reap_removes_only_old_records() {
        let repo = InMemoryDispatchRecordRepo::new();
        repo.reserve(&DispatchRecord::new("old", ReminderTier::H24, 100))
            .await
            .unwrap();
        repo.reserve(&DispatchRecord::new("new", ReminderTier::H24, 500))
            .await
            .unwrap();

        let deleted = repo.delete_all_before(200).await;
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].event_id, "old");
        assert_eq!(repo.find_by_event("new").await.len(), 1);
    }
}
