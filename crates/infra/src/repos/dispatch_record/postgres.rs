use super::IDispatchRecordRepo;
use lotus_booking_domain::{DispatchRecord, ReminderTier};
use sqlx::{FromRow, PgPool};
use tracing::error;

// Expected schema:
//
// CREATE TABLE dispatch_records (
//     event_id text NOT NULL,
//     tier text NOT NULL,
//     dispatched_at bigint NOT NULL,
//     PRIMARY KEY (event_id, tier)
// );
//
// The primary key is what makes `reserve` atomic across processes.
pub struct PostgresDispatchRecordRepo {
    pool: PgPool,
}

impl PostgresDispatchRecordRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DispatchRecordRaw {
    event_id: String,
    tier: String,
    dispatched_at: i64,
}

impl DispatchRecordRaw {
    fn into_domain(self) -> Option<DispatchRecord> {
        let tier = match ReminderTier::from_identifier(&self.tier) {
            Some(tier) => tier,
            None => {
                error!("Unknown reminder tier in dispatch ledger: {}", self.tier);
                return None;
            }
        };
        Some(DispatchRecord {
            event_id: self.event_id,
            tier,
            dispatched_at: self.dispatched_at,
        })
    }
}

#[async_trait::async_trait]
impl IDispatchRecordRepo for PostgresDispatchRecordRepo {
    async fn reserve(&self, record: &DispatchRecord) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO dispatch_records
            (event_id, tier, dispatched_at)
            VALUES($1, $2, $3)
            ON CONFLICT (event_id, tier) DO NOTHING
            "#,
        )
        .bind(&record.event_id)
        .bind(record.tier.identifier())
        .bind(record.dispatched_at)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn find_by_event(&self, event_id: &str) -> Vec<DispatchRecord> {
        sqlx::query_as::<_, DispatchRecordRaw>(
            r#"
            SELECT * FROM dispatch_records AS d
            WHERE d.event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .filter_map(|r| r.into_domain())
        .collect()
    }

    async fn delete(&self, event_id: &str, tier: ReminderTier) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            DELETE FROM dispatch_records AS d
            WHERE d.event_id = $1 AND d.tier = $2
            "#,
        )
        .bind(event_id)
        .bind(tier.identifier())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete_all_before(&self, before: i64) -> Vec<DispatchRecord> {
        sqlx::query_as::<_, DispatchRecordRaw>(
            r#"
            DELETE FROM dispatch_records AS d
            WHERE d.dispatched_at <= $1
            RETURNING *
            "#,
        )
        .bind(before)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .filter_map(|r| r.into_domain())
        .collect()
    }
}
