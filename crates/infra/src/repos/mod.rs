mod dispatch_record;
mod service;
mod shared;

use dispatch_record::{InMemoryDispatchRecordRepo, PostgresDispatchRecordRepo};
pub use dispatch_record::IDispatchRecordRepo;
use service::{InMemoryServiceRepo, PostgresServiceRepo};
pub use service::IServiceRepo;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub services: Arc<dyn IServiceRepo>,
    pub dispatch_records: Arc<dyn IDispatchRecordRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;

        Ok(Self {
            services: Arc::new(PostgresServiceRepo::new(pool.clone())),
            dispatch_records: Arc::new(PostgresDispatchRecordRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            services: Arc::new(InMemoryServiceRepo::new()),
            dispatch_records: Arc::new(InMemoryDispatchRecordRepo::new()),
        }
    }
}
