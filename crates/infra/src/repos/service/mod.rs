mod inmemory;
mod postgres;

pub use inmemory::InMemoryServiceRepo;
use lotus_booking_domain::{Service, ID};
pub use postgres::PostgresServiceRepo;

#[async_trait::async_trait]
pub trait IServiceRepo: Send + Sync {
    async fn insert(&self, service: &Service) -> anyhow::Result<()>;
    async fn find(&self, service_id: &ID) -> Option<Service>;
    async fn find_enabled(&self) -> Vec<Service>;
}
