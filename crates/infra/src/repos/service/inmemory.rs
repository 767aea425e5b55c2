use super::IServiceRepo;
use crate::repos::shared::inmemory_repo;
use lotus_booking_domain::{Service, ID};
use std::sync::Mutex;

pub struct InMemoryServiceRepo {
    services: Mutex<Vec<Service>>,
}

impl InMemoryServiceRepo {
    pub fn new() -> Self {
        Self {
            services: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IServiceRepo for InMemoryServiceRepo {
    async fn insert(&self, service: &Service) -> anyhow::Result<()> {
        inmemory_repo::insert(service, &self.services);
        Ok(())
    }

    async fn find(&self, service_id: &ID) -> Option<Service> {
        inmemory_repo::find(service_id, &self.services)
    }

    async fn find_enabled(&self) -> Vec<Service> {
        inmemory_repo::find_by(&self.services, |service| service.enabled)
    }
}
