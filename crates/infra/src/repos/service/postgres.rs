use super::IServiceRepo;
use lotus_booking_domain::{GroupSize, Service, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

// Expected schema:
//
// CREATE TABLE services (
//     service_uid uuid PRIMARY KEY,
//     name text NOT NULL,
//     duration_minutes bigint NOT NULL,
//     price bigint NOT NULL,
//     category text NOT NULL,
//     enabled boolean NOT NULL,
//     group_min int,
//     group_max int,
//     requires_deposit boolean NOT NULL
// );
pub struct PostgresServiceRepo {
    pool: PgPool,
}

impl PostgresServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ServiceRaw {
    service_uid: Uuid,
    name: String,
    duration_minutes: i64,
    price: i64,
    category: String,
    enabled: bool,
    group_min: Option<i32>,
    group_max: Option<i32>,
    requires_deposit: bool,
}

impl From<ServiceRaw> for Service {
    fn from(raw: ServiceRaw) -> Self {
        let group_size = match (raw.group_min, raw.group_max) {
            (Some(min), Some(max)) => Some(GroupSize {
                min: min as u16,
                max: max as u16,
            }),
            _ => None,
        };
        Self {
            id: ID::from(raw.service_uid),
            name: raw.name,
            duration_minutes: raw.duration_minutes,
            price: raw.price,
            category: raw.category,
            enabled: raw.enabled,
            group_size,
            requires_deposit: raw.requires_deposit,
        }
    }
}

#[async_trait::async_trait]
impl IServiceRepo for PostgresServiceRepo {
    async fn insert(&self, service: &Service) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO services
            (service_uid, name, duration_minutes, price, category, enabled, group_min, group_max, requires_deposit)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(service.id.inner_ref())
        .bind(&service.name)
        .bind(service.duration_minutes)
        .bind(service.price)
        .bind(&service.category)
        .bind(service.enabled)
        .bind(service.group_size.as_ref().map(|g| g.min as i32))
        .bind(service.group_size.as_ref().map(|g| g.max as i32))
        .bind(service.requires_deposit)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, service_id: &ID) -> Option<Service> {
        match sqlx::query_as::<_, ServiceRaw>(
            r#"
            SELECT * FROM services AS s
            WHERE s.service_uid = $1
            "#,
        )
        .bind(service_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(raw) => raw.map(|s| s.into()),
            Err(e) => {
                error!("Find service with id: {} failed. Error: {:?}", service_id, e);
                None
            }
        }
    }

    async fn find_enabled(&self) -> Vec<Service> {
        sqlx::query_as::<_, ServiceRaw>(
            r#"
            SELECT * FROM services AS s
            WHERE s.enabled
            ORDER BY s.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.into())
        .collect()
    }
}
