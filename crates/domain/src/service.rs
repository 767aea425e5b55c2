use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// Allowed party size range for a `Service` that accepts group
/// bookings. Bounds are inclusive and count the customer making the
/// booking, so a couples massage is `{ min: 2, max: 2 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSize {
    pub min: u16,
    pub max: u16,
}

/// A bookable treatment. Services are immutable once a booking
/// references them; disabling a service only stops future
/// availability queries and bookings.
#[derive(Debug, Clone)]
pub struct Service {
    pub id: ID,
    pub name: String,
    /// Appointment length in minutes, always positive
    pub duration_minutes: i64,
    /// Price in whole currency units, never negative
    pub price: i64,
    pub category: String,
    pub enabled: bool,
    /// `None` means the service is strictly individual
    pub group_size: Option<GroupSize>,
    pub requires_deposit: bool,
}

impl Service {
    pub fn new(name: &str, duration_minutes: i64, price: i64, category: &str) -> Self {
        Self {
            id: Default::default(),
            name: name.to_string(),
            duration_minutes,
            price,
            category: category.to_string(),
            enabled: true,
            group_size: None,
            requires_deposit: false,
        }
    }

    pub fn duration_millis(&self) -> i64 {
        self.duration_minutes * 60 * 1000
    }

    /// Whether a booking for `people` persons (customer included) fits
    /// this service. Individual services only ever take one person.
    pub fn allows_party_of(&self, people: u16) -> bool {
        match &self.group_size {
            Some(range) => people >= range.min && people <= range.max,
            None => people == 1,
        }
    }

    /// Deposit owed up front, or `None` when the service does not
    /// require one. `percentage` is a whole number, e.g. 50 for 50%.
    pub fn deposit_amount(&self, percentage: i64) -> Option<i64> {
        if !self.requires_deposit {
            return None;
        }
        Some(self.price * percentage / 100)
    }
}

impl Entity for Service {
    fn id(&self) -> &ID {
        &self.id
    }
}
