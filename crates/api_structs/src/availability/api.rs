use crate::dtos::{AvailabilityReasonDTO, BookingSlotDTO};
use lotus_booking_domain::{booking_slots::DayAvailability, ID};
use serde::{Deserialize, Serialize};

pub mod get_availability {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub service_id: ID,
    }

    #[derive(Debug, Deserialize)]
    pub struct QueryParams {
        pub date: String,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub slots: Vec<BookingSlotDTO>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub reason: Option<AvailabilityReasonDTO>,
    }

    impl APIResponse {
        pub fn new(availability: DayAvailability) -> Self {
            Self {
                slots: availability.slots.iter().map(BookingSlotDTO::new).collect(),
                reason: availability.reason.map(AvailabilityReasonDTO::new),
            }
        }
    }
}
