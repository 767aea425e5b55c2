use lotus_booking_domain::booking_slots::{AvailabilityReason, BookingSlot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingSlotDTO {
    pub start: i64,
    pub duration: i64,
}

impl BookingSlotDTO {
    pub fn new(slot: &BookingSlot) -> Self {
        Self {
            start: slot.start,
            duration: slot.duration,
        }
    }
}

/// Reason codes the booking UI shows when a day has no slots
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityReasonDTO {
    DayClosed,
    NoCapacity,
}

impl AvailabilityReasonDTO {
    pub fn new(reason: AvailabilityReason) -> Self {
        match reason {
            AvailabilityReason::DayClosed => Self::DayClosed,
            AvailabilityReason::NoCapacity => Self::NoCapacity,
        }
    }
}
