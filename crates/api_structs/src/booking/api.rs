use crate::dtos::{BookingConfirmationDTO, ContactDTO};
use lotus_booking_domain::ID;
use serde::{Deserialize, Serialize};

pub mod create_booking {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub service_id: ID,
        pub start_ts: i64,
        pub customer: ContactDTO,
        #[serde(default)]
        pub guest_names: Vec<String>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Id of the created calendar event
        pub event_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub deposit_amount: Option<i64>,
        pub confirmation: BookingConfirmationDTO,
    }
}
