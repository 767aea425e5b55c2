use lotus_booking_domain::{BookingDetails, ContactBlock};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContactDTO {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl ContactDTO {
    pub fn into_domain(self) -> ContactBlock {
        ContactBlock {
            name: self.name,
            phone: self.phone,
            email: self.email,
        }
    }
}

/// Confirmation payload handed back to the collaborator that talks to
/// the customer. `message` is the fully rendered WhatsApp text.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmationDTO {
    pub service_name: String,
    pub date: String,
    pub time: String,
    pub number_of_people: u16,
    pub guest_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<i64>,
    pub message: String,
}

impl BookingConfirmationDTO {
    pub fn new(details: &BookingDetails, message: String) -> Self {
        Self {
            service_name: details.service_name.clone(),
            date: details.date.clone(),
            time: details.time.clone(),
            number_of_people: details.number_of_people,
            guest_names: details.guest_names.clone(),
            deposit_amount: details.deposit,
            message,
        }
    }
}
