pub mod booking_slots;
mod contact;
mod date;
mod event;
mod messages;
mod reminder;
mod service;
mod shared;
mod timespan;
mod working_hours;

pub use contact::{decode_contact, ContactBlock, DecodedContact};
pub use date::{format_date_long_es, format_time_12h, Day};
pub use event::{RemoteEvent, RemoteEventAttributes, ScannedEvent};
pub use messages::{confirmation_message, reminder_message, BookingDetails};
pub use reminder::{DispatchRecord, ReminderTier};
pub use service::{GroupSize, Service};
pub use shared::entity::{Entity, ID};
pub use timespan::TimeSpan;
pub use working_hours::{DayHours, Time, WorkingHours};
