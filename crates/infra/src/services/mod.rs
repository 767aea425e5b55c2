mod google_calendar;
mod whatsapp;

pub use google_calendar::{GoogleCalendarRestApi, ICalendarApi, InMemoryCalendarApi};
pub use whatsapp::{normalize_phone, IMessenger, InMemoryMessenger, SentMessage, TwilioWhatsAppApi};
