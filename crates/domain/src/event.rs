use crate::{contact::DecodedContact, timespan::TimeSpan};

/// An event as it exists in the external calendar, the system of
/// record shared by the booking and the reminder halves. The
/// description text is the only channel for contact metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEvent {
    /// Identifier assigned by the external calendar
    pub id: String,
    pub calendar_id: String,
    pub summary: String,
    pub description: String,
    pub start_ts: i64,
    pub end_ts: i64,
    /// All day entries carry no time of day and are meaningless to
    /// the reminder pipeline
    pub all_day: bool,
}

impl RemoteEvent {
    pub fn timespan(&self) -> TimeSpan {
        TimeSpan::new(self.start_ts, self.end_ts)
    }
}

/// Attributes for an event about to be written to the external
/// calendar. The calendar assigns the id on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEventAttributes {
    pub summary: String,
    pub description: String,
    pub start_ts: i64,
    pub end_ts: i64,
}

/// A calendar event decorated with the contact details decoded from
/// its description, as produced by one reminder scan.
#[derive(Debug, Clone)]
pub struct ScannedEvent {
    pub event: RemoteEvent,
    pub contact: DecodedContact,
}

impl ScannedEvent {
    /// Millis until the appointment starts. Negative once it has.
    pub fn lead_time(&self, now: i64) -> i64 {
        self.event.start_ts - now
    }
}
