mod calendar_api;
mod inmemory;

pub use calendar_api::GoogleCalendarRestApi;
pub use inmemory::InMemoryCalendarApi;
use lotus_booking_domain::{RemoteEvent, RemoteEventAttributes, TimeSpan};

/// The external calendar collaborator. Bookings are written through
/// it and the reminder scanner reads upcoming events back out of it.
/// Event descriptions are the only channel for contact metadata.
#[async_trait::async_trait]
pub trait ICalendarApi: Send + Sync {
    /// Events whose start falls in `[timespan.start, timespan.end)`
    async fn list_events(
        &self,
        calendar_id: &str,
        timespan: &TimeSpan,
    ) -> anyhow::Result<Vec<RemoteEvent>>;

    async fn insert_event(
        &self,
        calendar_id: &str,
        attributes: &RemoteEventAttributes,
    ) -> anyhow::Result<RemoteEvent>;
}
