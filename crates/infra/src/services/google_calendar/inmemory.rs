use super::ICalendarApi;
use lotus_booking_domain::{RemoteEvent, RemoteEventAttributes, TimeSpan};
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

/// Calendar fake for tests. Events can be seeded directly and single
/// calendars can be marked unreachable to exercise degraded scans.
pub struct InMemoryCalendarApi {
    events: Mutex<Vec<RemoteEvent>>,
    unreachable: Mutex<HashSet<String>>,
}

impl InMemoryCalendarApi {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            unreachable: Mutex::new(HashSet::new()),
        }
    }

    pub fn seed_event(&self, event: RemoteEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn set_unreachable(&self, calendar_id: &str) {
        self.unreachable
            .lock()
            .unwrap()
            .insert(calendar_id.to_string());
    }

    /// Every event currently in the fake, inserted ones included
    pub fn all_events(&self) -> Vec<RemoteEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ICalendarApi for InMemoryCalendarApi {
    async fn list_events(
        &self,
        calendar_id: &str,
        timespan: &TimeSpan,
    ) -> anyhow::Result<Vec<RemoteEvent>> {
        if self.unreachable.lock().unwrap().contains(calendar_id) {
            return Err(anyhow::Error::msg(format!(
                "Calendar {} is unreachable",
                calendar_id
            )));
        }

        let mut events = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| {
                event.calendar_id == calendar_id
                    && event.start_ts >= timespan.start()
                    && event.start_ts < timespan.end()
            })
            .cloned()
            .collect::<Vec<_>>();
        events.sort_by_key(|event| event.start_ts);
        Ok(events)
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        attributes: &RemoteEventAttributes,
    ) -> anyhow::Result<RemoteEvent> {
        let event = RemoteEvent {
            id: Uuid::new_v4().to_string(),
            calendar_id: calendar_id.to_string(),
            summary: attributes.summary.clone(),
            description: attributes.description.clone(),
            start_ts: attributes.start_ts,
            end_ts: attributes.end_ts,
            all_day: false,
        };
        self.events.lock().unwrap().push(event.clone());
        Ok(event)
    }
}
