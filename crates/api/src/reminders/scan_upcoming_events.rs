use crate::shared::usecase::UseCase;
use futures::future::join_all;
use lotus_booking_domain::{decode_contact, ScannedEvent, TimeSpan};
use lotus_booking_infra::Context;
use std::time::Duration;
use tracing::warn;

/// Polls every configured reminder calendar for upcoming events and
/// decorates each with its decoded contact block.
#[derive(Debug)]
pub struct ScanUpcomingEventsUseCase {
    /// How far ahead to look, must cover the widest reminder window
    pub horizon_millis: i64,
}

/// A degraded scan is preferable to skipping all reminders because
/// one calendar is unreachable, so per calendar failures ride along
/// instead of failing the run.
#[derive(Debug)]
pub struct ScanOutcome {
    pub events: Vec<ScannedEvent>,
    pub errors: Vec<CalendarScanError>,
}

#[derive(Debug, Clone)]
pub struct CalendarScanError {
    pub calendar: String,
    pub message: String,
}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for ScanUpcomingEventsUseCase {
    type Response = ScanOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "ScanUpcomingEvents";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let window = TimeSpan::new(now, now + self.horizon_millis);
        let call_timeout = Duration::from_secs(ctx.config.calendar_timeout_secs);

        // One concurrent read per calendar, each on its own timeout,
        // so a single slow calendar can not stall the others.
        let calendar_reads = ctx.config.reminder_calendars.iter().map(|source| {
            let window = window.clone();
            async move {
                let result = tokio::time::timeout(
                    call_timeout,
                    ctx.calendar_api.list_events(&source.calendar_id, &window),
                )
                .await;
                (source, result)
            }
        });
        let results = join_all(calendar_reads).await;

        let mut events = Vec::new();
        let mut errors = Vec::new();
        for (source, result) in results {
            match result {
                Ok(Ok(calendar_events)) => {
                    events.extend(
                        calendar_events
                            .into_iter()
                            // All day entries carry no "time until" semantics
                            .filter(|event| !event.all_day)
                            .map(|event| ScannedEvent {
                                contact: decode_contact(&event.description),
                                event,
                            }),
                    );
                }
                Ok(Err(e)) => {
                    warn!("Scanning calendar {} failed: {:?}", source.name, e);
                    errors.push(CalendarScanError {
                        calendar: source.name.clone(),
                        message: e.to_string(),
                    });
                }
                Err(_) => {
                    warn!("Scanning calendar {} timed out", source.name);
                    errors.push(CalendarScanError {
                        calendar: source.name.clone(),
                        message: "Calendar read timed out".into(),
                    });
                }
            }
        }

        events.sort_by_key(|scanned| scanned.event.start_ts);
        Ok(ScanOutcome { events, errors })
    }
}
