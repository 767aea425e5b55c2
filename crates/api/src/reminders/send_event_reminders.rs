use super::scan_upcoming_events::{CalendarScanError, ScanOutcome, ScanUpcomingEventsUseCase};
use crate::shared::usecase::{execute, UseCase};
use chrono::TimeZone;
use lotus_booking_domain::{
    format_date_long_es, format_time_12h, reminder_message, DispatchRecord, ReminderTier,
};
use lotus_booking_infra::Context;
use std::time::Duration;
use tracing::{error, info};

/// Ledger entries this old belong to events that are long over (the
/// widest tier fires at most 24.5 hours before its event) and only
/// take up space.
const RECORD_RETENTION_MILLIS: i64 = 1000 * 60 * 60 * 48;

/// One reminder run: scan the calendars, classify every upcoming
/// event against the reminder tiers and send what is due, at most
/// once per (event, tier).
#[derive(Debug)]
pub struct SendEventRemindersUseCase;

#[derive(Debug)]
pub struct DispatchSummary {
    pub scanned: usize,
    pub eligible: usize,
    pub sent: usize,
    pub skipped_duplicate: usize,
    pub failed: usize,
    pub scan_errors: Vec<CalendarScanError>,
}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for SendEventRemindersUseCase {
    type Response = DispatchSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "SendEventReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        // The scan fans out to N calendars and is the unbounded part
        // of a run, so the hard run cap wraps it. Dispatching the
        // events a scan did return always runs to completion, so a
        // ledger reservation is never orphaned without its send
        // attempt.
        let run_timeout = Duration::from_secs(ctx.config.reminder_run_timeout_secs);
        let scan = ScanUpcomingEventsUseCase {
            horizon_millis: ctx.config.scan_horizon_millis,
        };
        let outcome: ScanOutcome = match tokio::time::timeout(run_timeout, execute(scan, ctx)).await
        {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => match e {},
            Err(_) => {
                error!("Reminder scan exceeded the run timeout");
                return Ok(DispatchSummary {
                    scanned: 0,
                    eligible: 0,
                    sent: 0,
                    skipped_duplicate: 0,
                    failed: 0,
                    scan_errors: vec![CalendarScanError {
                        calendar: "*".into(),
                        message: "Scan phase timed out".into(),
                    }],
                });
            }
        };

        let now = ctx.sys.get_timestamp_millis();
        let tz = ctx.config.timezone;
        let mut summary = DispatchSummary {
            scanned: outcome.events.len(),
            eligible: 0,
            sent: 0,
            skipped_duplicate: 0,
            failed: 0,
            scan_errors: outcome.errors,
        };

        for scanned in &outcome.events {
            let phone = match scanned.contact.resolvable_phone() {
                Some(phone) => phone,
                // Without a phone number there is nobody to remind
                None => continue,
            };
            let lead_time = scanned.lead_time(now);

            for tier in ReminderTier::ALL.iter() {
                if !tier.is_eligible(lead_time) {
                    continue;
                }
                summary.eligible += 1;

                // Reserve before sending. Losing the reservation to a
                // prior or concurrent run is the at-most-once
                // guarantee doing its job.
                let record = DispatchRecord::new(&scanned.event.id, *tier, now);
                match ctx.repos.dispatch_records.reserve(&record).await {
                    Ok(true) => {}
                    Ok(false) => {
                        summary.skipped_duplicate += 1;
                        continue;
                    }
                    Err(e) => {
                        error!(
                            "Dispatch ledger unreachable: {:?}. Not sending without a reservation.",
                            e
                        );
                        summary.failed += 1;
                        continue;
                    }
                }

                let start = tz.timestamp_millis(scanned.event.start_ts);
                let message = reminder_message(
                    *tier,
                    scanned.contact.name.as_deref(),
                    &scanned.event.summary,
                    &format_date_long_es(&start),
                    &format_time_12h(&start),
                );

                match ctx.messenger.send(phone, &message).await {
                    Ok(delivery_id) => {
                        summary.sent += 1;
                        info!(
                            "Sent {} for event {} as delivery {}",
                            tier, scanned.event.id, delivery_id
                        );
                    }
                    Err(e) => {
                        // The reservation is kept: a missed reminder
                        // confuses the recipient less than a duplicate
                        // one. Clearing the ledger entry requeues it.
                        summary.failed += 1;
                        error!(
                            "Sending {} for event {} failed: {:?}",
                            tier, scanned.event.id, e
                        );
                    }
                }
            }
        }

        let reaped = ctx
            .repos
            .dispatch_records
            .delete_all_before(now - RECORD_RETENTION_MILLIS)
            .await;
        if !reaped.is_empty() {
            info!("Reaped {} spent dispatch records", reaped.len());
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::setup_context;
    use lotus_booking_domain::RemoteEvent;
    use lotus_booking_infra::CalendarSource;

    const MINUTE: i64 = 1000 * 60;
    const HOUR: i64 = MINUTE * 60;

    fn reminder_calendar(ctx: &mut Context) {
        ctx.config.reminder_calendars = vec![CalendarSource {
            name: "principal".into(),
            calendar_id: "cal-principal".into(),
        }];
    }

    fn appointment(id: &str, start_ts: i64) -> RemoteEvent {
        RemoteEvent {
            id: id.into(),
            calendar_id: "cal-principal".into(),
            summary: "Hot Stone Therapy".into(),
            description: "Nombre: María García\nTeléfono: 3213582608".into(),
            start_ts,
            end_ts: start_ts + HOUR,
            all_day: false,
        }
    }

    async fn run(ctx: &Context) -> DispatchSummary {
        match execute(SendEventRemindersUseCase, ctx).await {
            Ok(summary) => summary,
            Err(e) => match e {},
        }
    }

    #[tokio::test]
    async fn sends_each_tier_at_most_once() {
        let now = 1_000_000_000;
        let (mut ctx, calendar_api, messenger) = setup_context(now);
        reminder_calendar(&mut ctx);
        calendar_api.seed_event(appointment("evt-1", now + 24 * HOUR));

        let first = run(&ctx).await;
        assert_eq!(first.scanned, 1);
        assert_eq!(first.eligible, 1);
        assert_eq!(first.sent, 1);
        assert_eq!(first.skipped_duplicate, 0);

        // An immediate second run finds the ledger entry and stays
        // silent
        let second = run(&ctx).await;
        assert_eq!(second.eligible, 1);
        assert_eq!(second.sent, 0);
        assert_eq!(second.skipped_duplicate, 1);

        assert_eq!(messenger.sent_messages().len(), 1);
        assert_eq!(
            ctx.repos.dispatch_records.find_by_event("evt-1").await.len(),
            1
        );
    }

    #[tokio::test]
    async fn classifies_lead_times_into_tiers() {
        let now = 1_000_000_000;
        let (mut ctx, calendar_api, messenger) = setup_context(now);
        reminder_calendar(&mut ctx);

        // 23.4h away: outside the 24h window, nothing due yet
        calendar_api.seed_event(appointment("evt-outside", now + 23 * HOUR + 24 * MINUTE));
        // 23.6h away: due the 24h reminder
        calendar_api.seed_event(appointment("evt-tomorrow", now + 23 * HOUR + 36 * MINUTE));
        // 1h away: due the 1h reminder
        calendar_api.seed_event(appointment("evt-soon", now + HOUR));
        // 5min away: due the final nudge
        calendar_api.seed_event(appointment("evt-now", now + 5 * MINUTE));

        let summary = run(&ctx).await;
        assert_eq!(summary.scanned, 4);
        assert_eq!(summary.eligible, 3);
        assert_eq!(summary.sent, 3);

        let bodies = messenger
            .sent_messages()
            .iter()
            .map(|m| m.body.clone())
            .collect::<Vec<_>>();
        assert!(bodies.iter().any(|b| b.contains("mañana")));
        assert!(bodies.iter().any(|b| b.contains("en 1 hora")));
        assert!(bodies.iter().any(|b| b.contains("en 5 minutos")));

        let records = ctx
            .repos
            .dispatch_records
            .find_by_event("evt-tomorrow")
            .await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tier, ReminderTier::H24);
    }

    #[tokio::test]
    async fn failed_send_keeps_the_reservation() {
        let now = 1_000_000_000;
        let (mut ctx, calendar_api, messenger) = setup_context(now);
        reminder_calendar(&mut ctx);
        calendar_api.seed_event(appointment("evt-1", now + HOUR));

        messenger.set_failing(true);
        let summary = run(&ctx).await;
        assert_eq!(summary.eligible, 1);
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.failed, 1);

        // The channel recovers, but the pair stays spent until an
        // operator clears the ledger entry
        messenger.set_failing(false);
        let summary = run(&ctx).await;
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.skipped_duplicate, 1);
        assert!(messenger.sent_messages().is_empty());

        ctx.repos
            .dispatch_records
            .delete("evt-1", ReminderTier::H1)
            .await
            .unwrap();
        let summary = run(&ctx).await;
        assert_eq!(summary.sent, 1);
        assert_eq!(messenger.sent_messages().len(), 1);
    }

    #[tokio::test]
    async fn spent_records_are_reaped_and_fresh_ones_kept() {
        let now = 1_000_000_000_000;
        let (mut ctx, calendar_api, _) = setup_context(now);
        reminder_calendar(&mut ctx);
        calendar_api.seed_event(appointment("evt-1", now + HOUR));

        let spent = DispatchRecord::new(
            "evt-long-gone",
            ReminderTier::Min5,
            now - RECORD_RETENTION_MILLIS - HOUR,
        );
        ctx.repos.dispatch_records.reserve(&spent).await.unwrap();

        run(&ctx).await;
        assert!(ctx
            .repos
            .dispatch_records
            .find_by_event("evt-long-gone")
            .await
            .is_empty());
        // The record written by this run survives
        assert_eq!(
            ctx.repos.dispatch_records.find_by_event("evt-1").await.len(),
            1
        );
    }

    #[tokio::test]
    async fn events_without_a_phone_are_skipped() {
        let now = 1_000_000_000;
        let (mut ctx, calendar_api, messenger) = setup_context(now);
        reminder_calendar(&mut ctx);

        let mut event = appointment("evt-anon", now + HOUR);
        event.description = "Walk-in, no contact left".into();
        calendar_api.seed_event(event);

        let summary = run(&ctx).await;
        assert_eq!(summary.scanned, 1);
        assert_eq!(summary.eligible, 0);
        assert_eq!(summary.sent, 0);
        assert!(messenger.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn degraded_scan_still_dispatches_reachable_calendars() {
        let now = 1_000_000_000;
        let (mut ctx, calendar_api, messenger) = setup_context(now);
        ctx.config.reminder_calendars = vec![
            CalendarSource {
                name: "principal".into(),
                calendar_id: "cal-principal".into(),
            },
            CalendarSource {
                name: "individual".into(),
                calendar_id: "cal-individual".into(),
            },
        ];
        calendar_api.seed_event(appointment("evt-1", now + HOUR));
        calendar_api.set_unreachable("cal-individual");

        let summary = run(&ctx).await;
        assert_eq!(summary.scanned, 1);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.scan_errors.len(), 1);
        assert_eq!(summary.scan_errors[0].calendar, "individual");
        assert_eq!(messenger.sent_messages().len(), 1);
    }
}
