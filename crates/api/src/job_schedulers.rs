use crate::reminders::SendEventRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::interval;
use lotus_booking_infra::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Run level lock shared by the interval job and the HTTP trigger.
/// The ledger reservation stays authoritative without it; the lock
/// only keeps overlapping runs from wasting duplicate calendar reads
/// and messaging calls.
#[derive(Clone)]
pub struct ReminderRunLock(Arc<Mutex<()>>);

impl ReminderRunLock {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(())))
    }

    pub fn try_lock(&self) -> Option<MutexGuard<'_, ()>> {
        self.0.try_lock().ok()
    }
}

/// Recurring reminder job. The cadence sits well inside the narrowest
/// tolerance window (4 to 6 minutes before the appointment) so no
/// eligible event can fall between two polls.
pub fn start_send_reminders_job(ctx: Context, lock: ReminderRunLock) {
    actix_web::rt::spawn(async move {
        let mut run_interval = interval(Duration::from_secs(ctx.config.reminder_run_interval_secs));
        loop {
            run_interval.tick().await;
            match lock.try_lock() {
                Some(_guard) => {
                    let _ = execute(SendEventRemindersUseCase, &ctx).await;
                }
                None => warn!("Previous reminder run still in progress, skipping this tick"),
            }
        }
    });
}
