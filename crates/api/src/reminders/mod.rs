mod scan_upcoming_events;
mod send_event_reminders;

use crate::error::ApiError;
use crate::job_schedulers::ReminderRunLock;
use crate::shared::usecase::execute;
use actix_web::{web, HttpRequest, HttpResponse};
use lotus_booking_api_structs::dtos::ScanErrorDTO;
use lotus_booking_api_structs::run_reminders::APIResponse;
use lotus_booking_infra::Context;
pub use send_event_reminders::{DispatchSummary, SendEventRemindersUseCase};

pub const CRON_SECRET_HEADER: &str = "lotus-cron-secret";

/// Entrypoint for the external cron scheduler. Shares the run lock
/// with the in-process job so the two trigger paths can not overlap.
pub async fn run_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<Context>,
    lock: web::Data<ReminderRunLock>,
) -> Result<HttpResponse, ApiError> {
    let secret = http_req
        .headers()
        .get(CRON_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if secret != ctx.config.cron_secret {
        return Err(ApiError::Unauthorized(format!(
            "Invalid or missing `{}` header.",
            CRON_SECRET_HEADER
        )));
    }

    let _guard = match lock.try_lock() {
        Some(guard) => guard,
        None => {
            return Err(ApiError::Conflict(
                "A reminder run is already in progress.".into(),
            ))
        }
    };

    let summary = match execute(SendEventRemindersUseCase, &ctx).await {
        Ok(summary) => summary,
        Err(e) => match e {},
    };

    Ok(HttpResponse::Ok().json(APIResponse {
        scanned: summary.scanned,
        eligible: summary.eligible,
        sent: summary.sent,
        skipped_duplicate: summary.skipped_duplicate,
        failed: summary.failed,
        scan_errors: summary
            .scan_errors
            .iter()
            .map(|e| ScanErrorDTO {
                calendar: e.calendar.clone(),
                message: e.message.clone(),
            })
            .collect(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders/run", web::post().to(run_reminders_controller));
}
