use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use lotus_booking_api_structs::get_availability::*;
use lotus_booking_domain::{
    booking_slots::{get_booking_slots, AvailabilityOptions, DayAvailability},
    Day, TimeSpan, ID,
};
use lotus_booking_infra::Context;

pub async fn get_availability_controller(
    path_params: web::Path<PathParams>,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    let usecase = GetAvailabilityUseCase {
        service_id: path_params.service_id.clone(),
        date: query_params.date.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|availability| HttpResponse::Ok().json(APIResponse::new(availability)))
        .map_err(|e| match e {
            UseCaseError::ServiceNotFound(service_id) => ApiError::NotFound(format!(
                "Service with id: {}, was not found.",
                service_id
            )),
            UseCaseError::InvalidDate(msg) => ApiError::BadClientData(format!(
                "Invalid datetime: {}. Should be YYYY-MM-DD, e.g. January 1. 2020 => 2020-1-1",
                msg
            )),
            UseCaseError::CalendarRead => ApiError::BadGateway(
                "Could not read the booking calendar. Please try again.".into(),
            ),
        })
}

/// Busy time already on the booking calendar for the given day.
/// All day entries block no slots.
pub(crate) async fn busy_intervals_for_day(
    ctx: &Context,
    day: &Day,
) -> anyhow::Result<Vec<TimeSpan>> {
    let tz = ctx.config.timezone;
    let start = day.date(&tz).and_hms(0, 0, 0).timestamp_millis();
    let mut next_day = day.clone();
    next_day.inc();
    let end = next_day.date(&tz).and_hms(0, 0, 0).timestamp_millis();

    let events = ctx
        .calendar_api
        .list_events(&ctx.config.booking_calendar_id, &TimeSpan::new(start, end))
        .await?;

    Ok(events
        .into_iter()
        .filter(|event| !event.all_day)
        .map(|event| event.timespan())
        .collect())
}

#[derive(Debug)]
pub struct GetAvailabilityUseCase {
    pub service_id: ID,
    pub date: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    ServiceNotFound(ID),
    InvalidDate(String),
    CalendarRead,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAvailabilityUseCase {
    type Response = DayAvailability;

    type Error = UseCaseError;

    const NAME: &'static str = "GetAvailability";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let service = match ctx.repos.services.find(&self.service_id).await {
            Some(service) if service.enabled => service,
            _ => return Err(UseCaseError::ServiceNotFound(self.service_id.clone())),
        };

        let day = self
            .date
            .parse::<Day>()
            .map_err(|_| UseCaseError::InvalidDate(self.date.clone()))?;

        let busy = busy_intervals_for_day(ctx, &day)
            .await
            .map_err(|_| UseCaseError::CalendarRead)?;

        Ok(get_booking_slots(
            &service,
            &day,
            &ctx.config.timezone,
            &busy,
            &AvailabilityOptions {
                working_hours: &ctx.config.working_hours,
                buffer_minutes: ctx.config.buffer_minutes,
                now: ctx.sys.get_timestamp_millis(),
            },
        ))
    }
}
