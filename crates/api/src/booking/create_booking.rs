use crate::availability::busy_intervals_for_day;
use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::TimeZone;
use lotus_booking_api_structs::create_booking::*;
use lotus_booking_api_structs::dtos::BookingConfirmationDTO;
use lotus_booking_domain::{
    booking_slots::{get_booking_slots, AvailabilityOptions},
    confirmation_message, format_date_long_es, format_time_12h, BookingDetails, ContactBlock, Day,
    RemoteEvent, RemoteEventAttributes, ID,
};
use lotus_booking_infra::Context;

pub async fn create_booking_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    let body = body.0;
    let usecase = CreateBookingUseCase {
        service_id: body.service_id,
        start_ts: body.start_ts,
        customer: body.customer.into_domain(),
        guest_names: body.guest_names,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Created().json(APIResponse {
                event_id: res.event.id,
                deposit_amount: res.deposit_amount,
                confirmation: BookingConfirmationDTO::new(&res.details, res.message),
            })
        })
        .map_err(|e| match e {
            UseCaseError::ServiceNotFound(service_id) => ApiError::NotFound(format!(
                "Service with id: {}, was not found.",
                service_id
            )),
            UseCaseError::CapacityViolation { min, max, requested } => {
                ApiError::BadClientData(format!(
                    "This service takes between {} and {} people, got {}.",
                    min, max, requested
                ))
            }
            UseCaseError::SlotUnavailable => ApiError::Conflict(
                "The selected time is no longer available. Please pick another slot.".into(),
            ),
            UseCaseError::CalendarRead => ApiError::BadGateway(
                "Could not read the booking calendar. The booking was not created.".into(),
            ),
            UseCaseError::CalendarWrite => ApiError::BadGateway(
                "Could not write the booking to the calendar. The booking was not created. Please retry.".into(),
            ),
        })
}

#[derive(Debug)]
pub struct CreateBookingUseCase {
    pub service_id: ID,
    pub start_ts: i64,
    pub customer: ContactBlock,
    pub guest_names: Vec<String>,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub event: RemoteEvent,
    pub deposit_amount: Option<i64>,
    pub details: BookingDetails,
    pub message: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    ServiceNotFound(ID),
    CapacityViolation {
        min: u16,
        max: u16,
        requested: u16,
    },
    SlotUnavailable,
    CalendarRead,
    CalendarWrite,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateBookingUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateBooking";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let service = match ctx.repos.services.find(&self.service_id).await {
            Some(service) if service.enabled => service,
            _ => return Err(UseCaseError::ServiceNotFound(self.service_id.clone())),
        };

        let people = 1 + self.guest_names.len() as u16;
        if !service.allows_party_of(people) {
            let (min, max) = match &service.group_size {
                Some(range) => (range.min, range.max),
                None => (1, 1),
            };
            return Err(UseCaseError::CapacityViolation {
                min,
                max,
                requested: people,
            });
        }

        let tz = ctx.config.timezone;
        let day = Day::from_timestamp(self.start_ts, &tz);

        // The client chose this slot off an availability response that
        // may be stale, so recompute before writing. The race window
        // left open is bounded by this read-then-write gap.
        let busy = busy_intervals_for_day(ctx, &day)
            .await
            .map_err(|_| UseCaseError::CalendarRead)?;
        let availability = get_booking_slots(
            &service,
            &day,
            &tz,
            &busy,
            &AvailabilityOptions {
                working_hours: &ctx.config.working_hours,
                buffer_minutes: ctx.config.buffer_minutes,
                now: ctx.sys.get_timestamp_millis(),
            },
        );
        if !availability.contains_start(self.start_ts) {
            return Err(UseCaseError::SlotUnavailable);
        }

        let mut description = self.customer.encode();
        if !self.guest_names.is_empty() {
            description.push_str("\n\nInvitados:\n");
            for (index, name) in self.guest_names.iter().enumerate() {
                description.push_str(&format!("{}. {}\n", index + 1, name));
            }
        }

        let attributes = RemoteEventAttributes {
            summary: service.name.clone(),
            description,
            start_ts: self.start_ts,
            end_ts: self.start_ts + service.duration_millis(),
        };
        let event = ctx
            .calendar_api
            .insert_event(&ctx.config.booking_calendar_id, &attributes)
            .await
            .map_err(|_| UseCaseError::CalendarWrite)?;

        let deposit_amount = service.deposit_amount(ctx.config.deposit_percentage);
        let start = tz.timestamp_millis(self.start_ts);
        let details = BookingDetails {
            customer_name: self.customer.name.clone(),
            service_name: service.name.clone(),
            date: format_date_long_es(&start),
            time: format_time_12h(&start),
            number_of_people: people,
            guest_names: self.guest_names.clone(),
            deposit: deposit_amount,
            deposit_percentage: ctx.config.deposit_percentage,
        };
        let message = confirmation_message(&details);

        Ok(UseCaseRes {
            event,
            deposit_amount,
            details,
            message,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::setup_context;
    use chrono::prelude::*;
    use chrono_tz::UTC;
    use lotus_booking_domain::{decode_contact, GroupSize, Service};

    fn monday_at(hours: u32, minutes: u32) -> i64 {
        UTC.ymd(2025, 8, 4)
            .and_hms(hours, minutes, 0)
            .timestamp_millis()
    }

    fn customer() -> ContactBlock {
        ContactBlock {
            name: "María García".into(),
            phone: "3213582608".into(),
            email: Some("maria@x.com".into()),
        }
    }

    async fn seed_service(ctx: &Context) -> Service {
        let mut service = Service::new("Deep Tissue Massage", 90, 120, "massage");
        service.requires_deposit = true;
        ctx.repos.services.insert(&service).await.unwrap();
        service
    }

    #[tokio::test]
    async fn books_a_free_slot_and_embeds_the_contact_block() {
        let (ctx, calendar_api, _) = setup_context(monday_at(8, 0));
        let service = seed_service(&ctx).await;

        let usecase = CreateBookingUseCase {
            service_id: service.id.clone(),
            start_ts: monday_at(10, 0),
            customer: customer(),
            guest_names: vec!["Ana".into()],
        };
        // A single guest is out of range until the service takes groups
        let res = execute(usecase, &ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::CapacityViolation {
                min: 1,
                max: 1,
                requested: 2
            }
        );

        let usecase = CreateBookingUseCase {
            service_id: service.id.clone(),
            start_ts: monday_at(10, 0),
            customer: customer(),
            guest_names: Vec::new(),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        // 50% of 120 by default
        assert_eq!(res.deposit_amount, Some(60));
        assert_eq!(res.event.start_ts, monday_at(10, 0));
        assert_eq!(res.event.end_ts, monday_at(11, 30));
        assert!(res.message.contains("Hola María García!"));

        // The created event's description decodes back to the customer
        let events = calendar_api.all_events();
        assert_eq!(events.len(), 1);
        let decoded = decode_contact(&events[0].description);
        assert_eq!(decoded.name.as_deref(), Some("María García"));
        assert_eq!(decoded.phone.as_deref(), Some("3213582608"));
    }

    #[tokio::test]
    async fn group_booking_lists_guests_in_description() {
        let (ctx, calendar_api, _) = setup_context(monday_at(8, 0));
        let mut service = Service::new("Couples Massage", 60, 160, "massage");
        service.group_size = Some(GroupSize { min: 2, max: 4 });
        ctx.repos.services.insert(&service).await.unwrap();

        let usecase = CreateBookingUseCase {
            service_id: service.id.clone(),
            start_ts: monday_at(14, 0),
            customer: customer(),
            guest_names: vec!["Ana".into(), "Luisa".into()],
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.details.number_of_people, 3);

        let events = calendar_api.all_events();
        assert!(events[0].description.contains("Invitados:"));
        assert!(events[0].description.contains("1. Ana"));
        assert!(events[0].description.contains("2. Luisa"));
    }

    #[tokio::test]
    async fn losing_the_race_is_a_slot_unavailable_error() {
        let (ctx, calendar_api, _) = setup_context(monday_at(8, 0));
        let service = seed_service(&ctx).await;

        // Another booking landed between the availability fetch and
        // this submission
        calendar_api.seed_event(RemoteEvent {
            id: "evt-race".into(),
            calendar_id: ctx.config.booking_calendar_id.clone(),
            summary: "Deep Tissue Massage".into(),
            description: String::new(),
            start_ts: monday_at(10, 0),
            end_ts: monday_at(11, 30),
            all_day: false,
        });

        let usecase = CreateBookingUseCase {
            service_id: service.id.clone(),
            start_ts: monday_at(10, 0),
            customer: customer(),
            guest_names: Vec::new(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::SlotUnavailable);
        // Nothing was written
        assert_eq!(calendar_api.all_events().len(), 1);
    }

    #[tokio::test]
    async fn past_start_is_a_slot_unavailable_error() {
        let (ctx, _, _) = setup_context(monday_at(12, 0));
        let service = seed_service(&ctx).await;

        let usecase = CreateBookingUseCase {
            service_id: service.id.clone(),
            start_ts: monday_at(10, 0),
            customer: customer(),
            guest_names: Vec::new(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::SlotUnavailable);
    }

    #[tokio::test]
    async fn off_grid_start_is_a_slot_unavailable_error() {
        let (ctx, _, _) = setup_context(monday_at(8, 0));
        let service = seed_service(&ctx).await;

        let usecase = CreateBookingUseCase {
            service_id: service.id.clone(),
            start_ts: monday_at(10, 15),
            customer: customer(),
            guest_names: Vec::new(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::SlotUnavailable);
    }
}
