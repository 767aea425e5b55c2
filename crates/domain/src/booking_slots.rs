use crate::{
    date::Day, service::Service, timespan::TimeSpan, working_hours::WorkingHours,
};
use chrono_tz::Tz;
use serde::Serialize;

/// Candidate start times are generated on a fixed half hour grid.
/// Predictable start times are easier to present in the booking UI
/// than exact gap computation, at the cost of sometimes hiding a
/// bookable irregular gap.
pub const SLOT_INTERVAL: i64 = 1000 * 60 * 30;

#[derive(Serialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingSlot {
    pub start: i64,
    pub duration: i64,
}

pub struct AvailabilityOptions<'a> {
    pub working_hours: &'a WorkingHours,
    /// Idle minutes reserved for the practitioner after every
    /// appointment, existing or new. Never applied before a start.
    pub buffer_minutes: i64,
    pub now: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityReason {
    DayClosed,
    NoCapacity,
}

#[derive(Debug)]
pub struct DayAvailability {
    pub slots: Vec<BookingSlot>,
    pub reason: Option<AvailabilityReason>,
}

impl DayAvailability {
    fn empty(reason: AvailabilityReason) -> Self {
        Self {
            slots: Vec::new(),
            reason: Some(reason),
        }
    }

    pub fn contains_start(&self, start: i64) -> bool {
        self.slots.iter().any(|slot| slot.start == start)
    }
}

fn overlaps_any(span: &TimeSpan, busy: &[TimeSpan]) -> bool {
    busy.iter().any(|b| b.overlaps(span))
}

/// Computes the bookable start times for `service` on `day`.
///
/// Walks the half hour grid across the day's working hours and keeps
/// every candidate whose buffer expanded occupation does not overlap
/// busy time. Candidates at or before `now` are dropped, as are
/// candidates whose appointment would run past closing time (the
/// trailing buffer may run past closing, only the appointment itself
/// must fit).
pub fn get_booking_slots(
    service: &Service,
    day: &Day,
    tz: &Tz,
    busy_intervals: &[TimeSpan],
    options: &AvailabilityOptions,
) -> DayAvailability {
    let open_hours = match options.working_hours.for_weekday(day.weekday(tz)) {
        Some(hours) => hours,
        None => return DayAvailability::empty(AvailabilityReason::DayClosed),
    };

    let duration = service.duration_millis();
    if duration < 1 {
        return DayAvailability::empty(AvailabilityReason::NoCapacity);
    }

    let open = open_hours.to_timespan(day, tz);
    let buffer = options.buffer_minutes * 60 * 1000;

    // Existing appointments also owe the practitioner idle time at
    // their end, so busy intervals are expanded before the overlap
    // test just like the candidate occupation below.
    let busy = busy_intervals
        .iter()
        .map(|b| b.extend_end(buffer))
        .collect::<Vec<_>>();

    let mut slots = Vec::new();
    let mut cursor = open.start();
    while cursor + duration <= open.end() {
        if cursor > options.now {
            let occupied = TimeSpan::new(cursor, cursor + duration + buffer);
            if !overlaps_any(&occupied, &busy) {
                slots.push(BookingSlot {
                    start: cursor,
                    duration,
                });
            }
        }
        cursor += SLOT_INTERVAL;
    }

    let reason = if slots.is_empty() {
        Some(AvailabilityReason::NoCapacity)
    } else {
        None
    };
    DayAvailability { slots, reason }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::prelude::*;
    use chrono_tz::UTC;

    fn test_service(duration_minutes: i64) -> Service {
        Service::new("Swedish Massage", duration_minutes, 85, "massage")
    }

    // Monday August 4. 2025
    fn monday() -> Day {
        Day {
            year: 2025,
            month: 8,
            day: 4,
        }
    }

    fn monday_at(hours: u32, minutes: u32) -> i64 {
        UTC.ymd(2025, 8, 4)
            .and_hms(hours, minutes, 0)
            .timestamp_millis()
    }

    #[test]
    fn closed_day_has_no_slots() {
        let working_hours = WorkingHours::default();
        // Sunday August 3. 2025
        let sunday = Day {
            year: 2025,
            month: 8,
            day: 3,
        };
        let availability = get_booking_slots(
            &test_service(60),
            &sunday,
            &UTC,
            &[],
            &AvailabilityOptions {
                working_hours: &working_hours,
                buffer_minutes: 0,
                now: 0,
            },
        );
        assert!(availability.slots.is_empty());
        assert_eq!(availability.reason, Some(AvailabilityReason::DayClosed));
    }

    #[test]
    fn no_slots_at_or_before_now() {
        let working_hours = WorkingHours::default();
        let now = monday_at(14, 32);
        let availability = get_booking_slots(
            &test_service(60),
            &monday(),
            &UTC,
            &[],
            &AvailabilityOptions {
                working_hours: &working_hours,
                buffer_minutes: 0,
                now,
            },
        );

        assert!(availability.slots.iter().all(|slot| slot.start > now));
        assert_eq!(availability.slots[0].start, monday_at(15, 0));
        // 17:00 is the last grid start whose appointment still ends by 18:00
        assert_eq!(
            availability.slots.last().unwrap().start,
            monday_at(17, 0)
        );
    }

    #[test]
    fn slots_avoid_buffer_expanded_busy_time() {
        let working_hours = WorkingHours::default();
        let busy = vec![TimeSpan::new(monday_at(10, 0), monday_at(11, 0))];
        let availability = get_booking_slots(
            &test_service(60),
            &monday(),
            &UTC,
            &busy,
            &AvailabilityOptions {
                working_hours: &working_hours,
                buffer_minutes: 15,
                now: monday_at(0, 0),
            },
        );

        // 09:30 collides with the appointment itself, 11:00 with the
        // idle time after it. The earliest permissible start is 11:15,
        // so 11:30 is the first slot on the grid.
        assert!(!availability.contains_start(monday_at(9, 30)));
        assert!(!availability.contains_start(monday_at(11, 0)));
        assert_eq!(availability.slots[0].start, monday_at(11, 30));
        assert_eq!(availability.slots.len(), 12);

        // No surviving slot overlaps the buffer expanded busy interval
        let expanded = TimeSpan::new(monday_at(10, 0), monday_at(11, 15));
        for slot in &availability.slots {
            let occupied = TimeSpan::new(slot.start, slot.start + slot.duration + 15 * 60 * 1000);
            assert!(!occupied.overlaps(&expanded));
        }
    }

    #[test]
    fn buffer_also_follows_the_new_appointment() {
        let working_hours = WorkingHours::default();
        let busy = vec![TimeSpan::new(monday_at(12, 0), monday_at(13, 0))];
        let availability = get_booking_slots(
            &test_service(60),
            &monday(),
            &UTC,
            &busy,
            &AvailabilityOptions {
                working_hours: &working_hours,
                buffer_minutes: 15,
                now: monday_at(0, 0),
            },
        );

        // 11:00 would leave no idle time before the 12:00 appointment
        assert!(availability.contains_start(monday_at(10, 30)));
        assert!(!availability.contains_start(monday_at(11, 0)));
        assert!(!availability.contains_start(monday_at(13, 0)));
        assert!(availability.contains_start(monday_at(13, 30)));
    }

    #[test]
    fn zero_buffer_allows_back_to_back() {
        let working_hours = WorkingHours::default();
        let busy = vec![TimeSpan::new(monday_at(10, 0), monday_at(11, 0))];
        let availability = get_booking_slots(
            &test_service(60),
            &monday(),
            &UTC,
            &busy,
            &AvailabilityOptions {
                working_hours: &working_hours,
                buffer_minutes: 0,
                now: monday_at(0, 0),
            },
        );

        assert!(availability.contains_start(monday_at(9, 0)));
        assert!(!availability.contains_start(monday_at(10, 0)));
        assert!(!availability.contains_start(monday_at(10, 30)));
        assert!(availability.contains_start(monday_at(11, 0)));
    }

    #[test]
    fn full_open_day_for_ninety_minute_service() {
        let working_hours = WorkingHours::default();
        let availability = get_booking_slots(
            &test_service(90),
            &monday(),
            &UTC,
            &[],
            &AvailabilityOptions {
                working_hours: &working_hours,
                buffer_minutes: 0,
                now: monday_at(8, 0),
            },
        );

        assert_eq!(availability.slots.len(), 16);
        assert_eq!(availability.slots[0].start, monday_at(9, 0));
        // 16:30 is the last start whose 90 minutes still end by 18:00
        assert_eq!(
            availability.slots.last().unwrap().start,
            monday_at(16, 30)
        );
        assert_eq!(availability.reason, None);
    }

    #[test]
    fn fully_booked_day_reports_no_capacity() {
        let working_hours = WorkingHours::default();
        let busy = vec![TimeSpan::new(monday_at(9, 0), monday_at(18, 0))];
        let availability = get_booking_slots(
            &test_service(60),
            &monday(),
            &UTC,
            &busy,
            &AvailabilityOptions {
                working_hours: &working_hours,
                buffer_minutes: 0,
                now: monday_at(0, 0),
            },
        );
        assert!(availability.slots.is_empty());
        assert_eq!(availability.reason, Some(AvailabilityReason::NoCapacity));
    }
}
