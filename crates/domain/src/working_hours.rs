use crate::{date::Day, timespan::TimeSpan};
use chrono::prelude::*;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Time {
    pub hours: u32,
    pub minutes: u32,
}

impl std::cmp::PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match self.hours.cmp(&other.hours) {
            std::cmp::Ordering::Less => return Some(std::cmp::Ordering::Less),
            std::cmp::Ordering::Greater => return Some(std::cmp::Ordering::Greater),
            _ => (),
        };

        Some(self.minutes.cmp(&other.minutes))
    }
}

/// The open interval of one weekday, local business time.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayHours {
    start: Time,
    end: Time,
}

impl DayHours {
    /// `None` when `start >= end`, which would describe a day that
    /// closes before it opens.
    pub fn new(start: Time, end: Time) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Anchors these opening hours to a concrete calendar day.
    pub fn to_timespan(&self, day: &Day, tzid: &Tz) -> TimeSpan {
        let date = tzid.ymd(day.year, day.month, day.day);
        TimeSpan::new(
            date.and_hms(self.start.hours, self.start.minutes, 0)
                .timestamp_millis(),
            date.and_hms(self.end.hours, self.end.minutes, 0)
                .timestamp_millis(),
        )
    }
}

/// Weekly opening hours of the business. Weekdays without an entry are
/// closed. Owned by the settings collaborator and treated as read-only
/// for the duration of one request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkingHours {
    rules: Vec<(Weekday, DayHours)>,
}

impl WorkingHours {
    pub fn new(rules: Vec<(Weekday, DayHours)>) -> Self {
        Self { rules }
    }

    pub fn for_weekday(&self, weekday: Weekday) -> Option<&DayHours> {
        self.rules
            .iter()
            .find(|(wday, _)| *wday == weekday)
            .map(|(_, hours)| hours)
    }

    pub fn is_open(&self, weekday: Weekday) -> bool {
        self.for_weekday(weekday).is_some()
    }
}

impl Default for WorkingHours {
    /// Mon-Fri 09:00-18:00, Sat 10:00-16:00, closed Sunday.
    fn default() -> Self {
        let weekday_hours = DayHours::new(
            Time {
                hours: 9,
                minutes: 0,
            },
            Time {
                hours: 18,
                minutes: 0,
            },
        )
        .unwrap();
        let saturday_hours = DayHours::new(
            Time {
                hours: 10,
                minutes: 0,
            },
            Time {
                hours: 16,
                minutes: 0,
            },
        )
        .unwrap();

        let mut rules = vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
        .into_iter()
        .map(|wday| (wday, weekday_hours.clone()))
        .collect::<Vec<_>>();
        rules.push((Weekday::Sat, saturday_hours));

        Self { rules }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::UTC;

    #[test]
    fn it_rejects_inverted_hours() {
        let nine = Time {
            hours: 9,
            minutes: 0,
        };
        let five = Time {
            hours: 17,
            minutes: 0,
        };
        assert!(DayHours::new(nine.clone(), five.clone()).is_some());
        assert!(DayHours::new(five.clone(), nine.clone()).is_none());
        assert!(DayHours::new(nine.clone(), nine).is_none());
    }

    #[test]
    fn default_hours_close_on_sunday() {
        let hours = WorkingHours::default();
        assert!(hours.is_open(Weekday::Mon));
        assert!(hours.is_open(Weekday::Sat));
        assert!(!hours.is_open(Weekday::Sun));
    }

    #[test]
    fn day_hours_anchor_to_calendar_day() {
        let hours = WorkingHours::default();
        // Monday August 4. 2025
        let day = Day {
            year: 2025,
            month: 8,
            day: 4,
        };
        let span = hours
            .for_weekday(Weekday::Mon)
            .unwrap()
            .to_timespan(&day, &UTC);
        assert_eq!(
            span.start(),
            UTC.ymd(2025, 8, 4).and_hms(9, 0, 0).timestamp_millis()
        );
        assert_eq!(
            span.end(),
            UTC.ymd(2025, 8, 4).and_hms(18, 0, 0).timestamp_millis()
        );
    }
}
