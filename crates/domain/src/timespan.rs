use chrono::prelude::*;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)` of millisecond timestamps.
///
/// Busy time fetched from the external calendar, candidate slot
/// occupations and scan windows are all represented as `TimeSpan`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    start_ts: i64,
    end_ts: i64,
}

impl TimeSpan {
    pub fn new(start_ts: i64, end_ts: i64) -> Self {
        Self { start_ts, end_ts }
    }

    pub fn start(&self) -> i64 {
        self.start_ts
    }

    pub fn end(&self) -> i64 {
        self.end_ts
    }

    pub fn duration(&self) -> i64 {
        self.end_ts - self.start_ts
    }

    pub fn greater_than(&self, duration: i64) -> bool {
        self.duration() > duration
    }

    /// Strict interval overlap. Touching endpoints do not overlap,
    /// so back to back appointments are allowed.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start_ts < other.end_ts && other.start_ts < self.end_ts
    }

    /// Returns a copy with `millis` added to the end. The start is
    /// never moved.
    pub fn extend_end(&self, millis: i64) -> Self {
        Self {
            start_ts: self.start_ts,
            end_ts: self.end_ts + millis,
        }
    }

    pub fn as_datetime(&self, tz: &Tz) -> (DateTime<Tz>, DateTime<Tz>) {
        (
            tz.timestamp_millis(self.start_ts),
            tz.timestamp_millis(self.end_ts),
        )
    }
}
