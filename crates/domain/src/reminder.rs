use serde::{Deserialize, Serialize};

/// The reminder ladder every appointment walks down: one message the
/// day before, one an hour out and a last nudge right before the
/// appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderTier {
    H24,
    H1,
    Min5,
}

const MINUTE: i64 = 1000 * 60;
const HOUR: i64 = MINUTE * 60;

impl ReminderTier {
    pub const ALL: [ReminderTier; 3] = [ReminderTier::H24, ReminderTier::H1, ReminderTier::Min5];

    /// Stable identifier used as the ledger key component and to pick
    /// the message template.
    pub fn identifier(&self) -> &'static str {
        match self {
            ReminderTier::H24 => "reminder-24h",
            ReminderTier::H1 => "reminder-1h",
            ReminderTier::Min5 => "reminder-5min",
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "reminder-24h" => Some(ReminderTier::H24),
            "reminder-1h" => Some(ReminderTier::H1),
            "reminder-5min" => Some(ReminderTier::Min5),
            _ => None,
        }
    }

    pub fn target_lead_millis(&self) -> i64 {
        match self {
            ReminderTier::H24 => 24 * HOUR,
            ReminderTier::H1 => HOUR,
            ReminderTier::Min5 => 5 * MINUTE,
        }
    }

    /// Closed tolerance window `[min, max]` around the target lead
    /// time. The same convention is used for every tier.
    pub fn tolerance_window(&self) -> (i64, i64) {
        match self {
            ReminderTier::H24 => (23 * HOUR + 30 * MINUTE, 24 * HOUR + 30 * MINUTE),
            ReminderTier::H1 => (30 * MINUTE, HOUR + 30 * MINUTE),
            ReminderTier::Min5 => (4 * MINUTE, 6 * MINUTE),
        }
    }

    /// Whether an appointment `lead_time` millis away is due this
    /// tier's reminder. Window endpoints are inclusive.
    pub fn is_eligible(&self, lead_time: i64) -> bool {
        let (min, max) = self.tolerance_window();
        lead_time >= min && lead_time <= max
    }
}

impl std::fmt::Display for ReminderTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// One entry of the durable idempotency ledger. Its existence is the
/// sole truth of "this reminder was already sent (or its send was
/// attempted)": the record is created by an atomic insert-if-absent
/// before the send, never mutated and never rolled back on a failed
/// send, because a missed reminder confuses the recipient less than a
/// duplicate one.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRecord {
    /// External calendar event id
    pub event_id: String,
    pub tier: ReminderTier,
    pub dispatched_at: i64,
}

impl DispatchRecord {
    pub fn new(event_id: &str, tier: ReminderTier, dispatched_at: i64) -> Self {
        Self {
            event_id: event_id.to_string(),
            tier,
            dispatched_at,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn hours(h: f64) -> i64 {
        (h * HOUR as f64) as i64
    }

    #[test]
    fn h24_window_boundaries() {
        let tier = ReminderTier::H24;
        assert!(!tier.is_eligible(hours(23.4)));
        assert!(tier.is_eligible(hours(23.6)));
        assert!(tier.is_eligible(hours(24.0)));
        assert!(!tier.is_eligible(hours(24.6)));

        // Endpoints are inclusive
        assert!(tier.is_eligible(hours(23.5)));
        assert!(tier.is_eligible(hours(24.5)));
    }

    #[test]
    fn h1_window_boundaries() {
        let tier = ReminderTier::H1;
        assert!(!tier.is_eligible(hours(0.4)));
        assert!(tier.is_eligible(hours(0.5)));
        assert!(tier.is_eligible(hours(1.0)));
        assert!(tier.is_eligible(hours(1.5)));
        assert!(!tier.is_eligible(hours(1.6)));
    }

    #[test]
    fn min5_window_boundaries() {
        let tier = ReminderTier::Min5;
        assert!(!tier.is_eligible(3 * MINUTE));
        assert!(tier.is_eligible(4 * MINUTE));
        assert!(tier.is_eligible(5 * MINUTE));
        assert!(tier.is_eligible(6 * MINUTE));
        assert!(!tier.is_eligible(7 * MINUTE));
        // An appointment that already started is never eligible
        assert!(!tier.is_eligible(-MINUTE));
    }

    #[test]
    fn windows_do_not_overlap() {
        for lead in (0..26 * 60).map(|m| m as i64 * MINUTE) {
            let eligible = ReminderTier::ALL
                .iter()
                .filter(|tier| tier.is_eligible(lead))
                .count();
            assert!(eligible <= 1, "lead {} matched {} tiers", lead, eligible);
        }
    }

    #[test]
    fn identifier_roundtrip() {
        for tier in ReminderTier::ALL.iter() {
            assert_eq!(ReminderTier::from_identifier(tier.identifier()), Some(*tier));
        }
        assert_eq!(ReminderTier::from_identifier("reminder-2h"), None);
    }
}
