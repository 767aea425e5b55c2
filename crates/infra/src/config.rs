use chrono_tz::Tz;
use lotus_booking_domain::WorkingHours;
use lotus_booking_utils::create_random_secret;
use tracing::{info, log::warn};

/// A named external calendar polled by the reminder scanner.
#[derive(Debug, Clone)]
pub struct CalendarSource {
    pub name: String,
    pub calendar_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Secret the external cron scheduler must present to trigger a
    /// reminder run over HTTP
    pub cron_secret: String,
    /// Business timezone. Working hours, slot grids and customer
    /// facing date formatting are all anchored here.
    pub timezone: Tz,
    /// Country code prefixed to phone numbers submitted without one
    pub default_country_code: String,
    /// Share of the service price owed up front, whole percent
    pub deposit_percentage: i64,
    /// Practitioner idle minutes reserved after every appointment
    pub buffer_minutes: i64,
    /// Weekly opening hours. The admin settings editor owns these;
    /// a restart picks up edits.
    pub working_hours: WorkingHours,
    /// Calendar new bookings are written to
    pub booking_calendar_id: String,
    /// Calendars the reminder scanner polls
    pub reminder_calendars: Vec<CalendarSource>,
    /// How far ahead one scan looks. Must cover the widest reminder
    /// tolerance window, so a bit over 24 hours.
    pub scan_horizon_millis: i64,
    /// Cadence of the in-process reminder job
    pub reminder_run_interval_secs: u64,
    /// Hard cap on the scan phase of one reminder run
    pub reminder_run_timeout_secs: u64,
    /// Per calendar read timeout inside one scan
    pub calendar_timeout_secs: u64,
}

impl Config {
    pub fn new() -> Self {
        let cron_secret = match std::env::var("CRON_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find CRON_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(16);
                info!(
                    "Secret for triggering reminder runs was generated and set to: {}",
                    secret
                );
                secret
            }
        };

        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let default_timezone = "America/Bogota";
        let timezone = std::env::var("TIMEZONE").unwrap_or(default_timezone.into());
        let timezone = match timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    "The given TIMEZONE: {} is not a valid IANA timezone, falling back to {}.",
                    timezone, default_timezone
                );
                default_timezone.parse::<Tz>().unwrap()
            }
        };

        let booking_calendar_id =
            std::env::var("BOOKING_CALENDAR_ID").unwrap_or_else(|_| "primary".into());
        let reminder_calendars = match std::env::var("REMINDER_CALENDARS") {
            Ok(value) => parse_calendar_sources(&value),
            Err(_) => Vec::new(),
        };
        let reminder_calendars = if reminder_calendars.is_empty() {
            vec![CalendarSource {
                name: "primary".into(),
                calendar_id: booking_calendar_id.clone(),
            }]
        } else {
            reminder_calendars
        };

        Self {
            port,
            cron_secret,
            timezone,
            default_country_code: std::env::var("DEFAULT_COUNTRY_CODE")
                .unwrap_or_else(|_| "57".into()),
            deposit_percentage: parse_env_i64("DEPOSIT_PERCENTAGE", 50),
            buffer_minutes: parse_env_i64("BUFFER_MINUTES", 15),
            working_hours: WorkingHours::default(),
            booking_calendar_id,
            reminder_calendars,
            scan_horizon_millis: 1000 * 60 * 60 * 25, // 25 hours
            reminder_run_interval_secs: 120,
            reminder_run_timeout_secs: 60,
            calendar_timeout_secs: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env_i64(var: &str, default: i64) -> i64 {
    match std::env::var(var) {
        Ok(value) => match value.parse::<i64>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not a valid number, falling back to {}.",
                    var, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

/// Parses `name=calendar-id` pairs separated by commas. Malformed
/// entries are skipped with a warning.
fn parse_calendar_sources(value: &str) -> Vec<CalendarSource> {
    value
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            match entry.split_once('=') {
                Some((name, calendar_id)) if !calendar_id.is_empty() => Some(CalendarSource {
                    name: name.trim().to_string(),
                    calendar_id: calendar_id.trim().to_string(),
                }),
                _ => {
                    warn!(
                        "Skipping malformed REMINDER_CALENDARS entry: {}. Expected name=calendar-id.",
                        entry
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_parses_calendar_sources() {
        let sources = parse_calendar_sources("principal=c_abc123,individual=c_def456");
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "principal");
        assert_eq!(sources[0].calendar_id, "c_abc123");
        assert_eq!(sources[1].name, "individual");
    }

    #[test]
    fn it_skips_malformed_calendar_sources() {
        let sources = parse_calendar_sources("good=c_1,, bad-entry ,also=");
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "good");
    }
}
