use lotus_booking_infra::{
    Config, Context, ISys, InMemoryCalendarApi, InMemoryMessenger, Repos,
};
use std::sync::Arc;

/// Frozen clock so availability and reminder eligibility are
/// deterministic in tests
pub struct TestSys(pub i64);
impl ISys for TestSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.0
    }
}

/// In-memory context plus handles to the calendar and messenger fakes
/// so tests can seed events and inspect sends.
pub fn setup_context(now: i64) -> (Context, Arc<InMemoryCalendarApi>, Arc<InMemoryMessenger>) {
    let calendar_api = Arc::new(InMemoryCalendarApi::new());
    let messenger = Arc::new(InMemoryMessenger::new());

    let mut config = Config::new();
    config.timezone = chrono_tz::UTC;

    let ctx = Context {
        repos: Repos::create_inmemory(),
        config,
        sys: Arc::new(TestSys(now)),
        calendar_api: calendar_api.clone(),
        messenger: messenger.clone(),
    };
    (ctx, calendar_api, messenger)
}
