mod config;
mod repos;
mod services;
mod system;

pub use config::{CalendarSource, Config};
pub use repos::{IDispatchRecordRepo, IServiceRepo, Repos};
pub use services::*;
use std::sync::Arc;
use std::time::Duration;
pub use system::ISys;
use system::RealSys;

/// Everything a request or a reminder run needs, built once at
/// startup and cloned freely. External clients are injected here so
/// their lifecycle (tokens, reconnects) stays outside the core.
#[derive(Clone)]
pub struct Context {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub calendar_api: Arc<dyn ICalendarApi>,
    pub messenger: Arc<dyn IMessenger>,
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> Context {
    let config = Config::new();
    let repos = Repos::create_postgres(&get_psql_connection_string())
        .await
        .expect("Postgres credentials must be set and valid");

    let timeout = Duration::from_secs(config.calendar_timeout_secs);
    let calendar_api = Arc::new(GoogleCalendarRestApi::new(
        get_env_var("GOOGLE_API_ACCESS_TOKEN"),
        timeout,
    ));
    let messenger = Arc::new(TwilioWhatsAppApi::new(
        get_env_var("TWILIO_ACCOUNT_SID"),
        get_env_var("TWILIO_AUTH_TOKEN"),
        get_env_var("TWILIO_WHATSAPP_FROM"),
        config.default_country_code.clone(),
        timeout,
    ));

    Context {
        repos,
        config,
        sys: Arc::new(RealSys {}),
        calendar_api,
        messenger,
    }
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

fn get_env_var(var: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| panic!("{} env var to be present.", var))
}
