mod inmemory;
mod twilio_api;

pub use inmemory::{InMemoryMessenger, SentMessage};
pub use twilio_api::TwilioWhatsAppApi;

/// The external notification channel. `send` returns the provider's
/// delivery id. The channel may retry transport level failures on its
/// own; callers never re-send.
#[async_trait::async_trait]
pub trait IMessenger: Send + Sync {
    async fn send(&self, phone: &str, body: &str) -> anyhow::Result<String>;
}

/// Normalizes a customer phone number to full international form:
/// formatting characters are stripped and numbers submitted without a
/// country code get the default one prefixed.
pub fn normalize_phone(raw: &str, default_country_code: &str) -> String {
    let digits = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>();

    if digits.starts_with(default_country_code) {
        digits
    } else {
        format!("{}{}", default_country_code, digits)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_strips_formatting_characters() {
        assert_eq!(normalize_phone("+57 (321) 358-2608", "57"), "573213582608");
    }

    #[test]
    fn it_prefixes_missing_country_code() {
        assert_eq!(normalize_phone("3213582608", "57"), "573213582608");
    }

    #[test]
    fn it_keeps_existing_country_code() {
        assert_eq!(normalize_phone("573213582608", "57"), "573213582608");
    }
}
