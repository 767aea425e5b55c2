use super::{normalize_phone, IMessenger};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::error;

const TWILIO_API_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

/// WhatsApp delivery over Twilio's messaging API. Credentials are
/// handed in at startup; there is no global client state.
pub struct TwilioWhatsAppApi {
    client: Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    default_country_code: String,
}

#[derive(Debug, Deserialize)]
struct CreateMessageResponse {
    sid: String,
}

impl TwilioWhatsAppApi {
    pub fn new(
        account_sid: String,
        auth_token: String,
        from_number: String,
        default_country_code: String,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("To build twilio http client");

        Self {
            client,
            account_sid,
            auth_token,
            from_number,
            default_country_code,
        }
    }
}

#[async_trait::async_trait]
impl IMessenger for TwilioWhatsAppApi {
    async fn send(&self, phone: &str, body: &str) -> anyhow::Result<String> {
        let to_number = format!(
            "whatsapp:+{}",
            normalize_phone(phone, &self.default_country_code)
        );
        let params = [
            ("From", self.from_number.as_str()),
            ("To", to_number.as_str()),
            ("Body", body),
        ];

        let url = format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE_URL, self.account_sid
        );
        match self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
        {
            Ok(res) => match res.json::<CreateMessageResponse>().await {
                Ok(message) => Ok(message.sid),
                Err(e) => {
                    error!(
                        "[Unexpected Response] Twilio API send error. Error message: {:?}",
                        e
                    );
                    Err(anyhow::Error::new(e))
                }
            },
            Err(e) => {
                error!(
                    "[Network Error] Twilio API send error. Error message: {:?}",
                    e
                );
                Err(anyhow::Error::new(e))
            }
        }
    }
}
