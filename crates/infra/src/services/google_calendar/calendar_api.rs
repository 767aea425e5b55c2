use super::ICalendarApi;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use lotus_booking_domain::{RemoteEvent, RemoteEventAttributes, TimeSpan};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, warn};

const GOOGLE_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleDateTime(String);

impl GoogleDateTime {
    pub fn from_timestamp_millis(timestamp: i64) -> Self {
        let datetime_str = Utc.timestamp_millis(timestamp).to_rfc3339();
        Self(datetime_str)
    }

    pub fn get_timestamp_millis(&self) -> anyhow::Result<i64> {
        let datetime = DateTime::parse_from_rfc3339(&self.0)?;
        Ok(datetime.timestamp_millis())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCalendarEventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_time: Option<GoogleDateTime>,
    /// Set instead of `date_time` for all day entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl GoogleCalendarEventDateTime {
    pub fn new(date_time_millis: i64) -> Self {
        Self {
            date_time: Some(GoogleDateTime::from_timestamp_millis(date_time_millis)),
            date: None,
            time_zone: Some(String::from("UTC")),
        }
    }

    fn is_all_day(&self) -> bool {
        self.date_time.is_none()
    }

    fn timestamp_millis(&self) -> anyhow::Result<i64> {
        if let Some(date_time) = &self.date_time {
            return date_time.get_timestamp_millis();
        }
        if let Some(date) = &self.date {
            let naive = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
            return Ok(Utc.from_utc_date(&naive).and_hms(0, 0, 0).timestamp_millis());
        }
        Err(anyhow::Error::msg("Event time has neither dateTime nor date"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCalendarEvent {
    pub id: String,
    pub start: GoogleCalendarEventDateTime,
    pub end: GoogleCalendarEventDateTime,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
}

impl GoogleCalendarEvent {
    fn into_remote_event(self, calendar_id: &str) -> Option<RemoteEvent> {
        let all_day = self.start.is_all_day();
        let start_ts = match self.start.timestamp_millis() {
            Ok(ts) => ts,
            Err(e) => {
                warn!(
                    "Dropping calendar event {} with unreadable start: {:?}",
                    self.id, e
                );
                return None;
            }
        };
        let end_ts = match self.end.timestamp_millis() {
            Ok(ts) => ts,
            Err(e) => {
                warn!(
                    "Dropping calendar event {} with unreadable end: {:?}",
                    self.id, e
                );
                return None;
            }
        };
        Some(RemoteEvent {
            id: self.id,
            calendar_id: calendar_id.to_string(),
            summary: self.summary,
            description: self.description,
            start_ts,
            end_ts,
            all_day,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleCalendarEventAttributes {
    start: GoogleCalendarEventDateTime,
    end: GoogleCalendarEventDateTime,
    summary: String,
    description: String,
}

impl From<&RemoteEventAttributes> for GoogleCalendarEventAttributes {
    fn from(attributes: &RemoteEventAttributes) -> Self {
        Self {
            start: GoogleCalendarEventDateTime::new(attributes.start_ts),
            end: GoogleCalendarEventDateTime::new(attributes.end_ts),
            summary: attributes.summary.clone(),
            description: attributes.description.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListEventsResponse {
    #[serde(default)]
    items: Vec<GoogleCalendarEvent>,
}

pub struct GoogleCalendarRestApi {
    client: Client,
    access_token: String,
}

impl GoogleCalendarRestApi {
    /// The access token lifecycle (refresh, re-auth) is owned by a
    /// supervisor outside this core. `timeout` bounds every request
    /// so a slow calendar can not hang a booking or a scan.
    pub fn new(access_token: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("To build google calendar http client");

        Self {
            client,
            access_token,
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: String,
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        match self
            .client
            .get(&format!("{}/{}", GOOGLE_API_BASE_URL, path))
            .header("authorization", format!("Bearer {}", self.access_token))
            .query(query)
            .send()
            .await
        {
            Ok(res) => res.json::<T>().await.map_err(|e| {
                error!(
                    "[Unexpected Response] Google Calendar API GET error. Error message: {:?}",
                    e
                );
                anyhow::Error::new(e)
            }),
            Err(e) => {
                error!(
                    "[Network Error] Google Calendar API GET error. Error message: {:?}",
                    e
                );
                Err(anyhow::Error::new(e))
            }
        }
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        body: &impl Serialize,
        path: String,
    ) -> anyhow::Result<T> {
        match self
            .client
            .post(&format!("{}/{}", GOOGLE_API_BASE_URL, path))
            .header("authorization", format!("Bearer {}", self.access_token))
            .json(body)
            .send()
            .await
        {
            Ok(res) => res.json::<T>().await.map_err(|e| {
                error!(
                    "[Unexpected Response] Google Calendar API POST error. Error message: {:?}",
                    e
                );
                anyhow::Error::new(e)
            }),
            Err(e) => {
                error!(
                    "[Network Error] Google Calendar API POST error. Error message: {:?}",
                    e
                );
                Err(anyhow::Error::new(e))
            }
        }
    }
}

#[async_trait::async_trait]
impl ICalendarApi for GoogleCalendarRestApi {
    async fn list_events(
        &self,
        calendar_id: &str,
        timespan: &TimeSpan,
    ) -> anyhow::Result<Vec<RemoteEvent>> {
        let query = [
            (
                "timeMin",
                Utc.timestamp_millis(timespan.start()).to_rfc3339(),
            ),
            ("timeMax", Utc.timestamp_millis(timespan.end()).to_rfc3339()),
            ("singleEvents", String::from("true")),
            ("orderBy", String::from("startTime")),
        ];
        let res: ListEventsResponse = self
            .get(format!("calendars/{}/events", calendar_id), &query)
            .await?;

        Ok(res
            .items
            .into_iter()
            .filter_map(|event| event.into_remote_event(calendar_id))
            .collect())
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        attributes: &RemoteEventAttributes,
    ) -> anyhow::Result<RemoteEvent> {
        let body = GoogleCalendarEventAttributes::from(attributes);
        let created: GoogleCalendarEvent = self
            .post(&body, format!("calendars/{}/events", calendar_id))
            .await?;

        created
            .into_remote_event(calendar_id)
            .ok_or_else(|| anyhow::Error::msg("Created event came back without a readable time"))
    }
}
