use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::model::CalendarEventsResponse;

#[derive(Error, Debug)]
pub enum GoogleCalendarError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Calendar '{0}' was not found; please check the calendar id on the settings sheet.")]
    CalendarNotFound(String),
}

pub struct GoogleCalendarClient {
    client: Client,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new<T: Into<String>>(token: T) -> Self {
        GoogleCalendarClient {
            client: Client::new(),
            access_token: token.into(),
        }
    }

    /// Fetches every event in `[since, until)`, with recurrences expanded to
    /// single instances and sorted by start time.
    pub async fn fetch_calendar_events(
        &self,
        calendar_id: &str,
        since: &str,
        until: &str,
    ) -> Result<CalendarEventsResponse, GoogleCalendarError> {
        let url = format!(
            "https://www.googleapis.com/calendar/v3/calendars/{}/events",
            calendar_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.access_token.clone())
            .query(&[
                ("timeMin", since),
                ("timeMax", until),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GoogleCalendarError::CalendarNotFound(
                calendar_id.to_string(),
            ));
        }

        let events = response
            .error_for_status()?
            .json::<CalendarEventsResponse>()
            .await?;

        Ok(events)
    }
}
