use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct CalendarEventsResponse {
    #[serde(rename = "kind")]
    pub kind: Option<String>,
    #[serde(rename = "etag")]
    pub etag: Option<String>,
    #[serde(rename = "summary")]
    pub summary: Option<String>,
    #[serde(rename = "updated")]
    pub updated: Option<String>,
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(rename = "items")]
    pub items: Vec<EventItem>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug, Clone)]
pub struct EventItem {
    #[serde(rename = "kind")]
    pub kind: Option<String>,
    #[serde(rename = "etag")]
    pub etag: Option<String>,
    #[serde(rename = "id")]
    pub id: Option<String>,
    #[serde(rename = "status")]
    pub status: Option<String>,
    #[serde(rename = "summary")]
    pub summary: Option<String>,
    #[serde(rename = "start")]
    pub start: Option<EventDateTime>,
    #[serde(rename = "end")]
    pub end: Option<EventDateTime>,
    #[serde(rename = "eventType")]
    pub event_type: Option<String>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug, Clone)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
    #[serde(rename = "date")]
    pub date: Option<String>,
}

impl EventItem {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }

    /// All-day events carry a bare `date` instead of a `dateTime`.
    pub fn is_all_day(&self) -> bool {
        self.start.as_ref().is_some_and(|s| s.date.is_some())
    }

    pub fn start_time_utc(&self) -> Option<DateTime<Utc>> {
        parse_time_utc(self.start.as_ref()?)
    }

    pub fn end_time_utc(&self) -> Option<DateTime<Utc>> {
        parse_time_utc(self.end.as_ref()?)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_date(self.start.as_ref()?)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        parse_date(self.end.as_ref()?)
    }
}

fn parse_time_utc(edt: &EventDateTime) -> Option<DateTime<Utc>> {
    let text = edt.date_time.as_ref()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_date(edt: &EventDateTime) -> Option<NaiveDate> {
    let text = edt.date.as_ref()?;
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
