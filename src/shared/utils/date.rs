use chrono::{Datelike, NaiveDate, TimeZone, Weekday};
use chrono_tz::Tz;

/// Converts a local calendar date to the RFC3339 instant of its midnight in
/// `tz`, expressed in UTC. The calendar API's `timeMin`/`timeMax` take these.
pub fn to_utc_midnight_rfc3339(date: NaiveDate, tz: &Tz) -> String {
    let local_midnight = date.and_hms_opt(0, 0, 0).unwrap();
    tz.from_local_datetime(&local_midnight)
        .unwrap()
        .to_utc()
        .to_rfc3339()
}

/// `DD.MM` label shown in a day column's date row.
pub fn date_label(date: NaiveDate) -> String {
    format!("{:02}.{:02}", date.day(), date.month())
}

/// Uppercase Russian two-letter weekday abbreviation, the form the schedule
/// sheet displays under each date.
pub fn weekday_short_ru(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "ПН",
        Weekday::Tue => "ВТ",
        Weekday::Wed => "СР",
        Weekday::Thu => "ЧТ",
        Weekday::Fri => "ПТ",
        Weekday::Sat => "СБ",
        Weekday::Sun => "ВС",
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
