use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct RealClock;

impl Clock for RealClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The local-date span one rendering pass covers. `until_exclusive` is the
/// day after the last visible column, so event fetches take every event up
/// to the end of that column's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub today: NaiveDate,
    pub since: NaiveDate,
    pub until_exclusive: NaiveDate,
}

impl FetchWindow {
    pub fn around(today: NaiveDate, days_back: i64, days_fw: i64) -> Self {
        FetchWindow {
            today,
            since: today - Duration::days(days_back),
            until_exclusive: today + Duration::days(days_fw + 1),
        }
    }
}

pub struct FetchWindowCalculator<C: Clock> {
    clock: C,
}

impl<C: Clock> FetchWindowCalculator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Resolves today's date in the schedule's time zone before spanning the
    /// window around it.
    pub fn window<TZ: TimeZone>(&self, tz: &TZ, days_back: i64, days_fw: i64) -> FetchWindow {
        let today = self.clock.now().with_timezone(tz).date_naive();
        FetchWindow::around(today, days_back, days_fw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_resolves_today_in_local_tz() {
        let mut mock_clock = MockClock::new();
        mock_clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(2025, 1, 26, 15, 0, 0).unwrap());

        let calculator = FetchWindowCalculator::new(mock_clock);
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();

        let window = calculator.window(&jst, 7, 14);

        assert_eq!(window.today, date(2025, 1, 27));
        assert_eq!(window.since, date(2025, 1, 20));
        assert_eq!(window.until_exclusive, date(2025, 2, 11));
    }

    #[test]
    fn test_window_stays_on_utc_date_without_offset() {
        let mut mock_clock = MockClock::new();
        mock_clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(2025, 1, 26, 15, 0, 0).unwrap());

        let calculator = FetchWindowCalculator::new(mock_clock);
        let window = calculator.window(&Utc, 1, 1);

        assert_eq!(window.today, date(2025, 1, 26));
    }

    #[test]
    fn test_around_single_day() {
        let window = FetchWindow::around(date(2024, 1, 10), 0, 0);

        assert_eq!(window.since, date(2024, 1, 10));
        assert_eq!(window.until_exclusive, date(2024, 1, 11));
    }

    #[test]
    fn test_around_spans_month_boundary() {
        let window = FetchWindow::around(date(2024, 2, 1), 3, 3);

        assert_eq!(window.since, date(2024, 1, 29));
        assert_eq!(window.until_exclusive, date(2024, 2, 5));
    }
}
