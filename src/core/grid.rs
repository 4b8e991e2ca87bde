use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Wall-clock hour mapped to row 0 of the time axis. Two rows per hour, so
/// hour `H` lands on row `2 * (H - BASE_HOUR)` before offsets.
pub const BASE_HOUR: i64 = 9;

/// A calendar event's span in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Column/row of the grid's top-left usable cell, in 0-based grid space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOffsets {
    pub x: i64,
    pub y: i64,
}

/// One (day-column, time-row) unit of the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub x: i64,
    pub y: i64,
}

/// Maps a time interval onto the day/half-hour grid.
///
/// One column per calendar day counted from `reference` (shifted right by
/// `day_offset`), one row per half hour counted from [`BASE_HOUR`]. The start
/// minute rounds down and the end minute rounds up, so an interval covers
/// every half-hour slot it touches. Rows at or above `offsets.y` fall in the
/// header region and are dropped.
///
/// Total over its inputs: cross-day intervals, intervals before the visible
/// window, and empty or reversed intervals all yield an empty set rather
/// than an error.
pub fn cells_for_time_range(
    reference: NaiveDate,
    day_offset: i64,
    interval: &TimeInterval,
    offsets: GridOffsets,
) -> Vec<GridCell> {
    // Cross-midnight intervals are not rendered. The check compares the day
    // of month only; a month-spanning interval landing on the same day
    // number slips through.
    if interval.end.day() != interval.start.day() {
        return Vec::new();
    }

    // Date subtraction is exact in whole days; a raw datetime delta would
    // truncate toward zero and mis-floor starts before the reference.
    let day = day_offset + (interval.start.date() - reference).num_days();
    if day < 0 {
        return Vec::new();
    }

    let y_start = offsets.y - 2 * BASE_HOUR
        + 2 * i64::from(interval.start.hour())
        + i64::from(interval.start.minute() / 30);
    let y_end = offsets.y - 2 * BASE_HOUR
        + 2 * i64::from(interval.end.hour())
        + i64::from(interval.end.minute().div_ceil(30));

    let x = day + offsets.x;
    (y_start..y_end)
        .filter(|&y| y > offsets.y)
        .map(|y| GridCell { x, y })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSETS: GridOffsets = GridOffsets { x: 2, y: 4 };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(hour, minute, 0).unwrap()
    }

    fn span(start: NaiveDateTime, end: NaiveDateTime) -> TimeInterval {
        TimeInterval { start, end }
    }

    #[test]
    fn test_ninety_minute_event_covers_three_half_hours() {
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            3,
            &span(at(2024, 1, 10, 10, 0), at(2024, 1, 10, 11, 30)),
            OFFSETS,
        );

        assert_eq!(
            cells,
            vec![
                GridCell { x: 5, y: 6 },
                GridCell { x: 5, y: 7 },
                GridCell { x: 5, y: 8 },
            ]
        );
    }

    #[test]
    fn test_one_hour_event_covers_two_half_hours() {
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            3,
            &span(at(2024, 1, 10, 10, 0), at(2024, 1, 10, 11, 0)),
            OFFSETS,
        );

        assert_eq!(cells, vec![GridCell { x: 5, y: 6 }, GridCell { x: 5, y: 7 }]);
    }

    #[test]
    fn test_cross_day_interval_yields_nothing() {
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            3,
            &span(at(2024, 1, 10, 9, 0), at(2024, 1, 9, 23, 0)),
            OFFSETS,
        );

        assert!(cells.is_empty());
    }

    #[test]
    fn test_interval_before_the_window_yields_nothing() {
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            0,
            &span(at(2024, 1, 9, 10, 0), at(2024, 1, 9, 11, 0)),
            OFFSETS,
        );

        assert!(cells.is_empty());
    }

    #[test]
    fn test_start_at_base_hour_loses_its_first_row_to_the_header() {
        // 09:00 computes y_start == offsets.y, which the header filter drops.
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            0,
            &span(at(2024, 1, 10, 9, 0), at(2024, 1, 10, 10, 0)),
            OFFSETS,
        );

        assert_eq!(cells, vec![GridCell { x: 2, y: 5 }]);
    }

    #[test]
    fn test_event_entirely_above_base_hour_yields_nothing() {
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            0,
            &span(at(2024, 1, 10, 5, 0), at(2024, 1, 10, 5, 30)),
            OFFSETS,
        );

        assert!(cells.is_empty());
    }

    #[test]
    fn test_zero_length_interval_yields_nothing() {
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            3,
            &span(at(2024, 1, 10, 10, 0), at(2024, 1, 10, 10, 0)),
            OFFSETS,
        );

        assert!(cells.is_empty());
    }

    #[test]
    fn test_reversed_same_day_interval_yields_nothing() {
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            3,
            &span(at(2024, 1, 10, 12, 0), at(2024, 1, 10, 10, 0)),
            OFFSETS,
        );

        assert!(cells.is_empty());
    }

    #[test]
    fn test_start_minute_floors_and_end_minute_ceils() {
        // 10:15-10:45 touches both the 10:00 and the 10:30 slot.
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            3,
            &span(at(2024, 1, 10, 10, 15), at(2024, 1, 10, 10, 45)),
            OFFSETS,
        );

        assert_eq!(cells, vec![GridCell { x: 5, y: 6 }, GridCell { x: 5, y: 7 }]);
    }

    #[test]
    fn test_rows_are_contiguous_and_share_one_column() {
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            3,
            &span(at(2024, 1, 10, 12, 5), at(2024, 1, 10, 14, 50)),
            OFFSETS,
        );

        // ceil(50/30) + 2*14 - floor(5/30) - 2*12 = 6 rows.
        assert_eq!(cells.len(), 6);
        assert!(cells.iter().all(|c| c.x == cells[0].x));
        for pair in cells.windows(2) {
            assert_eq!(pair[1].y, pair[0].y + 1);
        }
        assert_eq!(cells[0].y, 10);
    }

    #[test]
    fn test_day_offset_shifts_the_column() {
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            3,
            &span(at(2024, 1, 12, 10, 0), at(2024, 1, 12, 10, 30)),
            OFFSETS,
        );

        // day = 3 + 2, column = day + x offset.
        assert_eq!(cells, vec![GridCell { x: 7, y: 6 }]);
    }

    #[test]
    fn test_month_spanning_interval_with_equal_day_of_month_slips_through() {
        // The cross-day check compares day of month only; Jan 10 -> Feb 10
        // passes it and renders from the start day's hours.
        let cells = cells_for_time_range(
            date(2024, 1, 10),
            0,
            &span(at(2024, 1, 10, 10, 0), at(2024, 2, 10, 10, 30)),
            OFFSETS,
        );

        assert_eq!(cells, vec![GridCell { x: 2, y: 6 }]);
    }
}
