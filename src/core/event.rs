use chrono::NaiveDateTime;

use crate::core::grid::TimeInterval;

/// One calendar event resolved to the schedule's wall-clock time. All-day
/// events arrive as midnight-to-midnight spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ScheduleEvent {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            start: self.start,
            end: self.end,
        }
    }
}
