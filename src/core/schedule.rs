use chrono::{Datelike, Duration, NaiveDate, Timelike};
use log::debug;

use crate::core::event::ScheduleEvent;
use crate::core::grid::{cells_for_time_range, GridOffsets};
use crate::core::plan::{CellRect, RenderPlan};
use crate::shared::utils::date::{date_label, is_weekend, weekday_short_ru};

const ACTIVE_COLOR: &str = "#ff0000";
const INACTIVE_COLOR: &str = "#ffffff";
const TODAY_COLUMN_COLOR: &str = "#f1c40f";
const OTHER_DAY_COLUMN_COLOR: &str = "#0b5394";
const HOLIDAY_COLUMN_COLOR: &str = "#dddddd";

/// First column holding a day; two label columns precede it.
const FIRST_DAY_COLUMN: i64 = 3;
const HEADER_ROW: i64 = 1;
const DATE_ROW: i64 = 2;
const WEEKDAY_ROW: i64 = 3;
const PLACES_ROW: i64 = 4;
/// The half-hour band: 31 rows below the places band.
const TIME_GRID_TOP_ROW: i64 = 5;
const TIME_GRID_ROWS: i64 = 31;
const TIME_GRID_BOTTOM_ROW: i64 = TIME_GRID_TOP_ROW + TIME_GRID_ROWS - 1;

/// Events starting in this local hour carry the day's place label in their
/// title instead of occupying a time slot.
const PLACE_MARKER_HOUR: u32 = 5;

/// Grid-space offsets of the event area; `y` also bounds the header filter
/// inside the grid mapper.
pub const EVENT_GRID_OFFSETS: GridOffsets = GridOffsets { x: 2, y: 4 };

/// Inputs of one rendering pass that are not events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleView {
    pub today: NaiveDate,
    pub days_back: i64,
    pub days_fw: i64,
    /// Column count the schedule sheet currently has; drives the resize ops.
    pub current_columns: i64,
}

impl ScheduleView {
    pub fn days_total(&self) -> i64 {
        self.days_back + self.days_fw + 1
    }

    pub fn target_columns(&self) -> i64 {
        self.days_total() + 2
    }
}

/// Builds the complete, ordered paint plan for one pass: clear the canvas,
/// merge the title row, label the day columns, band the place markers,
/// shade holidays and weekends, then paint every event's half-hour cells.
pub fn build_render_plan(
    view: &ScheduleView,
    events: &[ScheduleEvent],
    holidays: &[ScheduleEvent],
) -> RenderPlan {
    let mut plan = RenderPlan::new();
    push_clear_ops(&mut plan, view);
    push_header_ops(&mut plan, view);
    push_day_grid_ops(&mut plan, view);
    push_places_ops(&mut plan, view, events);
    push_holiday_ops(&mut plan, view, holidays);
    push_event_ops(&mut plan, view, events);
    plan
}

fn push_clear_ops(plan: &mut RenderPlan, view: &ScheduleView) {
    let target = view.target_columns();
    let current = view.current_columns;

    if current > target {
        plan.delete_columns(target + 1, current - target);
    } else if current < target {
        plan.insert_columns(current + 1, target - current);
        // Freshly inserted columns carry no half-hour formatting; tile the
        // two-row template block at (7,3) down their time band.
        plan.copy_format(
            CellRect::new(7, FIRST_DAY_COLUMN, 2, 1),
            CellRect::new(
                TIME_GRID_TOP_ROW,
                current + 1,
                TIME_GRID_ROWS,
                target - current,
            ),
        );
    }

    let day_columns = target - 2;
    plan.fill(
        CellRect::new(PLACES_ROW, FIRST_DAY_COLUMN, TIME_GRID_ROWS + 1, day_columns),
        INACTIVE_COLOR,
    );
    let label_rows = CellRect::new(DATE_ROW, FIRST_DAY_COLUMN, 3, day_columns);
    plan.clear_text(label_rows);
    plan.clear_borders(label_rows);
}

fn push_header_ops(plan: &mut RenderPlan, view: &ScheduleView) {
    let width = view.target_columns() - FIRST_DAY_COLUMN + 1;
    let rect = CellRect::new(HEADER_ROW, FIRST_DAY_COLUMN, 1, width);
    plan.break_apart(rect);
    plan.merge(rect);
}

fn push_day_grid_ops(plan: &mut RenderPlan, view: &ScheduleView) {
    for x in 1..=view.days_total() {
        let date = view.today + Duration::days(x - view.days_back - 1);
        let col = x + 2;
        let color = if date == view.today {
            TODAY_COLUMN_COLOR
        } else {
            OTHER_DAY_COLUMN_COLOR
        };
        plan.fill(CellRect::new(DATE_ROW, col, 2, 1), color);
        plan.write(DATE_ROW, col, date_label(date));
        plan.write(WEEKDAY_ROW, col, weekday_short_ru(date.weekday()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlaceSpan {
    start: i64,
    len: i64,
    title: String,
}

/// Run-length encodes the sorted place-marker titles. Span positions are
/// ordinal: the n-th marker labels the n-th day column, so a day without a
/// marker shifts everything after it left.
fn place_spans(events: &[ScheduleEvent]) -> Vec<PlaceSpan> {
    let mut markers: Vec<&ScheduleEvent> = events
        .iter()
        .filter(|e| e.start.hour() == PLACE_MARKER_HOUR)
        .collect();
    markers.sort_by_key(|e| e.start);

    let mut spans: Vec<PlaceSpan> = Vec::new();
    for marker in markers {
        match spans.last_mut() {
            Some(span) if span.title == marker.title => span.len += 1,
            _ => {
                let start = spans.last().map_or(0, |s| s.start + s.len);
                spans.push(PlaceSpan {
                    start,
                    len: 1,
                    title: marker.title.clone(),
                });
            }
        }
    }
    spans
}

fn push_places_ops(plan: &mut RenderPlan, view: &ScheduleView, events: &[ScheduleEvent]) {
    let day_columns = view.days_total();
    plan.break_apart(CellRect::new(PLACES_ROW, FIRST_DAY_COLUMN, 1, day_columns));

    for span in place_spans(events) {
        if span.start >= day_columns {
            debug!("place span '{}' starts past the last day column", span.title);
            continue;
        }
        let len = span.len.min(day_columns - span.start);
        let rect = CellRect::new(PLACES_ROW, span.start + FIRST_DAY_COLUMN, 1, len);
        plan.merge(rect);
        plan.write(PLACES_ROW, rect.col, span.title.to_uppercase());
        plan.center_text(rect);
        plan.box_border(rect);
    }
}

fn push_holiday_ops(plan: &mut RenderPlan, view: &ScheduleView, holidays: &[ScheduleEvent]) {
    let mut dates: Vec<NaiveDate> = holidays.iter().map(|e| e.start.date()).collect();

    let mut day = view.today - Duration::days(view.days_back);
    let last = view.today + Duration::days(view.days_fw);
    while day <= last {
        if is_weekend(day) {
            dates.push(day);
        }
        day += Duration::days(1);
    }

    for date in dates {
        let col = FIRST_DAY_COLUMN + view.days_back + (date - view.today).num_days();
        if col < FIRST_DAY_COLUMN || col > view.target_columns() {
            debug!("holiday {} falls outside the visible window", date);
            continue;
        }
        plan.fill(
            CellRect::new(TIME_GRID_TOP_ROW, col, TIME_GRID_ROWS, 1),
            HOLIDAY_COLUMN_COLOR,
        );
    }
}

fn push_event_ops(plan: &mut RenderPlan, view: &ScheduleView, events: &[ScheduleEvent]) {
    for event in events {
        let cells = cells_for_time_range(
            view.today,
            view.days_back,
            &event.interval(),
            EVENT_GRID_OFFSETS,
        );
        for cell in cells {
            // The display surface is 1-indexed; grid math is 0-indexed.
            let row = cell.y + 1;
            let col = cell.x + 1;
            if row > TIME_GRID_BOTTOM_ROW || col > view.target_columns() {
                debug!("cell R{}C{} of '{}' is off the surface", row, col, event.title);
                continue;
            }
            plan.fill(CellRect::cell(row, col), ACTIVE_COLOR);
        }
    }
}
