use serde_json::Value;
use thiserror::Error;

/// A1 range covering every cell the settings sheet uses.
pub const SETTINGS_RANGE: &str = "A1:C5";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings cell {0} is empty; please fill it in on the settings sheet.")]
    MissingCell(&'static str),

    #[error("Settings cell {0} holds '{1}'; expected a non-negative day count.")]
    InvalidDayCount(&'static str, String),
}

/// Per-spreadsheet knobs read from fixed cells of the settings sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSettings {
    pub days_back: i64,
    pub days_fw: i64,
    pub calendar_id: String,
    pub holidays_calendar_id: String,
}

impl ScheduleSettings {
    /// Parses the cell grid returned for [`SETTINGS_RANGE`]. The values API
    /// omits trailing empty rows and cells, so short rows read as missing.
    pub fn from_cells(cells: &[Vec<Value>]) -> Result<Self, SettingsError> {
        Ok(ScheduleSettings {
            days_back: day_count(cells, 2, 1, "A2")?,
            days_fw: day_count(cells, 2, 3, "C2")?,
            calendar_id: cell_text(cells, 4, 2).ok_or(SettingsError::MissingCell("B4"))?,
            holidays_calendar_id: cell_text(cells, 5, 2)
                .ok_or(SettingsError::MissingCell("B5"))?,
        })
    }
}

fn cell_text(cells: &[Vec<Value>], row: usize, col: usize) -> Option<String> {
    let text = match cells.get(row - 1)?.get(col - 1)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn day_count(
    cells: &[Vec<Value>],
    row: usize,
    col: usize,
    name: &'static str,
) -> Result<i64, SettingsError> {
    let text = cell_text(cells, row, col).ok_or(SettingsError::MissingCell(name))?;
    match text.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(SettingsError::InvalidDayCount(name, text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid() -> Vec<Vec<Value>> {
        vec![
            vec![json!("days back"), json!(""), json!("days forward")],
            vec![json!("7"), json!(""), json!("14")],
            vec![json!("calendar")],
            vec![json!(""), json!("team@example.com")],
            vec![json!(""), json!("holidays@example.com")],
        ]
    }

    #[test]
    fn test_parses_full_grid() {
        let settings = ScheduleSettings::from_cells(&grid()).unwrap();

        assert_eq!(
            settings,
            ScheduleSettings {
                days_back: 7,
                days_fw: 14,
                calendar_id: "team@example.com".to_string(),
                holidays_calendar_id: "holidays@example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_accepts_numeric_cells() {
        let mut cells = grid();
        cells[1][0] = json!(7);
        cells[1][2] = json!(14);

        let settings = ScheduleSettings::from_cells(&cells).unwrap();
        assert_eq!(settings.days_back, 7);
        assert_eq!(settings.days_fw, 14);
    }

    #[test]
    fn test_trims_whitespace() {
        let mut cells = grid();
        cells[3][1] = json!("  team@example.com  ");

        let settings = ScheduleSettings::from_cells(&cells).unwrap();
        assert_eq!(settings.calendar_id, "team@example.com");
    }

    #[test]
    fn test_truncated_rows_read_as_missing() {
        let cells = vec![vec![json!("header")], vec![json!("7"), json!(""), json!("14")]];

        let err = ScheduleSettings::from_cells(&cells).unwrap_err();
        assert!(matches!(err, SettingsError::MissingCell("B4")));
    }

    #[test]
    fn test_short_row_reads_as_missing() {
        let mut cells = grid();
        cells[1] = vec![json!("7")];

        let err = ScheduleSettings::from_cells(&cells).unwrap_err();
        assert!(matches!(err, SettingsError::MissingCell("C2")));
    }

    #[test]
    fn test_empty_day_count_is_missing() {
        let mut cells = grid();
        cells[1][0] = json!("   ");

        let err = ScheduleSettings::from_cells(&cells).unwrap_err();
        assert!(matches!(err, SettingsError::MissingCell("A2")));
    }

    #[test]
    fn test_non_numeric_day_count_is_invalid() {
        let mut cells = grid();
        cells[1][2] = json!("soon");

        let err = ScheduleSettings::from_cells(&cells).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidDayCount("C2", _)));
    }

    #[test]
    fn test_negative_day_count_is_invalid() {
        let mut cells = grid();
        cells[1][0] = json!("-3");

        let err = ScheduleSettings::from_cells(&cells).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidDayCount("A2", _)));
    }
}
