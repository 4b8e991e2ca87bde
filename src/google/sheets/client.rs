use reqwest::Client;
use thiserror::Error;

use crate::core::plan::{CellRect, PaintOp, RenderPlan};

use super::model::{
    BatchUpdateRequest, Border, CellData, CellFormat, Color, CopyPasteRequest,
    DeleteDimensionRequest, DimensionRange, ExtendedValue, GridRange, InsertDimensionRequest,
    MergeCellsRequest, RepeatCellRequest, Request, RowData, Spreadsheet, UnmergeCellsRequest,
    UpdateBordersRequest, UpdateCellsRequest, ValueRange,
};

#[derive(Error, Debug)]
pub enum GoogleSheetsError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Sheet '{0}' was not found in the spreadsheet; please check the sheet names in your config.")]
    SheetNotFound(String),

    #[error("invalid color literal '{0}'")]
    InvalidColor(String),
}

pub struct GoogleSheetsClient {
    client: Client,
    access_token: String,
}

impl GoogleSheetsClient {
    pub fn new<T: Into<String>>(token: T) -> Self {
        GoogleSheetsClient {
            client: Client::new(),
            access_token: token.into(),
        }
    }

    pub async fn fetch_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> Result<Spreadsheet, GoogleSheetsError> {
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}",
            spreadsheet_id
        );

        let spreadsheet = self
            .client
            .get(&url)
            .bearer_auth(self.access_token.clone())
            .query(&[("fields", "sheets.properties")])
            .send()
            .await?
            .error_for_status()?
            .json::<Spreadsheet>()
            .await?;

        Ok(spreadsheet)
    }

    pub async fn read_range(
        &self,
        spreadsheet_id: &str,
        sheet_title: &str,
        cells: &str,
    ) -> Result<ValueRange, GoogleSheetsError> {
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}",
            spreadsheet_id,
            a1_range(sheet_title, cells)
        );

        let value_range = self
            .client
            .get(&url)
            .bearer_auth(self.access_token.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<ValueRange>()
            .await?;

        Ok(value_range)
    }

    /// Replays the plan onto one sheet as a single batchUpdate. Returns the
    /// number of API requests sent.
    pub async fn apply_plan(
        &self,
        spreadsheet_id: &str,
        sheet_id: i64,
        plan: &RenderPlan,
    ) -> Result<usize, GoogleSheetsError> {
        let requests = requests_for_plan(sheet_id, plan)?;
        if requests.is_empty() {
            return Ok(0);
        }

        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}:batchUpdate",
            spreadsheet_id
        );
        let sent = requests.len();

        self.client
            .post(&url)
            .bearer_auth(self.access_token.clone())
            .json(&BatchUpdateRequest { requests })
            .send()
            .await?
            .error_for_status()?;

        Ok(sent)
    }
}

/// Quotes a sheet title into an A1 range, doubling embedded quotes.
fn a1_range(sheet_title: &str, cells: &str) -> String {
    format!("'{}'!{}", sheet_title.replace('\'', "''"), cells)
}

pub fn requests_for_plan(
    sheet_id: i64,
    plan: &RenderPlan,
) -> Result<Vec<Request>, GoogleSheetsError> {
    let mut requests = Vec::with_capacity(plan.len());
    for op in &plan.ops {
        if let Some(request) = request_for_op(sheet_id, op)? {
            requests.push(request);
        }
    }
    Ok(requests)
}

fn request_for_op(sheet_id: i64, op: &PaintOp) -> Result<Option<Request>, GoogleSheetsError> {
    let request = match op {
        PaintOp::Fill { rect, color } => Request {
            repeat_cell: Some(RepeatCellRequest {
                range: grid_range(sheet_id, rect),
                cell: CellData {
                    user_entered_format: Some(CellFormat {
                        background_color: Some(color_from_hex(color)?),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                fields: "userEnteredFormat.backgroundColor".to_string(),
            }),
            ..Default::default()
        },
        PaintOp::Write { row, col, text } => Request {
            update_cells: Some(UpdateCellsRequest {
                range: grid_range(sheet_id, &CellRect::cell(*row, *col)),
                rows: vec![RowData {
                    values: vec![CellData {
                        user_entered_value: Some(ExtendedValue {
                            string_value: text.clone(),
                        }),
                        ..Default::default()
                    }],
                }],
                fields: "userEnteredValue".to_string(),
            }),
            ..Default::default()
        },
        PaintOp::ClearText { rect } => Request {
            update_cells: Some(UpdateCellsRequest {
                range: grid_range(sheet_id, rect),
                rows: Vec::new(),
                fields: "userEnteredValue".to_string(),
            }),
            ..Default::default()
        },
        PaintOp::Merge { rect } => {
            // The API rejects single-cell merges; they are no-ops anyway.
            if rect.rows * rect.cols <= 1 {
                return Ok(None);
            }
            Request {
                merge_cells: Some(MergeCellsRequest {
                    range: grid_range(sheet_id, rect),
                    merge_type: "MERGE_ALL".to_string(),
                }),
                ..Default::default()
            }
        }
        PaintOp::BreakApart { rect } => Request {
            unmerge_cells: Some(UnmergeCellsRequest {
                range: grid_range(sheet_id, rect),
            }),
            ..Default::default()
        },
        PaintOp::CenterText { rect } => Request {
            repeat_cell: Some(RepeatCellRequest {
                range: grid_range(sheet_id, rect),
                cell: CellData {
                    user_entered_format: Some(CellFormat {
                        horizontal_alignment: Some("CENTER".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                fields: "userEnteredFormat.horizontalAlignment".to_string(),
            }),
            ..Default::default()
        },
        PaintOp::BoxBorder { rect } => {
            let solid = Border {
                style: "SOLID".to_string(),
            };
            Request {
                update_borders: Some(UpdateBordersRequest {
                    range: grid_range(sheet_id, rect),
                    top: Some(solid.clone()),
                    bottom: Some(solid.clone()),
                    left: Some(solid.clone()),
                    right: Some(solid),
                    inner_horizontal: None,
                    inner_vertical: None,
                }),
                ..Default::default()
            }
        }
        PaintOp::ClearBorders { rect } => {
            let none = Border {
                style: "NONE".to_string(),
            };
            Request {
                update_borders: Some(UpdateBordersRequest {
                    range: grid_range(sheet_id, rect),
                    top: Some(none.clone()),
                    bottom: Some(none.clone()),
                    left: Some(none.clone()),
                    right: Some(none.clone()),
                    inner_horizontal: Some(none.clone()),
                    inner_vertical: Some(none),
                }),
                ..Default::default()
            }
        }
        PaintOp::InsertColumns { at, count } => Request {
            insert_dimension: Some(InsertDimensionRequest {
                range: column_range(sheet_id, *at, *count),
                inherit_from_before: true,
            }),
            ..Default::default()
        },
        PaintOp::DeleteColumns { at, count } => Request {
            delete_dimension: Some(DeleteDimensionRequest {
                range: column_range(sheet_id, *at, *count),
            }),
            ..Default::default()
        },
        PaintOp::CopyFormat { src, dest } => Request {
            copy_paste: Some(CopyPasteRequest {
                source: grid_range(sheet_id, src),
                destination: grid_range(sheet_id, dest),
                paste_type: "PASTE_FORMAT".to_string(),
                paste_orientation: "NORMAL".to_string(),
            }),
            ..Default::default()
        },
    };

    Ok(Some(request))
}

/// Plans address cells 1-based and inclusive; the API wants 0-based and
/// end-exclusive.
fn grid_range(sheet_id: i64, rect: &CellRect) -> GridRange {
    GridRange {
        sheet_id,
        start_row_index: rect.row - 1,
        end_row_index: rect.row - 1 + rect.rows,
        start_column_index: rect.col - 1,
        end_column_index: rect.col - 1 + rect.cols,
    }
}

fn column_range(sheet_id: i64, at: i64, count: i64) -> DimensionRange {
    DimensionRange {
        sheet_id,
        dimension: "COLUMNS".to_string(),
        start_index: at - 1,
        end_index: at - 1 + count,
    }
}

fn color_from_hex(hex: &str) -> Result<Color, GoogleSheetsError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(GoogleSheetsError::InvalidColor(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map(|byte| f32::from(byte) / 255.0)
            .map_err(|_| GoogleSheetsError::InvalidColor(hex.to_string()))
    };
    Ok(Color {
        red: channel(0..2)?,
        green: channel(2..4)?,
        blue: channel(4..6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grid_range_is_zero_based_half_open() {
        let range = grid_range(7, &CellRect::new(5, 3, 31, 1));

        assert_eq!(
            range,
            GridRange {
                sheet_id: 7,
                start_row_index: 4,
                end_row_index: 35,
                start_column_index: 2,
                end_column_index: 3,
            }
        );
    }

    #[test]
    fn test_a1_range_quotes_cyrillic_titles() {
        assert_eq!(a1_range("Настройки", "A1:C5"), "'Настройки'!A1:C5");
    }

    #[test]
    fn test_a1_range_doubles_embedded_quotes() {
        assert_eq!(a1_range("it's mine", "A1"), "'it''s mine'!A1");
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(
            color_from_hex("#ff0000").unwrap(),
            Color {
                red: 1.0,
                green: 0.0,
                blue: 0.0,
            }
        );
        let gray = color_from_hex("#dddddd").unwrap();
        assert!((gray.red - 0.866_666_7).abs() < 1e-6);
        assert!(color_from_hex("#f1c").is_err());
        assert!(color_from_hex("notahex").is_err());
    }

    #[test]
    fn test_fill_maps_to_repeat_cell() {
        let op = PaintOp::Fill {
            rect: CellRect::new(2, 3, 2, 1),
            color: "#f1c40f",
        };

        let request = request_for_op(0, &op).unwrap().unwrap();
        let value = serde_json::to_value(&request).unwrap();
        let repeat = &value["repeatCell"];

        assert_eq!(
            repeat["range"],
            json!({
                "sheetId": 0,
                "startRowIndex": 1,
                "endRowIndex": 3,
                "startColumnIndex": 2,
                "endColumnIndex": 3
            })
        );
        assert_eq!(repeat["fields"], "userEnteredFormat.backgroundColor");
        assert_eq!(
            repeat["cell"]["userEnteredFormat"]["backgroundColor"],
            serde_json::to_value(color_from_hex("#f1c40f").unwrap()).unwrap()
        );
    }

    #[test]
    fn test_write_maps_to_update_cells_with_one_row() {
        let op = PaintOp::Write {
            row: 2,
            col: 3,
            text: "10.01".to_string(),
        };

        let request = request_for_op(0, &op).unwrap().unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["updateCells"]["rows"],
            json!([{ "values": [{ "userEnteredValue": { "stringValue": "10.01" } }] }])
        );
        assert_eq!(value["updateCells"]["fields"], "userEnteredValue");
    }

    #[test]
    fn test_clear_text_sends_no_rows() {
        let op = PaintOp::ClearText {
            rect: CellRect::new(2, 3, 3, 5),
        };

        let request = request_for_op(0, &op).unwrap().unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert!(value["updateCells"].get("rows").is_none());
    }

    #[test]
    fn test_single_cell_merge_is_dropped() {
        let op = PaintOp::Merge {
            rect: CellRect::cell(4, 3),
        };
        assert!(request_for_op(0, &op).unwrap().is_none());

        let op = PaintOp::Merge {
            rect: CellRect::new(4, 3, 1, 2),
        };
        assert!(request_for_op(0, &op).unwrap().is_some());
    }

    #[test]
    fn test_box_border_sets_only_the_outline() {
        let op = PaintOp::BoxBorder {
            rect: CellRect::new(4, 3, 1, 2),
        };

        let request = request_for_op(0, &op).unwrap().unwrap();
        let value = serde_json::to_value(&request).unwrap();
        let borders = &value["updateBorders"];

        assert_eq!(borders["top"]["style"], "SOLID");
        assert_eq!(borders["right"]["style"], "SOLID");
        assert!(borders.get("innerVertical").is_none());
    }

    #[test]
    fn test_clear_borders_sets_all_sides_to_none() {
        let op = PaintOp::ClearBorders {
            rect: CellRect::new(2, 3, 3, 5),
        };

        let request = request_for_op(0, &op).unwrap().unwrap();
        let value = serde_json::to_value(&request).unwrap();
        let borders = &value["updateBorders"];

        for side in [
            "top",
            "bottom",
            "left",
            "right",
            "innerHorizontal",
            "innerVertical",
        ] {
            assert_eq!(borders[side]["style"], "NONE", "side {side}");
        }
    }

    #[test]
    fn test_insert_columns_inherits_from_before() {
        let op = PaintOp::InsertColumns { at: 6, count: 3 };

        let request = request_for_op(0, &op).unwrap().unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["insertDimension"],
            json!({
                "range": {
                    "sheetId": 0,
                    "dimension": "COLUMNS",
                    "startIndex": 5,
                    "endIndex": 8
                },
                "inheritFromBefore": true
            })
        );
    }

    #[test]
    fn test_requests_for_plan_skips_degenerate_ops() {
        let mut plan = RenderPlan::new();
        plan.merge(CellRect::cell(4, 3));
        plan.fill(CellRect::new(5, 3, 31, 1), "#dddddd");

        let requests = requests_for_plan(0, &plan).unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].repeat_cell.is_some());
    }
}
