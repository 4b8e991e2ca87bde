use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Debug)]
pub struct BatchUpdateRequest {
    #[serde(rename = "requests")]
    pub requests: Vec<Request>,
}

/// One batchUpdate entry. Exactly one field is set per request; the rest
/// stay off the wire.
#[derive(Serialize, Debug, Default)]
pub struct Request {
    #[serde(rename = "repeatCell", skip_serializing_if = "Option::is_none")]
    pub repeat_cell: Option<RepeatCellRequest>,
    #[serde(rename = "updateCells", skip_serializing_if = "Option::is_none")]
    pub update_cells: Option<UpdateCellsRequest>,
    #[serde(rename = "mergeCells", skip_serializing_if = "Option::is_none")]
    pub merge_cells: Option<MergeCellsRequest>,
    #[serde(rename = "unmergeCells", skip_serializing_if = "Option::is_none")]
    pub unmerge_cells: Option<UnmergeCellsRequest>,
    #[serde(rename = "updateBorders", skip_serializing_if = "Option::is_none")]
    pub update_borders: Option<UpdateBordersRequest>,
    #[serde(rename = "insertDimension", skip_serializing_if = "Option::is_none")]
    pub insert_dimension: Option<InsertDimensionRequest>,
    #[serde(rename = "deleteDimension", skip_serializing_if = "Option::is_none")]
    pub delete_dimension: Option<DeleteDimensionRequest>,
    #[serde(rename = "copyPaste", skip_serializing_if = "Option::is_none")]
    pub copy_paste: Option<CopyPasteRequest>,
}

#[derive(Serialize, Debug)]
pub struct RepeatCellRequest {
    #[serde(rename = "range")]
    pub range: GridRange,
    #[serde(rename = "cell")]
    pub cell: CellData,
    #[serde(rename = "fields")]
    pub fields: String,
}

/// With `rows` absent, every field named in `fields` is cleared across the
/// range.
#[derive(Serialize, Debug)]
pub struct UpdateCellsRequest {
    #[serde(rename = "range")]
    pub range: GridRange,
    #[serde(rename = "rows", skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<RowData>,
    #[serde(rename = "fields")]
    pub fields: String,
}

#[derive(Serialize, Debug)]
pub struct MergeCellsRequest {
    #[serde(rename = "range")]
    pub range: GridRange,
    #[serde(rename = "mergeType")]
    pub merge_type: String,
}

#[derive(Serialize, Debug)]
pub struct UnmergeCellsRequest {
    #[serde(rename = "range")]
    pub range: GridRange,
}

/// Unset sides are left untouched; clearing a side takes an explicit NONE
/// style.
#[derive(Serialize, Debug)]
pub struct UpdateBordersRequest {
    #[serde(rename = "range")]
    pub range: GridRange,
    #[serde(rename = "top", skip_serializing_if = "Option::is_none")]
    pub top: Option<Border>,
    #[serde(rename = "bottom", skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Border>,
    #[serde(rename = "left", skip_serializing_if = "Option::is_none")]
    pub left: Option<Border>,
    #[serde(rename = "right", skip_serializing_if = "Option::is_none")]
    pub right: Option<Border>,
    #[serde(rename = "innerHorizontal", skip_serializing_if = "Option::is_none")]
    pub inner_horizontal: Option<Border>,
    #[serde(rename = "innerVertical", skip_serializing_if = "Option::is_none")]
    pub inner_vertical: Option<Border>,
}

#[derive(Serialize, Debug, Clone)]
pub struct Border {
    #[serde(rename = "style")]
    pub style: String,
}

#[derive(Serialize, Debug)]
pub struct InsertDimensionRequest {
    #[serde(rename = "range")]
    pub range: DimensionRange,
    #[serde(rename = "inheritFromBefore")]
    pub inherit_from_before: bool,
}

#[derive(Serialize, Debug)]
pub struct DeleteDimensionRequest {
    #[serde(rename = "range")]
    pub range: DimensionRange,
}

#[derive(Serialize, Debug)]
pub struct DimensionRange {
    #[serde(rename = "sheetId")]
    pub sheet_id: i64,
    #[serde(rename = "dimension")]
    pub dimension: String,
    #[serde(rename = "startIndex")]
    pub start_index: i64,
    #[serde(rename = "endIndex")]
    pub end_index: i64,
}

#[derive(Serialize, Debug)]
pub struct CopyPasteRequest {
    #[serde(rename = "source")]
    pub source: GridRange,
    #[serde(rename = "destination")]
    pub destination: GridRange,
    #[serde(rename = "pasteType")]
    pub paste_type: String,
    #[serde(rename = "pasteOrientation")]
    pub paste_orientation: String,
}

/// Zero-based, end-exclusive cell range.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GridRange {
    #[serde(rename = "sheetId")]
    pub sheet_id: i64,
    #[serde(rename = "startRowIndex")]
    pub start_row_index: i64,
    #[serde(rename = "endRowIndex")]
    pub end_row_index: i64,
    #[serde(rename = "startColumnIndex")]
    pub start_column_index: i64,
    #[serde(rename = "endColumnIndex")]
    pub end_column_index: i64,
}

#[derive(Serialize, Debug)]
pub struct RowData {
    #[serde(rename = "values")]
    pub values: Vec<CellData>,
}

#[derive(Serialize, Debug, Default)]
pub struct CellData {
    #[serde(rename = "userEnteredValue", skip_serializing_if = "Option::is_none")]
    pub user_entered_value: Option<ExtendedValue>,
    #[serde(rename = "userEnteredFormat", skip_serializing_if = "Option::is_none")]
    pub user_entered_format: Option<CellFormat>,
}

#[derive(Serialize, Debug)]
pub struct ExtendedValue {
    #[serde(rename = "stringValue")]
    pub string_value: String,
}

#[derive(Serialize, Debug, Default)]
pub struct CellFormat {
    #[serde(rename = "backgroundColor", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(
        rename = "horizontalAlignment",
        skip_serializing_if = "Option::is_none"
    )]
    pub horizontal_alignment: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Color {
    #[serde(rename = "red")]
    pub red: f32,
    #[serde(rename = "green")]
    pub green: f32,
    #[serde(rename = "blue")]
    pub blue: f32,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct Spreadsheet {
    #[serde(rename = "spreadsheetId")]
    pub spreadsheet_id: Option<String>,
    #[serde(rename = "sheets")]
    pub sheets: Vec<Sheet>,
}

impl Spreadsheet {
    pub fn sheet_titled(&self, title: &str) -> Option<&SheetProperties> {
        self.sheets
            .iter()
            .map(|sheet| &sheet.properties)
            .find(|props| props.title == title)
    }
}

#[derive(Deserialize, Debug)]
pub struct Sheet {
    #[serde(rename = "properties")]
    pub properties: SheetProperties,
}

#[derive(Deserialize, Debug)]
pub struct SheetProperties {
    #[serde(rename = "sheetId")]
    pub sheet_id: i64,
    #[serde(rename = "title")]
    pub title: String,
    #[serde(rename = "gridProperties")]
    pub grid_properties: Option<GridProperties>,
}

#[derive(Deserialize, Debug)]
pub struct GridProperties {
    #[serde(rename = "rowCount")]
    pub row_count: Option<i64>,
    #[serde(rename = "columnCount")]
    pub column_count: Option<i64>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct ValueRange {
    #[serde(rename = "range")]
    pub range: Option<String>,
    #[serde(rename = "majorDimension")]
    pub major_dimension: Option<String>,
    #[serde(rename = "values")]
    pub values: Option<Vec<Vec<Value>>>,
}

impl ValueRange {
    /// `values` is absent entirely when the range holds no data.
    pub fn rows(&self) -> &[Vec<Value>] {
        self.values.as_deref().unwrap_or(&[])
    }
}
