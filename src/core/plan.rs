use std::fmt;

/// A 1-based inclusive cell rectangle in display coordinates, following the
/// spreadsheet convention of (row, column, row count, column count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub row: i64,
    pub col: i64,
    pub rows: i64,
    pub cols: i64,
}

impl CellRect {
    pub fn new(row: i64, col: i64, rows: i64, cols: i64) -> Self {
        Self {
            row,
            col,
            rows,
            cols,
        }
    }

    /// A single display cell.
    pub fn cell(row: i64, col: i64) -> Self {
        Self::new(row, col, 1, 1)
    }
}

impl fmt::Display for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}C{} {}x{}", self.row, self.col, self.rows, self.cols)
    }
}

/// One step of a rendering pass. Colors are `#rrggbb` literals; the sheet
/// client converts them when the plan is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintOp {
    Fill { rect: CellRect, color: &'static str },
    Write { row: i64, col: i64, text: String },
    ClearText { rect: CellRect },
    Merge { rect: CellRect },
    BreakApart { rect: CellRect },
    CenterText { rect: CellRect },
    BoxBorder { rect: CellRect },
    ClearBorders { rect: CellRect },
    InsertColumns { at: i64, count: i64 },
    DeleteColumns { at: i64, count: i64 },
    CopyFormat { src: CellRect, dest: CellRect },
}

impl fmt::Display for PaintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintOp::Fill { rect, color } => write!(f, "fill {} {}", rect, color),
            PaintOp::Write { row, col, text } => write!(f, "write R{}C{} {:?}", row, col, text),
            PaintOp::ClearText { rect } => write!(f, "clear-text {}", rect),
            PaintOp::Merge { rect } => write!(f, "merge {}", rect),
            PaintOp::BreakApart { rect } => write!(f, "break-apart {}", rect),
            PaintOp::CenterText { rect } => write!(f, "center {}", rect),
            PaintOp::BoxBorder { rect } => write!(f, "box-border {}", rect),
            PaintOp::ClearBorders { rect } => write!(f, "clear-borders {}", rect),
            PaintOp::InsertColumns { at, count } => {
                write!(f, "insert-columns C{} x{}", at, count)
            }
            PaintOp::DeleteColumns { at, count } => {
                write!(f, "delete-columns C{} x{}", at, count)
            }
            PaintOp::CopyFormat { src, dest } => write!(f, "copy-format {} -> {}", src, dest),
        }
    }
}

/// The ordered paint operations of one rendering pass. Order is significant:
/// column resizes must land before anything painted into the resized area.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenderPlan {
    pub ops: Vec<PaintOp>,
}

impl RenderPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn fill(&mut self, rect: CellRect, color: &'static str) {
        self.ops.push(PaintOp::Fill { rect, color });
    }

    pub fn write<T: Into<String>>(&mut self, row: i64, col: i64, text: T) {
        self.ops.push(PaintOp::Write {
            row,
            col,
            text: text.into(),
        });
    }

    pub fn clear_text(&mut self, rect: CellRect) {
        self.ops.push(PaintOp::ClearText { rect });
    }

    pub fn merge(&mut self, rect: CellRect) {
        self.ops.push(PaintOp::Merge { rect });
    }

    pub fn break_apart(&mut self, rect: CellRect) {
        self.ops.push(PaintOp::BreakApart { rect });
    }

    pub fn center_text(&mut self, rect: CellRect) {
        self.ops.push(PaintOp::CenterText { rect });
    }

    pub fn box_border(&mut self, rect: CellRect) {
        self.ops.push(PaintOp::BoxBorder { rect });
    }

    pub fn clear_borders(&mut self, rect: CellRect) {
        self.ops.push(PaintOp::ClearBorders { rect });
    }

    pub fn insert_columns(&mut self, at: i64, count: i64) {
        self.ops.push(PaintOp::InsertColumns { at, count });
    }

    pub fn delete_columns(&mut self, at: i64, count: i64) {
        self.ops.push(PaintOp::DeleteColumns { at, count });
    }

    pub fn copy_format(&mut self, src: CellRect, dest: CellRect) {
        self.ops.push(PaintOp::CopyFormat { src, dest });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell_rect() {
        assert_eq!(CellRect::cell(7, 4), CellRect::new(7, 4, 1, 1));
    }

    #[test]
    fn test_plan_keeps_push_order() {
        let mut plan = RenderPlan::new();
        plan.delete_columns(6, 2);
        plan.fill(CellRect::new(4, 3, 32, 3), "#ffffff");
        plan.write(2, 3, "10.01");

        assert_eq!(plan.len(), 3);
        assert!(matches!(plan.ops[0], PaintOp::DeleteColumns { .. }));
        assert!(matches!(plan.ops[1], PaintOp::Fill { .. }));
        assert!(matches!(plan.ops[2], PaintOp::Write { .. }));
    }

    #[test]
    fn test_op_display_forms() {
        let fill = PaintOp::Fill {
            rect: CellRect::new(5, 3, 31, 1),
            color: "#dddddd",
        };
        assert_eq!(fill.to_string(), "fill R5C3 31x1 #dddddd");

        let write = PaintOp::Write {
            row: 2,
            col: 3,
            text: "10.01".to_string(),
        };
        assert_eq!(write.to_string(), "write R2C3 \"10.01\"");

        let insert = PaintOp::InsertColumns { at: 5, count: 3 };
        assert_eq!(insert.to_string(), "insert-columns C5 x3");
    }
}
