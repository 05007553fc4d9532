use crate::utils::a1::cell_to_a1;

/// A single typed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Formula text including the leading `=`
    Formula(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Display form, as a spreadsheet would render it
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) | CellValue::Formula(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
        }
    }
}

/// A sheet inside a spreadsheet document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub sheet_id: i64,
    pub title: String,
    pub index: usize,
}

/// A rectangular block of cells. Rows and columns are 0-indexed with
/// exclusive ends, matching the Sheets API grid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row: u32,
    pub end_row: u32,
    pub start_col: u32,
    pub end_col: u32,
}

impl GridRange {
    pub fn new(sheet_id: i64, start_row: u32, start_col: u32, rows: u32, cols: u32) -> Self {
        Self {
            sheet_id,
            start_row,
            end_row: start_row + rows,
            start_col,
            end_col: start_col + cols,
        }
    }

    /// A full-width single row
    pub fn row(sheet_id: i64, row: u32, cols: u32) -> Self {
        Self::new(sheet_id, row, 0, 1, cols)
    }

    pub fn rows(&self) -> u32 {
        self.end_row.saturating_sub(self.start_row)
    }

    pub fn cols(&self) -> u32 {
        self.end_col.saturating_sub(self.start_col)
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.start_row..self.end_row).contains(&row) && (self.start_col..self.end_col).contains(&col)
    }

    /// A1 notation without a sheet name, e.g. `A5:A6`
    pub fn to_a1(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!(
            "{}:{}",
            cell_to_a1(self.start_row, self.start_col),
            cell_to_a1(self.end_row - 1, self.end_col - 1)
        )
    }
}
