pub mod google;
pub mod models;

pub use google::GoogleSheetsClient;
pub use models::{CellValue, GridRange, SheetInfo};

use crate::error::SummaryResult;
use async_trait::async_trait;

/// Cell and sheet primitives of a spreadsheet document
#[async_trait]
pub trait SpreadsheetService: Send + Sync + 'static {
    /// Sheets in display order
    async fn list_sheets(&self, document_id: &str) -> SummaryResult<Vec<SheetInfo>>;

    async fn rename_sheet(&self, document_id: &str, sheet_id: i64, title: &str) -> SummaryResult<()>;

    /// Append a new sheet after the existing ones
    async fn insert_sheet(&self, document_id: &str, title: &str) -> SummaryResult<SheetInfo>;

    async fn delete_sheet(&self, document_id: &str, sheet_id: i64) -> SummaryResult<()>;

    /// Move a sheet to `index`, counted before the move
    async fn move_sheet(&self, document_id: &str, sheet_id: i64, index: usize) -> SummaryResult<()>;

    /// Make a sheet the one shown when the document is opened
    async fn activate_sheet(&self, document_id: &str, sheet_id: i64) -> SummaryResult<()>;

    /// Write a rectangular block of values with its top-left corner at (`row`, `col`)
    async fn write_cells(
        &self,
        document_id: &str,
        sheet_id: i64,
        row: u32,
        col: u32,
        values: &[Vec<CellValue>],
    ) -> SummaryResult<()>;

    async fn set_checkbox_validation(&self, document_id: &str, range: &GridRange) -> SummaryResult<()>;

    async fn set_bold(&self, document_id: &str, range: &GridRange) -> SummaryResult<()>;

    /// Set the pixel width of `count` columns starting at `start_col`
    async fn set_column_widths(
        &self,
        document_id: &str,
        sheet_id: i64,
        start_col: u32,
        count: u32,
        width: u32,
    ) -> SummaryResult<()>;

    /// Create or replace a document-level named range
    async fn set_named_range(&self, document_id: &str, name: &str, range: &GridRange) -> SummaryResult<()>;

    /// Values of a named range, `None` when the document has no range by that name
    async fn read_named_range(&self, document_id: &str, name: &str) -> SummaryResult<Option<Vec<Vec<String>>>>;
}
