use crate::components::calendar::CalendarRecord;
use crate::components::spreadsheet::{CellValue, SheetInfo};

/// Prefix of every generated document name
pub const FILE_NAME_PREFIX: &str = "Monthly Calendar Summary";

/// Title of the informational sheet
pub const ABOUT_SHEET_TITLE: &str = "About";

/// Where the generator lives, linked from the About sheet
pub const SOURCE_URL: &str = "https://github.com/H3mul/calendar-invoice-generator";

/// Named range holding the generation window.
/// Never rename: older documents could no longer be regenerated.
pub const DATE_RANGE_NAME: &str = "GatheredCalendarDataDateRange";

/// Label placed next to the total formula
pub const TOTAL_LABEL: &str = "Total: ";

/// Column headings of every calendar sheet, in order
pub const HEADINGS: [&str; 5] = [
    "Day",
    "Timestamps",
    "Event Title",
    "Hours Count",
    "Include In Total",
];

pub const DAY_COLUMN: u32 = 0;
pub const TIME_COLUMN: u32 = 1;
pub const TITLE_COLUMN: u32 = 2;
pub const HOURS_COLUMN: u32 = 3;
pub const INCLUDE_COLUMN: u32 = 4;

pub const COLUMN_COUNT: u32 = HEADINGS.len() as u32;

/// One timed event, as a sheet row
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub date_label: String,
    pub time_range_label: String,
    pub title: String,
    pub duration_hours: f64,
    pub include_in_total: bool,
}

impl EventRow {
    pub fn to_cells(&self) -> Vec<CellValue> {
        vec![
            CellValue::text(&self.date_label),
            CellValue::text(&self.time_range_label),
            CellValue::text(&self.title),
            CellValue::Number(self.duration_hours),
            CellValue::Bool(self.include_in_total),
        ]
    }
}

/// Everything written into one calendar's sheet
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSheetData {
    pub calendar: CalendarRecord,
    pub rows: Vec<EventRow>,
    pub total_formula: String,
}

impl CalendarSheetData {
    pub fn data_row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// 0-indexed row of the total line
    pub fn total_row_index(&self) -> u32 {
        self.data_row_count() + 1
    }

    /// Header, data rows and total row as one rectangular block
    pub fn to_values(&self) -> Vec<Vec<CellValue>> {
        let mut values = Vec::with_capacity(self.rows.len() + 2);
        values.push(HEADINGS.iter().map(|h| CellValue::text(*h)).collect());
        values.extend(self.rows.iter().map(EventRow::to_cells));
        values.push(vec![
            CellValue::Empty,
            CellValue::Empty,
            CellValue::text(TOTAL_LABEL),
            CellValue::Formula(self.total_formula.clone()),
            CellValue::Empty,
        ]);
        values
    }
}

/// A document produced or refreshed by a generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    pub id: String,
    /// Named after the generation window
    pub name: String,
    pub about_sheet_id: i64,
    pub calendar_sheets: Vec<SheetInfo>,
    pub replay_trigger_id: String,
    pub pruned_triggers: usize,
}
