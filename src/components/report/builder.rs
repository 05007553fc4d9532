use super::models::{
    CalendarSheetData, GeneratedDocument, ABOUT_SHEET_TITLE, COLUMN_COUNT, DATE_RANGE_NAME,
    FILE_NAME_PREFIX, INCLUDE_COLUMN, SOURCE_URL, TITLE_COLUMN,
};
use crate::components::calendar::DateRange;
use crate::components::spreadsheet::{CellValue, GridRange, SheetInfo, SpreadsheetService};
use crate::components::storage::{DocumentRef, Folder, StorageService};
use crate::components::triggers::RegenerationTriggerManager;
use crate::config::Config;
use crate::error::SummaryResult;
use crate::utils::time::format_date_label;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_i18n::t;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Row of the About sheet where the window start is stored; the end goes below it
const WINDOW_START_ROW: u32 = 4;

/// Where a generation run writes its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentTarget {
    /// Create a new document in the configured folder
    NewDocument,
    /// Regenerate an existing document in place
    Existing { document_id: String },
}

/// Materializes calendar sheet data into a spreadsheet document
#[derive(Clone)]
pub struct DocumentBuilder {
    config: Arc<Config>,
    storage: Arc<dyn StorageService>,
    sheets: Arc<dyn SpreadsheetService>,
    triggers: RegenerationTriggerManager,
}

/// Name of a document generated for `window`
pub fn document_name(window: &DateRange, tz: &Tz) -> String {
    format!(
        "{} {} - {}",
        FILE_NAME_PREFIX,
        format_date_label(window.start(), tz),
        format_date_label(window.end(), tz)
    )
}

/// Calendar display names that occur more than once
pub fn duplicate_sheet_names(data: &[CalendarSheetData]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for sheet in data {
        let name = &sheet.calendar.display_name;
        if !seen.insert(name.as_str()) && !duplicates.contains(name) {
            duplicates.push(name.clone());
        }
    }
    duplicates
}

impl DocumentBuilder {
    pub fn new(
        config: Arc<Config>,
        storage: Arc<dyn StorageService>,
        sheets: Arc<dyn SpreadsheetService>,
        triggers: RegenerationTriggerManager,
    ) -> Self {
        Self {
            config,
            storage,
            sheets,
            triggers,
        }
    }

    /// The configured folder, or the root folder when it cannot be resolved
    pub async fn resolve_target_folder(&self) -> SummaryResult<Folder> {
        if let Some(folder_id) = &self.config.folder_id {
            match self.storage.resolve_folder(folder_id).await {
                Ok(Some(folder)) => return Ok(folder),
                Ok(None) => warn!("Folder {} not found, using default", folder_id),
                Err(e) => warn!("Failed to resolve folder {}: {}, using default", folder_id, e),
            }
        }
        self.storage.root_folder().await
    }

    /// Build (or rebuild) the document for `window` from per-calendar data
    pub async fn build_document(
        &self,
        window: &DateRange,
        data: &[CalendarSheetData],
        target: &DocumentTarget,
        generated_at: DateTime<Utc>,
    ) -> SummaryResult<GeneratedDocument> {
        match target {
            DocumentTarget::NewDocument => {
                let document = self.create_document(window).await?;
                match self
                    .populate(&document.id, &document.name, window, data, generated_at, true)
                    .await
                {
                    Ok(generated) => Ok(generated),
                    Err(e) => {
                        error!("Generation of {} failed, moving it to trash: {}", document.id, e);
                        if let Err(trash_err) = self.storage.trash_document(&document.id).await {
                            error!("Failed to trash incomplete document {}: {}", document.id, trash_err);
                        }
                        Err(e)
                    }
                }
            }
            DocumentTarget::Existing { document_id } => {
                let name = document_name(window, &self.config.timezone);
                let generated = self
                    .populate(document_id, &name, window, data, generated_at, false)
                    .await?;
                self.storage.rename_document(document_id, &name).await?;
                Ok(generated)
            }
        }
    }

    async fn create_document(&self, window: &DateRange) -> SummaryResult<DocumentRef> {
        let folder = self.resolve_target_folder().await?;
        let document = self.storage.create_document(&document_name(window, &self.config.timezone)).await?;

        if let Err(e) = self.storage.move_document(&document, &folder).await {
            if let Err(trash_err) = self.storage.trash_document(&document.id).await {
                error!("Failed to trash unplaced document {}: {}", document.id, trash_err);
            }
            return Err(e);
        }

        info!("Created a new monthly sheet: {}/{}", folder.name, document.name);
        Ok(document)
    }

    /// Pick the About sheet and drop every other sheet
    async fn prepare_about_sheet(&self, document_id: &str, is_new: bool) -> SummaryResult<SheetInfo> {
        let sheets = self.sheets.list_sheets(document_id).await?;

        let about = match sheets.iter().find(|s| s.title == ABOUT_SHEET_TITLE) {
            Some(about) => about.clone(),
            None => match sheets.first() {
                Some(first) if is_new => {
                    self.sheets
                        .rename_sheet(document_id, first.sheet_id, ABOUT_SHEET_TITLE)
                        .await?;
                    SheetInfo {
                        title: ABOUT_SHEET_TITLE.to_string(),
                        ..first.clone()
                    }
                }
                _ => self.sheets.insert_sheet(document_id, ABOUT_SHEET_TITLE).await?,
            },
        };

        for sheet in sheets.iter().filter(|s| s.sheet_id != about.sheet_id) {
            self.sheets.delete_sheet(document_id, sheet.sheet_id).await?;
        }

        Ok(about)
    }

    async fn write_about_sheet(
        &self,
        document_id: &str,
        about: &SheetInfo,
        window: &DateRange,
        generated_at: DateTime<Utc>,
    ) -> SummaryResult<()> {
        let locale = self.config.report_locale.as_str();
        let tz = &self.config.timezone;
        let timestamp = generated_at.with_timezone(tz).format("%Y-%m-%d %H:%M:%S %Z").to_string();

        let info = t!("about_generation_info", locale = locale, source = SOURCE_URL);

        let values = vec![
            vec![CellValue::text(info.to_string())],
            vec![CellValue::text(timestamp)],
            vec![CellValue::Empty],
            vec![CellValue::text(t!("about_time_range", locale = locale).to_string())],
            vec![CellValue::text(window.start().with_timezone(tz).to_rfc3339())],
            vec![CellValue::text(window.end().with_timezone(tz).to_rfc3339())],
        ];
        self.sheets
            .write_cells(document_id, about.sheet_id, 0, 0, &values)
            .await?;

        let range = GridRange::new(about.sheet_id, WINDOW_START_ROW, 0, 2, 1);
        self.sheets
            .set_named_range(document_id, DATE_RANGE_NAME, &range)
            .await
    }

    async fn write_calendar_sheet(&self, document_id: &str, data: &CalendarSheetData) -> SummaryResult<SheetInfo> {
        let sheet = self
            .sheets
            .insert_sheet(document_id, &data.calendar.display_name)
            .await?;
        let id = sheet.sheet_id;

        self.sheets
            .write_cells(document_id, id, 0, 0, &data.to_values())
            .await?;

        let data_rows = data.data_row_count();
        if data_rows > 0 {
            let inclusion = GridRange::new(id, 1, INCLUDE_COLUMN, data_rows, 1);
            self.sheets.set_checkbox_validation(document_id, &inclusion).await?;
        }

        self.sheets
            .set_bold(document_id, &GridRange::row(id, 0, COLUMN_COUNT))
            .await?;
        self.sheets
            .set_bold(document_id, &GridRange::row(id, data.total_row_index(), COLUMN_COUNT))
            .await?;

        let layout = &self.config.layout;
        self.sheets
            .set_column_widths(document_id, id, 0, COLUMN_COUNT, layout.default_column_width)
            .await?;
        self.sheets
            .set_column_widths(document_id, id, TITLE_COLUMN, 1, layout.title_column_width)
            .await?;

        Ok(sheet)
    }

    async fn populate(
        &self,
        document_id: &str,
        name: &str,
        window: &DateRange,
        data: &[CalendarSheetData],
        generated_at: DateTime<Utc>,
        is_new: bool,
    ) -> SummaryResult<GeneratedDocument> {
        let about = self.prepare_about_sheet(document_id, is_new).await?;
        self.write_about_sheet(document_id, &about, window, generated_at)
            .await?;

        let duplicates = duplicate_sheet_names(data);
        if !duplicates.is_empty() {
            warn!(
                "Calendars share display names, sheet names will collide: {}",
                duplicates.join(", ")
            );
        }

        let mut calendar_sheets = Vec::with_capacity(data.len());
        for sheet_data in data {
            calendar_sheets.push(self.write_calendar_sheet(document_id, sheet_data).await?);
        }

        // About sheet goes last, the first calendar sheet is shown on open
        self.sheets
            .move_sheet(document_id, about.sheet_id, calendar_sheets.len() + 1)
            .await?;
        if let Some(first) = calendar_sheets.first() {
            self.sheets.activate_sheet(document_id, first.sheet_id).await?;
        }

        let report = self.triggers.install_replay_trigger(document_id).await?;

        info!("Finished populating monthly sheet {} with calendar data", document_id);
        Ok(GeneratedDocument {
            id: document_id.to_string(),
            name: name.to_string(),
            about_sheet_id: about.sheet_id,
            calendar_sheets,
            replay_trigger_id: report.installed.id,
            pruned_triggers: report.pruned,
        })
    }
}
