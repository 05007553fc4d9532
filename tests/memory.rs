//! In-memory bindings of the platform services.
//!
//! They keep everything in process and mirror the behaviour of the hosted
//! services closely enough to run whole generation cycles in tests.

use calendar_summary::components::calendar::{CalendarFilter, CalendarRecord, CalendarService, DateRange, RawEvent};
use calendar_summary::components::spreadsheet::{CellValue, GridRange, SheetInfo, SpreadsheetService};
use calendar_summary::components::storage::models::{FOLDER_MIME_TYPE, SPREADSHEET_MIME_TYPE};
use calendar_summary::components::storage::{DocumentRef, FileEntry, FileListing, Folder, StorageService};
use calendar_summary::components::triggers::{Trigger, TriggerKind, TriggerService};
use calendar_summary::config::{Config, LayoutSettings, DEFAULT_REDIS_URL};
use calendar_summary::error::{
    google_calendar_error, spreadsheet_error, storage_error, trigger_error, Error, SummaryResult,
};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// Id of the root folder
pub const ROOT_FOLDER_ID: &str = "root";

/// Title of the sheet every new document starts with
pub const DEFAULT_SHEET_TITLE: &str = "Sheet1";

/// Configuration for in-memory runs: UTC, anchor day 1, no filter
pub fn test_config() -> Config {
    Config {
        google_client_id: "client-id".to_string(),
        google_client_secret: "client-secret".to_string(),
        redis_url: DEFAULT_REDIS_URL.to_string(),
        folder_id: None,
        calendar_filter: CalendarFilter::match_all(),
        anchor_day: 1,
        timezone: chrono_tz::UTC,
        schedule_hour: 0,
        report_locale: "en".to_string(),
        layout: LayoutSettings::default(),
    }
}

/// Calendars and their events
#[derive(Default)]
pub struct InMemoryCalendar {
    calendars: RwLock<Vec<(CalendarRecord, Vec<RawEvent>)>>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar(mut self, calendar: CalendarRecord, events: Vec<RawEvent>) -> Self {
        self.calendars.get_mut().push((calendar, events));
        self
    }

    pub async fn add_event(&self, calendar_id: &str, event: RawEvent) -> SummaryResult<()> {
        let mut calendars = self.calendars.write().await;
        let (_, events) = calendars
            .iter_mut()
            .find(|(c, _)| c.id == calendar_id)
            .ok_or_else(|| google_calendar_error(&format!("Unknown calendar {}", calendar_id)))?;
        events.push(event);
        Ok(())
    }
}

#[async_trait]
impl CalendarService for InMemoryCalendar {
    async fn list_calendars(&self) -> SummaryResult<Vec<CalendarRecord>> {
        let calendars = self.calendars.read().await;
        Ok(calendars.iter().map(|(c, _)| c.clone()).collect())
    }

    async fn list_events(&self, calendar_id: &str, window: &DateRange) -> SummaryResult<Vec<RawEvent>> {
        let calendars = self.calendars.read().await;
        let (_, events) = calendars
            .iter()
            .find(|(c, _)| c.id == calendar_id)
            .ok_or_else(|| google_calendar_error(&format!("Unknown calendar {}", calendar_id)))?;

        Ok(events
            .iter()
            .filter(|e| e.start < *window.end() && e.end > *window.start())
            .cloned()
            .collect())
    }
}

/// One sheet of an in-memory document
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    pub sheet_id: i64,
    pub title: String,
    pub cells: BTreeMap<(u32, u32), CellValue>,
    pub checkboxes: Vec<GridRange>,
    pub bold: Vec<GridRange>,
    pub column_widths: BTreeMap<u32, u32>,
}

impl MemorySheet {
    fn new(sheet_id: i64, title: &str) -> Self {
        Self {
            sheet_id,
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Rendered values of the used area, row by row
    pub fn rows(&self) -> Vec<Vec<String>> {
        let Some(last_row) = self.cells.keys().map(|(r, _)| *r).max() else {
            return Vec::new();
        };
        let width = self.cells.keys().map(|(_, c)| *c + 1).max().unwrap_or(0);

        (0..=last_row)
            .map(|row| {
                (0..width)
                    .map(|col| self.cell(row, col).map(CellValue::display).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    pub fn is_bold(&self, row: u32, col: u32) -> bool {
        self.bold.iter().any(|r| r.contains(row, col))
    }

    pub fn has_checkbox(&self, row: u32, col: u32) -> bool {
        self.checkboxes.iter().any(|r| r.contains(row, col))
    }

    fn values_in(&self, range: &GridRange) -> Vec<Vec<String>> {
        (range.start_row..range.end_row)
            .map(|row| {
                (range.start_col..range.end_col)
                    .map(|col| self.cell(row, col).map(CellValue::display).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

/// An in-memory spreadsheet document
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    pub id: String,
    pub name: String,
    pub parent: String,
    pub trashed: bool,
    pub sheets: Vec<MemorySheet>,
    pub active_sheet: Option<i64>,
    pub named_ranges: HashMap<String, GridRange>,
}

impl MemoryDocument {
    pub fn sheet_titles(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.title.as_str()).collect()
    }

    pub fn sheet(&self, title: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.title == title)
    }

    pub fn active_sheet_title(&self) -> Option<&str> {
        let active = self.active_sheet?;
        self.sheets
            .iter()
            .find(|s| s.sheet_id == active)
            .map(|s| s.title.as_str())
    }

    fn sheet_mut(&mut self, sheet_id: i64) -> SummaryResult<&mut MemorySheet> {
        let document_id = &self.id;
        self.sheets
            .iter_mut()
            .find(|s| s.sheet_id == sheet_id)
            .ok_or_else(|| spreadsheet_error(&format!("No sheet {} in {}", sheet_id, document_id)))
    }

    fn position(&self, sheet_id: i64) -> SummaryResult<usize> {
        self.sheets
            .iter()
            .position(|s| s.sheet_id == sheet_id)
            .ok_or_else(|| spreadsheet_error(&format!("No sheet {} in {}", sheet_id, self.id)))
    }
}

/// A file that is not a generated document
#[derive(Debug, Clone)]
struct MemoryFile {
    entry: FileEntry,
    parent: String,
    trashed: bool,
}

#[derive(Default)]
struct WorkspaceState {
    folders: Vec<Folder>,
    files: Vec<MemoryFile>,
    documents: Vec<MemoryDocument>,
    next_id: i64,
    failing_sheet_title: Option<String>,
    failing_lookup: Option<String>,
}

impl WorkspaceState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn document(&self, document_id: &str) -> SummaryResult<&MemoryDocument> {
        self.documents
            .iter()
            .find(|d| d.id == document_id)
            .ok_or_else(|| spreadsheet_error(&format!("Document {} not found", document_id)))
    }

    fn document_mut(&mut self, document_id: &str) -> SummaryResult<&mut MemoryDocument> {
        self.documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| spreadsheet_error(&format!("Document {} not found", document_id)))
    }

    fn folder(&self, folder_id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == folder_id)
    }
}

/// Drive folders and spreadsheet documents.
///
/// Implements both [`StorageService`] and [`SpreadsheetService`] so files and
/// their contents stay consistent.
pub struct InMemoryWorkspace {
    state: RwLock<WorkspaceState>,
}

impl Default for InMemoryWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        let state = WorkspaceState {
            folders: vec![Folder {
                id: ROOT_FOLDER_ID.to_string(),
                name: "My Drive".to_string(),
            }],
            ..Default::default()
        };
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn with_folder(mut self, id: &str, name: &str) -> Self {
        self.state.get_mut().folders.push(Folder {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Make inserting a sheet with `title` fail
    pub fn failing_on_sheet(mut self, title: &str) -> Self {
        self.state.get_mut().failing_sheet_title = Some(title.to_string());
        self
    }

    /// Make looking up `file_id` fail as if access were denied
    pub fn failing_lookup(mut self, file_id: &str) -> Self {
        self.state.get_mut().failing_lookup = Some(file_id.to_string());
        self
    }

    /// Put a plain (non-spreadsheet) file into a folder
    pub async fn add_file(&self, folder_id: &str, name: &str, mime_type: &str) -> String {
        let mut state = self.state.write().await;
        let id = format!("file-{}", state.next_id());
        state.files.push(MemoryFile {
            entry: FileEntry {
                id: id.clone(),
                name: name.to_string(),
                mime_type: mime_type.to_string(),
            },
            parent: folder_id.to_string(),
            trashed: false,
        });
        id
    }

    /// Remove a document or file for good
    pub async fn delete_file(&self, file_id: &str) {
        let mut state = self.state.write().await;
        state.documents.retain(|d| d.id != file_id);
        state.files.retain(|f| f.entry.id != file_id);
    }

    pub async fn document(&self, document_id: &str) -> Option<MemoryDocument> {
        let state = self.state.read().await;
        state.documents.iter().find(|d| d.id == document_id).cloned()
    }

    /// Every document ever created, trashed ones included
    pub async fn documents(&self) -> Vec<MemoryDocument> {
        self.state.read().await.documents.clone()
    }
}

#[async_trait]
impl StorageService for InMemoryWorkspace {
    async fn root_folder(&self) -> SummaryResult<Folder> {
        let state = self.state.read().await;
        state
            .folder(ROOT_FOLDER_ID)
            .cloned()
            .ok_or_else(|| storage_error("Root folder missing"))
    }

    async fn resolve_folder(&self, folder_id: &str) -> SummaryResult<Option<Folder>> {
        Ok(self.state.read().await.folder(folder_id).cloned())
    }

    async fn create_document(&self, name: &str) -> SummaryResult<DocumentRef> {
        let mut state = self.state.write().await;
        let id = format!("doc-{}", state.next_id());
        let default_sheet = state.next_id();

        state.documents.push(MemoryDocument {
            id: id.clone(),
            name: name.to_string(),
            parent: ROOT_FOLDER_ID.to_string(),
            trashed: false,
            sheets: vec![MemorySheet::new(default_sheet, DEFAULT_SHEET_TITLE)],
            active_sheet: Some(default_sheet),
            named_ranges: HashMap::new(),
        });

        Ok(DocumentRef {
            id,
            name: name.to_string(),
        })
    }

    async fn move_document(&self, document: &DocumentRef, folder: &Folder) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        if state.folder(&folder.id).is_none() {
            return Err(storage_error(&format!("Folder {} not found", folder.id)));
        }
        let doc = state
            .documents
            .iter_mut()
            .find(|d| d.id == document.id)
            .ok_or_else(|| storage_error(&format!("Document {} not found", document.id)))?;
        doc.parent = folder.id.clone();
        Ok(())
    }

    async fn rename_document(&self, document_id: &str, name: &str) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        let doc = state
            .documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| storage_error(&format!("Document {} not found", document_id)))?;
        doc.name = name.to_string();
        Ok(())
    }

    fn list_files<'a>(&'a self, folder: &'a Folder) -> FileListing<'a> {
        stream::once(async move {
            let state = self.state.read().await;
            let documents = state
                .documents
                .iter()
                .filter(|d| !d.trashed && d.parent == folder.id)
                .map(|d| FileEntry {
                    id: d.id.clone(),
                    name: d.name.clone(),
                    mime_type: SPREADSHEET_MIME_TYPE.to_string(),
                });
            let subfolders = state
                .folders
                .iter()
                .filter(|f| f.id != ROOT_FOLDER_ID && folder.id == ROOT_FOLDER_ID)
                .map(|f| FileEntry {
                    id: f.id.clone(),
                    name: f.name.clone(),
                    mime_type: FOLDER_MIME_TYPE.to_string(),
                });
            let files = state
                .files
                .iter()
                .filter(|f| !f.trashed && f.parent == folder.id)
                .map(|f| f.entry.clone());

            documents
                .chain(subfolders)
                .chain(files)
                .map(Ok::<_, Error>)
                .collect::<Vec<_>>()
        })
        .flat_map(stream::iter)
        .boxed()
    }

    async fn file_exists(&self, file_id: &str) -> SummaryResult<bool> {
        let state = self.state.read().await;
        if state.failing_lookup.as_deref() == Some(file_id) {
            return Err(storage_error("HTTP 403 Forbidden"));
        }
        let document = state.documents.iter().any(|d| d.id == file_id && !d.trashed);
        let file = state.files.iter().any(|f| f.entry.id == file_id && !f.trashed);
        Ok(document || file)
    }

    async fn trash_document(&self, file_id: &str) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        if let Some(doc) = state.documents.iter_mut().find(|d| d.id == file_id) {
            doc.trashed = true;
            return Ok(());
        }
        if let Some(file) = state.files.iter_mut().find(|f| f.entry.id == file_id) {
            file.trashed = true;
            return Ok(());
        }
        Err(storage_error(&format!("File {} not found", file_id)))
    }
}

#[async_trait]
impl SpreadsheetService for InMemoryWorkspace {
    async fn list_sheets(&self, document_id: &str) -> SummaryResult<Vec<SheetInfo>> {
        let state = self.state.read().await;
        let doc = state.document(document_id)?;
        Ok(doc
            .sheets
            .iter()
            .enumerate()
            .map(|(index, s)| SheetInfo {
                sheet_id: s.sheet_id,
                title: s.title.clone(),
                index,
            })
            .collect())
    }

    async fn rename_sheet(&self, document_id: &str, sheet_id: i64, title: &str) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        let doc = state.document_mut(document_id)?;
        if doc.sheets.iter().any(|s| s.title == title && s.sheet_id != sheet_id) {
            return Err(spreadsheet_error(&format!("A sheet named {} already exists", title)));
        }
        doc.sheet_mut(sheet_id)?.title = title.to_string();
        Ok(())
    }

    async fn insert_sheet(&self, document_id: &str, title: &str) -> SummaryResult<SheetInfo> {
        let mut state = self.state.write().await;
        if state.failing_sheet_title.as_deref() == Some(title) {
            return Err(spreadsheet_error(&format!("Inserting sheet {} failed", title)));
        }
        let sheet_id = state.next_id();
        let doc = state.document_mut(document_id)?;
        if doc.sheets.iter().any(|s| s.title == title) {
            return Err(spreadsheet_error(&format!("A sheet named {} already exists", title)));
        }

        doc.sheets.push(MemorySheet::new(sheet_id, title));
        Ok(SheetInfo {
            sheet_id,
            title: title.to_string(),
            index: doc.sheets.len() - 1,
        })
    }

    async fn delete_sheet(&self, document_id: &str, sheet_id: i64) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        let doc = state.document_mut(document_id)?;
        if doc.sheets.len() == 1 {
            return Err(spreadsheet_error("Cannot delete the only sheet of a document"));
        }
        let position = doc.position(sheet_id)?;
        doc.sheets.remove(position);
        doc.named_ranges.retain(|_, range| range.sheet_id != sheet_id);
        if doc.active_sheet == Some(sheet_id) {
            doc.active_sheet = doc.sheets.first().map(|s| s.sheet_id);
        }
        Ok(())
    }

    async fn move_sheet(&self, document_id: &str, sheet_id: i64, index: usize) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        let doc = state.document_mut(document_id)?;
        let position = doc.position(sheet_id)?;
        let sheet = doc.sheets.remove(position);
        let target = if index > position { index - 1 } else { index };
        let target = target.min(doc.sheets.len());
        doc.sheets.insert(target, sheet);
        Ok(())
    }

    async fn activate_sheet(&self, document_id: &str, sheet_id: i64) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        let doc = state.document_mut(document_id)?;
        doc.position(sheet_id)?;
        doc.active_sheet = Some(sheet_id);
        Ok(())
    }

    async fn write_cells(
        &self,
        document_id: &str,
        sheet_id: i64,
        row: u32,
        col: u32,
        values: &[Vec<CellValue>],
    ) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        let sheet = state.document_mut(document_id)?.sheet_mut(sheet_id)?;
        for (r, cells) in values.iter().enumerate() {
            for (c, value) in cells.iter().enumerate() {
                let key = (row + r as u32, col + c as u32);
                match value {
                    CellValue::Empty => sheet.cells.remove(&key),
                    value => sheet.cells.insert(key, value.clone()),
                };
            }
        }
        Ok(())
    }

    async fn set_checkbox_validation(&self, document_id: &str, range: &GridRange) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        let sheet = state.document_mut(document_id)?.sheet_mut(range.sheet_id)?;
        sheet.checkboxes.push(*range);
        Ok(())
    }

    async fn set_bold(&self, document_id: &str, range: &GridRange) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        let sheet = state.document_mut(document_id)?.sheet_mut(range.sheet_id)?;
        sheet.bold.push(*range);
        Ok(())
    }

    async fn set_column_widths(
        &self,
        document_id: &str,
        sheet_id: i64,
        start_col: u32,
        count: u32,
        width: u32,
    ) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        let sheet = state.document_mut(document_id)?.sheet_mut(sheet_id)?;
        for col in start_col..start_col + count {
            sheet.column_widths.insert(col, width);
        }
        Ok(())
    }

    async fn set_named_range(&self, document_id: &str, name: &str, range: &GridRange) -> SummaryResult<()> {
        let mut state = self.state.write().await;
        let doc = state.document_mut(document_id)?;
        doc.position(range.sheet_id)?;
        doc.named_ranges.insert(name.to_string(), *range);
        Ok(())
    }

    async fn read_named_range(&self, document_id: &str, name: &str) -> SummaryResult<Option<Vec<Vec<String>>>> {
        let state = self.state.read().await;
        let doc = state.document(document_id)?;
        let Some(range) = doc.named_ranges.get(name) else {
            return Ok(None);
        };
        let sheet = doc
            .sheets
            .iter()
            .find(|s| s.sheet_id == range.sheet_id)
            .ok_or_else(|| spreadsheet_error(&format!("Named range {} points to a deleted sheet", name)))?;
        Ok(Some(sheet.values_in(range)))
    }
}

/// Trigger registry kept in a vector
#[derive(Default)]
pub struct InMemoryTriggers {
    triggers: RwLock<Vec<Trigger>>,
    sequence: AtomicI64,
}

impl InMemoryTriggers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every installed trigger, oldest first
    pub async fn all(&self) -> Vec<Trigger> {
        self.triggers.read().await.clone()
    }

    async fn store(&self, handler: &str, kind: TriggerKind) -> Trigger {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let trigger = Trigger {
            id: format!("trigger-{}", sequence),
            handler: handler.to_string(),
            kind,
            created_at: sequence,
        };
        self.triggers.write().await.push(trigger.clone());
        trigger
    }
}

#[async_trait]
impl TriggerService for InMemoryTriggers {
    async fn list_triggers(&self, handler: &str) -> SummaryResult<Vec<Trigger>> {
        let triggers = self.triggers.read().await;
        Ok(triggers.iter().filter(|t| t.handler == handler).cloned().collect())
    }

    async fn delete_trigger(&self, trigger_id: &str) -> SummaryResult<()> {
        let mut triggers = self.triggers.write().await;
        let before = triggers.len();
        triggers.retain(|t| t.id != trigger_id);
        if triggers.len() == before {
            return Err(trigger_error(&format!("Trigger {} not found", trigger_id)));
        }
        Ok(())
    }

    async fn create_open_trigger(&self, handler: &str, document_id: &str) -> SummaryResult<Trigger> {
        Ok(self
            .store(
                handler,
                TriggerKind::OnOpen {
                    source_id: document_id.to_string(),
                },
            )
            .await)
    }

    async fn create_monthly_trigger(&self, handler: &str, day: u32, hour: u32) -> SummaryResult<Trigger> {
        Ok(self.store(handler, TriggerKind::Monthly { day, hour }).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_move_sheet_uses_index_before_move() {
        let workspace = InMemoryWorkspace::new();
        let doc = workspace.create_document("Doc").await.unwrap();
        let first = workspace.list_sheets(&doc.id).await.unwrap()[0].sheet_id;
        workspace.insert_sheet(&doc.id, "A").await.unwrap();
        workspace.insert_sheet(&doc.id, "B").await.unwrap();

        workspace.move_sheet(&doc.id, first, 3).await.unwrap();

        let titles: Vec<String> = workspace
            .list_sheets(&doc.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["A", "B", DEFAULT_SHEET_TITLE]);
    }

    #[tokio::test]
    async fn test_duplicate_sheet_titles_are_rejected() {
        let workspace = InMemoryWorkspace::new();
        let doc = workspace.create_document("Doc").await.unwrap();
        workspace.insert_sheet(&doc.id, "Work").await.unwrap();
        assert!(workspace.insert_sheet(&doc.id, "Work").await.is_err());
    }

    #[tokio::test]
    async fn test_trashed_documents_are_gone() {
        let workspace = InMemoryWorkspace::new();
        let doc = workspace.create_document("Doc").await.unwrap();
        let root = workspace.root_folder().await.unwrap();
        assert!(workspace.file_exists(&doc.id).await.unwrap());

        workspace.trash_document(&doc.id).await.unwrap();

        assert!(!workspace.file_exists(&doc.id).await.unwrap());
        let listed: Vec<FileEntry> = workspace.list_files(&root).try_collect().await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_named_range_values() {
        let workspace = InMemoryWorkspace::new();
        let doc = workspace.create_document("Doc").await.unwrap();
        let sheet = workspace.list_sheets(&doc.id).await.unwrap()[0].sheet_id;
        let values = vec![vec![CellValue::text("start")], vec![CellValue::text("end")]];
        workspace.write_cells(&doc.id, sheet, 4, 0, &values).await.unwrap();

        assert_eq!(workspace.read_named_range(&doc.id, "Range").await.unwrap(), None);

        workspace
            .set_named_range(&doc.id, "Range", &GridRange::new(sheet, 4, 0, 2, 1))
            .await
            .unwrap();
        assert_eq!(
            workspace.read_named_range(&doc.id, "Range").await.unwrap(),
            Some(vec![vec!["start".to_string()], vec!["end".to_string()]])
        );
    }

    #[tokio::test]
    async fn test_events_are_limited_to_window() {
        use chrono::{TimeZone, Utc};

        let at = |d: u32| Utc.with_ymd_and_hms(2024, 2, d, 10, 0, 0).unwrap();
        let calendar = InMemoryCalendar::new().with_calendar(
            CalendarRecord::new("work", "Work"),
            vec![
                RawEvent::timed("Before", at(1), at(2)),
                RawEvent::timed("Inside", at(5), at(6)),
                RawEvent::timed("After", at(20), at(21)),
            ],
        );
        let window = DateRange::new(at(3), at(10)).unwrap();

        let events = calendar.list_events("work", &window).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Inside");
        assert!(calendar.list_events("missing", &window).await.is_err());
    }
}
