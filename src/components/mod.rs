use std::sync::Arc;

pub mod calendar;
pub mod google_auth;
pub mod report;
pub mod spreadsheet;
pub mod storage;
pub mod triggers;

use calendar::CalendarService;
use spreadsheet::SpreadsheetService;
use storage::StorageService;
use triggers::TriggerService;

/// Platform services a generation run talks to
#[derive(Clone)]
pub struct Services {
    pub calendar: Arc<dyn CalendarService>,
    pub storage: Arc<dyn StorageService>,
    pub sheets: Arc<dyn SpreadsheetService>,
    pub triggers: Arc<dyn TriggerService>,
}

impl Services {
    pub fn new(
        calendar: Arc<dyn CalendarService>,
        storage: Arc<dyn StorageService>,
        sheets: Arc<dyn SpreadsheetService>,
        triggers: Arc<dyn TriggerService>,
    ) -> Self {
        Self {
            calendar,
            storage,
            sheets,
            triggers,
        }
    }
}
