pub mod google;
pub mod models;
pub mod selector;

pub use google::GoogleCalendarClient;
pub use models::{CalendarRecord, DateRange, RawEvent};
pub use selector::{select_calendars, CalendarFilter};

use crate::error::SummaryResult;
use async_trait::async_trait;

/// Read access to the user's calendars
#[async_trait]
pub trait CalendarService: Send + Sync + 'static {
    /// Every calendar visible to the user, in service order
    async fn list_calendars(&self) -> SummaryResult<Vec<CalendarRecord>>;

    /// Events overlapping `window`, in start time order
    async fn list_events(&self, calendar_id: &str, window: &DateRange) -> SummaryResult<Vec<RawEvent>>;
}
