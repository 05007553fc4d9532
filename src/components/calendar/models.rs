use crate::error::{other_error, SummaryResult};
use chrono::{DateTime, Utc};
use std::fmt;

/// Half-open generation window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Create a window, rejecting empty or inverted ranges
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> SummaryResult<Self> {
        if start >= end {
            return Err(other_error(&format!(
                "Invalid date range: start {} is not before end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// Construct from boundaries the caller has already ordered
    pub(crate) fn from_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "date range must be non-empty");
        Self { start, end }
    }

    pub fn start(&self) -> &DateTime<Utc> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Utc> {
        &self.end
    }

    /// Whether `instant` falls inside the window
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// A source calendar, owned by the calendar service
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CalendarRecord {
    pub id: String,
    pub display_name: String,
}

impl CalendarRecord {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// An event as returned by the calendar service
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
}

impl RawEvent {
    /// A timed event
    pub fn timed(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            all_day: false,
        }
    }

    /// An all-day event spanning `start..end`
    pub fn all_day(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            all_day: true,
        }
    }
}
