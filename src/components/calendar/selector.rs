use super::models::CalendarRecord;
use crate::error::{config_error, SummaryResult};
use regex::{Regex, RegexBuilder};

/// Case-insensitive calendar name filter; `None` matches every calendar
#[derive(Debug, Clone, Default)]
pub struct CalendarFilter {
    pattern: Option<Regex>,
}

impl CalendarFilter {
    /// Compile a filter from an optional pattern. Blank patterns match everything.
    pub fn new(pattern: Option<&str>) -> SummaryResult<Self> {
        let pattern = match pattern.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => Some(
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| config_error(&format!("Invalid CALENDAR_NAME_FILTER: {}", e)))?,
            ),
            None => None,
        };
        Ok(Self { pattern })
    }

    /// A filter that keeps every calendar
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.pattern {
            Some(re) => re.is_match(name),
            None => true,
        }
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_ref().map(Regex::as_str).unwrap_or(".*")
    }
}

/// Keep the calendars whose display name matches `filter`, in input order
pub fn select_calendars(all: &[CalendarRecord], filter: &CalendarFilter) -> Vec<CalendarRecord> {
    all.iter()
        .filter(|calendar| filter.matches(&calendar.display_name))
        .cloned()
        .collect()
}
