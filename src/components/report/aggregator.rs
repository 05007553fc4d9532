use super::models::{CalendarSheetData, EventRow, HOURS_COLUMN, INCLUDE_COLUMN};
use crate::components::calendar::{CalendarRecord, RawEvent};
use crate::utils::a1::column_span;
use crate::utils::time::{format_date_label, format_time_range_label};
use chrono_tz::Tz;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Length of an event in hours; an end before the start counts as zero
pub fn duration_hours(event: &RawEvent) -> f64 {
    let millis = (event.end - event.start).num_milliseconds().max(0);
    millis as f64 / MILLIS_PER_HOUR
}

pub fn event_row(event: &RawEvent, tz: &Tz) -> EventRow {
    EventRow {
        date_label: format_date_label(&event.start, tz),
        time_range_label: format_time_range_label(&event.start, &event.end, tz),
        title: event.title.clone(),
        duration_hours: duration_hours(event),
        include_in_total: true,
    }
}

/// Total formula over the data rows `2..=data_rows + 1`.
///
/// With no data rows there is nothing to reference: a reversed span like
/// `D2:D1` would be normalised to include the header.
pub fn total_formula(data_rows: u32) -> String {
    if data_rows == 0 {
        return "=SUM(0)".to_string();
    }
    let last = data_rows + 1;
    format!(
        "=SUM(ARRAYFORMULA({}*{}))",
        column_span(HOURS_COLUMN, 2, last),
        column_span(INCLUDE_COLUMN, 2, last)
    )
}

/// Rows for one calendar's sheet. All-day events are dropped; everything
/// else keeps the order the calendar service returned.
pub fn build_calendar_sheet_data(calendar: &CalendarRecord, events: &[RawEvent], tz: &Tz) -> CalendarSheetData {
    let rows: Vec<EventRow> = events
        .iter()
        .filter(|event| !event.all_day)
        .map(|event| event_row(event, tz))
        .collect();
    let total_formula = total_formula(rows.len() as u32);

    CalendarSheetData {
        calendar: calendar.clone(),
        rows,
        total_formula,
    }
}
