use crate::components::calendar::models::DateRange;
use crate::error::{config_error, SummaryResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(date_str: &str) -> SummaryResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|e| config_error(&format!("Invalid date '{}': {}", date_str, e)))
}

/// Window between two dates, each at local midnight in `tz`
pub fn explicit_window(start: &str, end: &str, tz: &Tz) -> SummaryResult<DateRange> {
    let start = local_midnight(tz, parse_date(start)?);
    let end = local_midnight(tz, parse_date(end)?);
    DateRange::new(start, end)
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

/// First day of the month before the one containing `date`
pub fn first_of_previous_month(date: NaiveDate) -> NaiveDate {
    first_of_month(first_of_month(date) - Duration::days(1))
}

/// First day of the month after the one containing `date`
pub fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    // Any month is at most 31 days long, so this always lands in the next one
    first_of_month(first_of_month(date) + Duration::days(31))
}

/// The `day`-th day of the month starting at `first`.
///
/// Days past the end of the month roll over into the following month, so
/// day 31 of April is May 1st.
pub fn anchor_date(first: NaiveDate, day: u32) -> NaiveDate {
    first + Duration::days(day.saturating_sub(1) as i64)
}

/// Resolve a local wall-clock time to an instant.
///
/// Ambiguous times take the earlier instant. Times that fall in a DST gap
/// move forward to the first valid local time after the gap.
pub fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    let mut candidate = naive;
    for _ in 0..8 {
        match tz.from_local_datetime(&candidate) {
            chrono::LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            chrono::LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            chrono::LocalResult::None => candidate += Duration::minutes(15),
        }
    }
    tz.from_utc_datetime(&naive).with_timezone(&Utc)
}

/// Local midnight at the start of `date`
pub fn local_midnight(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Window ending on the anchor day of the month starting at `month`.
///
/// The start is the anchor day of the month before. Both boundaries share the
/// same rollover rule, so `start < end` for every anchor day.
pub fn window_for_month(anchor_day: u32, month: NaiveDate, tz: &Tz) -> DateRange {
    let end = local_midnight(tz, anchor_date(first_of_month(month), anchor_day));
    let start = local_midnight(tz, anchor_date(first_of_previous_month(month), anchor_day));

    DateRange::from_ordered(start, end)
}

/// Window covering "last month" relative to `now`.
///
/// The end is the anchor day of `now`'s month at local midnight and the start
/// is the anchor day of the month before.
pub fn last_month_window(anchor_day: u32, now: &DateTime<Tz>) -> DateRange {
    window_for_month(anchor_day, now.date_naive(), &now.timezone())
}

/// One firing of the monthly schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyFire {
    /// First day of the month the firing belongs to
    pub month: NaiveDate,
    /// When it fires; past the end of `month` when the anchor day rolls over
    pub at: DateTime<Utc>,
}

impl MonthlyFire {
    /// Firing of the month starting at `month` on `day` at `hour` local time
    pub fn of_month(month: NaiveDate, day: u32, hour: u32, tz: &Tz) -> Self {
        let month = first_of_month(month);
        let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
        Self {
            month,
            at: resolve_local(tz, anchor_date(month, day).and_time(time)),
        }
    }

    /// The window this firing generates: it ends on the month's anchor boundary
    pub fn window(&self, anchor_day: u32, tz: &Tz) -> DateRange {
        window_for_month(anchor_day, self.month, tz)
    }
}

/// Firings of the months around `now`, in order
fn firings_around(now: &DateTime<Tz>, day: u32, hour: u32) -> [MonthlyFire; 3] {
    let tz = now.timezone();
    let this_month = first_of_month(now.date_naive());
    [
        first_of_previous_month(this_month),
        this_month,
        first_of_next_month(this_month),
    ]
    .map(|month| MonthlyFire::of_month(month, day, hour, &tz))
}

/// Next firing of a monthly schedule strictly after `now`.
///
/// A rolled-over firing of the previous month (day 31 of April fires on
/// May 1st) is still pending early in the following month.
pub fn next_monthly_fire(now: &DateTime<Tz>, day: u32, hour: u32) -> MonthlyFire {
    let instant = now.with_timezone(&Utc);
    let [previous, current, next] = firings_around(now, day, hour);
    [previous, current]
        .into_iter()
        .find(|fire| fire.at > instant)
        .unwrap_or(next)
}

/// Latest firing of a monthly schedule at or before `now`
pub fn latest_monthly_fire(now: &DateTime<Tz>, day: u32, hour: u32) -> MonthlyFire {
    let instant = now.with_timezone(&Utc);
    let [previous, current, next] = firings_around(now, day, hour);
    [next, current]
        .into_iter()
        .find(|fire| fire.at <= instant)
        .unwrap_or(previous)
}

/// Calculate the wait in seconds until `next`, never less than a minute
pub fn calculate_wait_duration(now: &DateTime<Utc>, next: &DateTime<Utc>) -> u64 {
    let seconds = next.signed_duration_since(*now).num_seconds();
    if seconds <= 0 {
        return 60;
    }
    seconds as u64
}

/// Day label written into the first column, e.g. `2024-02-10`
pub fn format_date_label(instant: &DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).format("%Y-%m-%d").to_string()
}

/// 24-hour clock label, e.g. `09:05`
pub fn format_time_label(instant: &DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).format("%H:%M").to_string()
}

/// Time range label written into the second column, e.g. `10:00-12:00`
pub fn format_time_range_label(start: &DateTime<Utc>, end: &DateTime<Utc>, tz: &Tz) -> String {
    format!("{}-{}", format_time_label(start, tz), format_time_label(end, tz))
}
