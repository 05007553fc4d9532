use crate::components::calendar::selector::CalendarFilter;
use crate::error::{config_error, env_error, SummaryResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;

/// Default Redis connection used for the token and the trigger registry
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Optional layout overrides
pub const LAYOUT_FILE: &str = "config/layout.toml";

/// Column widths applied to every calendar sheet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub default_column_width: u32,
    pub title_column_width: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            default_column_width: 100,
            title_column_width: 175,
        }
    }
}

/// Process-wide configuration, built once at startup and shared read-only
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth client ID
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Redis connection URL
    pub redis_url: String,
    /// Drive folder receiving generated documents (`MONTHLY_SHEET_FOLDER_ID`)
    pub folder_id: Option<String>,
    /// Compiled `CALENDAR_NAME_FILTER`
    pub calendar_filter: CalendarFilter,
    /// Day of month used as both window boundaries
    pub anchor_day: u32,
    /// Timezone in which local midnights and labels are computed
    pub timezone: Tz,
    /// Hour of the anchor day at which the monthly trigger fires
    pub schedule_hour: u32,
    /// Locale for the About sheet texts
    pub report_locale: String,
    /// Column widths
    pub layout: LayoutSettings,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> SummaryResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Self::from_lookup(|key| env::var(key).ok())?;

        if let Ok(content) = fs::read_to_string(LAYOUT_FILE) {
            config.layout = toml::from_str::<LayoutSettings>(&content)?;
        }

        Ok(config)
    }

    /// Build a configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> SummaryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Treat empty values the same as unset ones
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let google_client_id = get("GOOGLE_CLIENT_ID").ok_or_else(|| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            get("GOOGLE_CLIENT_SECRET").ok_or_else(|| env_error("GOOGLE_CLIENT_SECRET"))?;

        let redis_url = get("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string());
        let folder_id = get("MONTHLY_SHEET_FOLDER_ID");
        let calendar_filter = CalendarFilter::new(get("CALENDAR_NAME_FILTER").as_deref())?;

        let anchor_day = match get("DATE_RANGE_DAY") {
            Some(raw) => parse_bounded("DATE_RANGE_DAY", &raw, 1, 31)?,
            None => 1,
        };

        let schedule_hour = match get("SCHEDULE_HOUR") {
            Some(raw) => parse_bounded("SCHEDULE_HOUR", &raw, 0, 23)?,
            None => 0,
        };

        let timezone = get("TIMEZONE").unwrap_or_else(|| String::from("UTC"));
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|e| config_error(&format!("Invalid TIMEZONE '{}': {}", timezone, e)))?;

        let report_locale = get("REPORT_LOCALE").unwrap_or_else(|| String::from("en"));

        Ok(Config {
            google_client_id,
            google_client_secret,
            redis_url,
            folder_id,
            calendar_filter,
            anchor_day,
            timezone,
            schedule_hour,
            report_locale,
            layout: LayoutSettings::default(),
        })
    }
}

fn parse_bounded(name: &str, raw: &str, min: u32, max: u32) -> SummaryResult<u32> {
    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| config_error(&format!("Invalid {} format: '{}'", name, raw)))?;
    if value < min || value > max {
        return Err(config_error(&format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(value)
}
