use super::aggregator::build_calendar_sheet_data;
use super::builder::{DocumentBuilder, DocumentTarget};
use super::models::{CalendarSheetData, GeneratedDocument, DATE_RANGE_NAME};
use crate::components::calendar::{select_calendars, DateRange};
use crate::components::triggers::{DocumentOpened, DocumentStatus, RegenerationTriggerManager, Trigger};
use crate::components::Services;
use crate::config::Config;
use crate::error::SummaryResult;
use crate::utils::time::{last_month_window, latest_monthly_fire, MonthlyFire};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, info};

/// Where a replay took its window from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSource {
    /// Read back from the document's named range
    Persisted,
    /// Computed again from the anchor day and the current time
    Recomputed,
}

/// Result of handling a document-open event
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub window: DateRange,
    pub source: WindowSource,
    pub document: GeneratedDocument,
}

/// Window stored in a document's named range.
///
/// Accepts exactly two non-empty RFC 3339 values forming a non-empty range.
pub fn persisted_window(values: &[Vec<String>]) -> Option<DateRange> {
    let cells: Vec<&str> = values
        .iter()
        .flatten()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect();

    let [start, end] = cells.as_slice() else {
        return None;
    };

    let start = DateTime::parse_from_rfc3339(start).ok()?.with_timezone(&Utc);
    let end = DateTime::parse_from_rfc3339(end).ok()?.with_timezone(&Utc);
    DateRange::new(start, end).ok()
}

/// Use the persisted window when there is one, otherwise last month relative to `now`
pub fn resolve_replay_window(
    persisted: Option<DateRange>,
    anchor_day: u32,
    now: &DateTime<Tz>,
) -> (DateRange, WindowSource) {
    match persisted {
        Some(window) => (window, WindowSource::Persisted),
        None => (last_month_window(anchor_day, now), WindowSource::Recomputed),
    }
}

/// Runs generation: selects calendars, aggregates their events and builds the document
pub struct Generator {
    config: Arc<Config>,
    services: Services,
    triggers: RegenerationTriggerManager,
    builder: DocumentBuilder,
}

impl Generator {
    pub fn new(config: Arc<Config>, services: Services) -> Self {
        let triggers = RegenerationTriggerManager::new(
            Arc::clone(&services.triggers),
            Arc::clone(&services.storage),
        );
        let builder = DocumentBuilder::new(
            Arc::clone(&config),
            Arc::clone(&services.storage),
            Arc::clone(&services.sheets),
            triggers.clone(),
        );

        Self {
            config,
            services,
            triggers,
            builder,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `now` in the configured timezone
    fn local(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.config.timezone)
    }

    /// Sheet data for every selected calendar, in selection order
    pub async fn collect_sheet_data(&self, window: &DateRange) -> SummaryResult<Vec<CalendarSheetData>> {
        let all = self.services.calendar.list_calendars().await?;
        info!(
            "Unfiltered calendars: {}",
            all.iter().map(|c| c.display_name.as_str()).collect::<Vec<_>>().join(", ")
        );

        let selected = select_calendars(&all, &self.config.calendar_filter);
        info!(
            "Filtered calendars ({}): {}",
            self.config.calendar_filter.as_str(),
            selected.iter().map(|c| c.display_name.as_str()).collect::<Vec<_>>().join(", ")
        );

        let mut data = Vec::with_capacity(selected.len());
        for calendar in &selected {
            let events = self.services.calendar.list_events(&calendar.id, window).await?;
            debug!("Fetched {} events from {}", events.len(), calendar.display_name);
            data.push(build_calendar_sheet_data(calendar, &events, &self.config.timezone));
        }

        Ok(data)
    }

    /// Generate a document for an explicit window
    pub async fn generate_for_window(
        &self,
        window: &DateRange,
        target: &DocumentTarget,
        now: DateTime<Utc>,
    ) -> SummaryResult<GeneratedDocument> {
        info!("Generating calendar summary for {}", window);
        let data = self.collect_sheet_data(window).await?;
        let document = self.builder.build_document(window, &data, target, now).await?;
        info!(
            "Generated document {} with {} calendar sheets",
            document.id,
            document.calendar_sheets.len()
        );
        Ok(document)
    }

    /// Generate a new document covering last month
    pub async fn generate(&self, now: DateTime<Utc>) -> SummaryResult<GeneratedDocument> {
        let window = last_month_window(self.config.anchor_day, &self.local(now));
        self.generate_for_window(&window, &DocumentTarget::NewDocument, now)
            .await
    }

    /// Handler of the monthly time trigger.
    ///
    /// The window belongs to the latest scheduled firing at or before
    /// `fired_at`, so a firing that rolled over into the next month still
    /// covers the month it was scheduled for.
    pub async fn on_time_trigger(&self, fired_at: DateTime<Utc>) -> SummaryResult<GeneratedDocument> {
        let fire = latest_monthly_fire(
            &self.local(fired_at),
            self.config.anchor_day,
            self.config.schedule_hour,
        );
        self.on_monthly_fire(&fire, fired_at).await
    }

    /// Generate a new document for the window of a scheduled firing
    pub async fn on_monthly_fire(
        &self,
        fire: &MonthlyFire,
        fired_at: DateTime<Utc>,
    ) -> SummaryResult<GeneratedDocument> {
        info!(
            "Monthly trigger for {} fired at {}",
            fire.month.format("%Y-%m"),
            fired_at.to_rfc3339()
        );
        let window = fire.window(self.config.anchor_day, &self.config.timezone);
        self.generate_for_window(&window, &DocumentTarget::NewDocument, fired_at)
            .await
    }

    /// Regenerate an opened document for the window it was generated with
    pub async fn handle_document_opened(
        &self,
        event: DocumentOpened,
        now: DateTime<Utc>,
    ) -> SummaryResult<ReplayOutcome> {
        let values = self
            .services
            .sheets
            .read_named_range(&event.document_id, DATE_RANGE_NAME)
            .await?;
        let persisted = values.as_deref().and_then(persisted_window);

        let (window, source) = resolve_replay_window(persisted, self.config.anchor_day, &self.local(now));
        match source {
            WindowSource::Persisted => info!("Replaying {} with stored window {}", event.document_id, window),
            WindowSource::Recomputed => info!(
                "No valid stored window in {}, falling back to last month {}",
                event.document_id, window
            ),
        }

        let target = DocumentTarget::Existing {
            document_id: event.document_id,
        };
        let document = self.generate_for_window(&window, &target, now).await?;

        Ok(ReplayOutcome {
            window,
            source,
            document,
        })
    }

    /// Deliver an open event for `document_id` if a replay trigger is bound to it
    pub async fn dispatch_open(&self, document_id: &str, now: DateTime<Utc>) -> SummaryResult<Option<ReplayOutcome>> {
        match self.triggers.replay_trigger_for(document_id).await? {
            Some(trigger) => {
                debug!("Dispatching trigger {} for {}", trigger.id, document_id);
                let event = DocumentOpened {
                    document_id: document_id.to_string(),
                };
                self.handle_document_opened(event, now).await.map(Some)
            }
            None => {
                info!("Document {} has no replay trigger", document_id);
                Ok(None)
            }
        }
    }

    /// Install the monthly schedule from the configured anchor day and hour
    pub async fn install_schedule(&self) -> SummaryResult<Trigger> {
        self.triggers
            .install_monthly_trigger(self.config.anchor_day, self.config.schedule_hour)
            .await
    }

    /// Spreadsheets in the target folder with their replay trigger status
    pub async fn inventory(&self) -> SummaryResult<Vec<DocumentStatus>> {
        let folder = self.builder.resolve_target_folder().await?;
        self.triggers.inventory(&folder).await
    }
}
