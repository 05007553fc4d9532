use super::models::{Trigger, REPLAY_HANDLER, TIME_HANDLER};
use super::TriggerService;
use crate::components::storage::{FileEntry, Folder, StorageService};
use crate::error::SummaryResult;
use futures::TryStreamExt;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of reinstalling a document's replay trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Stale or superseded triggers removed
    pub pruned: usize,
    /// The trigger now bound to the document
    pub installed: Trigger,
}

/// A spreadsheet in the target folder and whether it can regenerate itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStatus {
    pub file: FileEntry,
    pub has_replay_trigger: bool,
}

/// Keeps exactly one replay trigger per live generated document
#[derive(Clone)]
pub struct RegenerationTriggerManager {
    triggers: Arc<dyn TriggerService>,
    storage: Arc<dyn StorageService>,
}

impl RegenerationTriggerManager {
    pub fn new(triggers: Arc<dyn TriggerService>, storage: Arc<dyn StorageService>) -> Self {
        Self { triggers, storage }
    }

    /// Whether a replay trigger should be removed before installing one for `document_id`.
    ///
    /// A source document that cannot be looked up counts as gone.
    async fn is_prunable(&self, trigger: &Trigger, document_id: &str) -> bool {
        match trigger.source_id() {
            Some(source) if source == document_id => true,
            Some(source) => match self.storage.file_exists(source).await {
                Ok(exists) => !exists,
                Err(e) => {
                    warn!(
                        "Could not look up {} for trigger {}, treating it as deleted: {}",
                        source, trigger.id, e
                    );
                    true
                }
            },
            None => false,
        }
    }

    /// Prune dead and superseded replay triggers, then bind a fresh one to `document_id`.
    ///
    /// Not atomic: a failure between pruning and installing leaves the
    /// document without a trigger, never with two.
    pub async fn install_replay_trigger(&self, document_id: &str) -> SummaryResult<InstallReport> {
        let existing = self.triggers.list_triggers(REPLAY_HANDLER).await?;

        let mut pruned = 0;
        for trigger in &existing {
            if self.is_prunable(trigger, document_id).await {
                debug!(
                    "Deleting replay trigger {} for {:?}",
                    trigger.id,
                    trigger.source_id()
                );
                self.triggers.delete_trigger(&trigger.id).await?;
                pruned += 1;
            }
        }

        let installed = self
            .triggers
            .create_open_trigger(REPLAY_HANDLER, document_id)
            .await?;

        info!(
            "Installed replay trigger {} for document {} ({} pruned, {} kept)",
            installed.id,
            document_id,
            pruned,
            existing.len() - pruned
        );

        Ok(InstallReport { pruned, installed })
    }

    /// The replay trigger bound to `document_id`, if one is installed
    pub async fn replay_trigger_for(&self, document_id: &str) -> SummaryResult<Option<Trigger>> {
        let triggers = self.triggers.list_triggers(REPLAY_HANDLER).await?;
        Ok(triggers
            .into_iter()
            .find(|t| t.source_id() == Some(document_id)))
    }

    /// Replace any monthly schedule with one firing on `day` at `hour`
    pub async fn install_monthly_trigger(&self, day: u32, hour: u32) -> SummaryResult<Trigger> {
        for trigger in self.triggers.list_triggers(TIME_HANDLER).await? {
            self.triggers.delete_trigger(&trigger.id).await?;
        }
        let trigger = self
            .triggers
            .create_monthly_trigger(TIME_HANDLER, day, hour)
            .await?;
        info!("Installed monthly trigger {} (day {}, {:02}:00)", trigger.id, day, hour);
        Ok(trigger)
    }

    /// Spreadsheets in `folder` with their replay trigger status
    pub async fn inventory(&self, folder: &Folder) -> SummaryResult<Vec<DocumentStatus>> {
        let bound: HashSet<String> = self
            .triggers
            .list_triggers(REPLAY_HANDLER)
            .await?
            .iter()
            .filter_map(|t| t.source_id().map(str::to_string))
            .collect();

        let files: Vec<FileEntry> = self
            .storage
            .list_files(folder)
            .try_filter(|file| futures::future::ready(file.is_spreadsheet()))
            .try_collect()
            .await?;

        Ok(files
            .into_iter()
            .map(|file| DocumentStatus {
                has_replay_trigger: bound.contains(&file.id),
                file,
            })
            .collect())
    }
}
