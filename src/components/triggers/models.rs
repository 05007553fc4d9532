use serde::{Deserialize, Serialize};

/// Handler invoked when a generated document is opened
pub const REPLAY_HANDLER: &str = "on_document_open";

/// Handler invoked by the monthly schedule
pub const TIME_HANDLER: &str = "on_time_trigger";

/// What fires a trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerKind {
    /// Fires when the source document is opened
    OnOpen { source_id: String },
    /// Fires on `day` of every month at `hour`
    Monthly { day: u32, hour: u32 },
}

/// A registered trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub handler: String,
    pub kind: TriggerKind,
    /// Unix timestamp in seconds
    pub created_at: i64,
}

impl Trigger {
    /// Document the trigger is bound to, if any
    pub fn source_id(&self) -> Option<&str> {
        match &self.kind {
            TriggerKind::OnOpen { source_id } => Some(source_id),
            TriggerKind::Monthly { .. } => None,
        }
    }
}

/// The event delivered when a document with a replay trigger is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOpened {
    pub document_id: String,
}
