pub mod manager;
pub mod models;
pub mod redis_store;

pub use manager::{DocumentStatus, InstallReport, RegenerationTriggerManager};
pub use models::{DocumentOpened, Trigger, TriggerKind, REPLAY_HANDLER, TIME_HANDLER};
pub use redis_store::RedisTriggerStore;

use crate::error::SummaryResult;
use async_trait::async_trait;

/// Registry of installed triggers
#[async_trait]
pub trait TriggerService: Send + Sync + 'static {
    /// Triggers invoking `handler`, oldest first
    async fn list_triggers(&self, handler: &str) -> SummaryResult<Vec<Trigger>>;

    async fn delete_trigger(&self, trigger_id: &str) -> SummaryResult<()>;

    /// Install a trigger firing `handler` whenever `document_id` is opened
    async fn create_open_trigger(&self, handler: &str, document_id: &str) -> SummaryResult<Trigger>;

    /// Install a trigger firing `handler` on `day` of every month at `hour`
    async fn create_monthly_trigger(&self, handler: &str, day: u32, hour: u32) -> SummaryResult<Trigger>;
}
