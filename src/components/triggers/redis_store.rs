use super::models::{Trigger, TriggerKind};
use super::TriggerService;
use crate::error::SummaryResult;
use async_trait::async_trait;
use chrono::Utc;
use redis::{AsyncCommands, Client as RedisClient};
use std::collections::HashMap;
use tracing::{debug, info};

/// Redis keys
mod keys {
    /// Hash of trigger id -> trigger JSON
    pub const TRIGGERS: &str = "calendar_summary:triggers";
}

/// Trigger registry persisted in a Redis hash
pub struct RedisTriggerStore {
    client: RedisClient,
}

impl RedisTriggerStore {
    pub fn new(redis_url: &str) -> SummaryResult<Self> {
        info!("Connecting to Redis at {}", redis_url);
        let client = RedisClient::open(redis_url)?;
        Ok(Self { client })
    }

    async fn get_connection(&self) -> SummaryResult<redis::aio::MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    async fn store(&self, handler: &str, kind: TriggerKind) -> SummaryResult<Trigger> {
        let trigger = Trigger {
            id: uuid::Uuid::new_v4().to_string(),
            handler: handler.to_string(),
            kind,
            created_at: Utc::now().timestamp(),
        };

        let mut conn = self.get_connection().await?;
        conn.hset::<_, _, _, ()>(keys::TRIGGERS, &trigger.id, serde_json::to_string(&trigger)?)
            .await?;

        debug!("Stored trigger {} for {}", trigger.id, handler);
        Ok(trigger)
    }
}

#[async_trait]
impl TriggerService for RedisTriggerStore {
    async fn list_triggers(&self, handler: &str) -> SummaryResult<Vec<Trigger>> {
        let mut conn = self.get_connection().await?;
        let entries: HashMap<String, String> = conn.hgetall(keys::TRIGGERS).await?;

        let mut triggers = Vec::with_capacity(entries.len());
        for json in entries.values() {
            let trigger: Trigger = serde_json::from_str(json)?;
            if trigger.handler == handler {
                triggers.push(trigger);
            }
        }
        triggers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(triggers)
    }

    async fn delete_trigger(&self, trigger_id: &str) -> SummaryResult<()> {
        let mut conn = self.get_connection().await?;
        conn.hdel::<_, _, ()>(keys::TRIGGERS, trigger_id).await?;
        Ok(())
    }

    async fn create_open_trigger(&self, handler: &str, document_id: &str) -> SummaryResult<Trigger> {
        self.store(
            handler,
            TriggerKind::OnOpen {
                source_id: document_id.to_string(),
            },
        )
        .await
    }

    async fn create_monthly_trigger(&self, handler: &str, day: u32, hour: u32) -> SummaryResult<Trigger> {
        self.store(handler, TriggerKind::Monthly { day, hour }).await
    }
}
