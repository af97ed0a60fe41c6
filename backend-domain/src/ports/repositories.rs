use async_trait::async_trait;

use crate::entities::{ActivityEvent, Campaign, PlayerState, RetentionAction, RewardGrant};
use crate::value_objects::CampaignStatus;

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn append_events(&self, events: &[ActivityEvent]) -> anyhow::Result<()>;
    /// Most recent events for one player, newest first.
    async fn recent_events(&self, user_id: &str, limit: usize)
        -> anyhow::Result<Vec<ActivityEvent>>;
    /// All events with a timestamp at or after `since_ms`, oldest first.
    async fn events_since(&self, since_ms: i64) -> anyhow::Result<Vec<ActivityEvent>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn upsert_state(&self, state: &PlayerState) -> anyhow::Result<()>;
    async fn fetch_state(&self, user_id: &str) -> anyhow::Result<Option<PlayerState>>;
    async fn fetch_all(&self) -> anyhow::Result<Vec<PlayerState>>;
    /// Non-churned players whose last activity predates `cutoff_ms`.
    async fn fetch_inactive_since(&self, cutoff_ms: i64) -> anyhow::Result<Vec<PlayerState>>;
}

#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn insert_campaign(&self, campaign: &Campaign) -> anyhow::Result<()>;
    /// Advance mutable fields (`last_run`, `status`) with a fresh row version.
    async fn update_campaign(&self, campaign: &Campaign) -> anyhow::Result<()>;
    async fn fetch_campaign(&self, id: &str) -> anyhow::Result<Option<Campaign>>;
    /// Catalog in stable insertion (creation) order.
    async fn fetch_all(&self) -> anyhow::Result<Vec<Campaign>>;
    async fn fetch_by_status(&self, status: CampaignStatus) -> anyhow::Result<Vec<Campaign>>;
}

#[async_trait]
pub trait ActionRepository: Send + Sync {
    async fn append_action(&self, action: &RetentionAction) -> anyhow::Result<()>;
    async fn recent_actions(&self, limit: usize) -> anyhow::Result<Vec<RetentionAction>>;
}

#[async_trait]
pub trait RewardRepository: Send + Sync {
    async fn insert_grant(&self, grant: &RewardGrant) -> anyhow::Result<()>;
}
