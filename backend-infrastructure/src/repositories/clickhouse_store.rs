//! ClickHouse-backed durable store.
//!
//! `activity_events`, `retention_actions` and the reward tables are
//! append-only MergeTrees. `player_activity` and `retention_campaigns` are
//! ReplacingMergeTrees versioned by `updated_at`: an upsert is a fresh row
//! version and reads go through `FINAL`, which makes concurrent writers to
//! the same key last-write-wins on that monotonic timestamp.

use async_trait::async_trait;
use clickhouse::Client;

use backend_domain::ports::{
    ActionRepository, ActivityRepository, CampaignRepository, PlayerRepository, RewardRepository,
};
use backend_domain::utils::current_millis;
use backend_domain::{
    ActivityEvent, ActivityEventRow, Campaign, CampaignRow, CampaignStatus, PlayerState,
    PlayerStateRow, RetentionAction, RetentionActionRow, RewardGrant, RewardGrantRow, RewardKind,
};

pub struct ClickhouseStore {
    client: Client,
}

impl ClickhouseStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn reward_table(kind: RewardKind) -> &'static str {
        match kind {
            RewardKind::Offer => "in_game_offers",
            RewardKind::ComebackBonus => "comeback_bonuses",
        }
    }

    async fn write_campaign_version(&self, campaign: &Campaign) -> anyhow::Result<()> {
        let row = CampaignRow::from_campaign(campaign, current_millis());
        let mut insert = self.client.insert("retention_campaigns")?;
        insert.write(&row).await?;
        insert.end().await?;
        Ok(())
    }
}

#[async_trait]
impl ActivityRepository for ClickhouseStore {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS activity_events (
                event_time DateTime64(3),
                user_id String,
                event_type String,
                amount Nullable(Float64),
                level Nullable(UInt32),
                score Nullable(Int64)
            ) ENGINE = MergeTree ORDER BY (user_id, event_time)",
            "CREATE TABLE IF NOT EXISTS player_activity (
                user_id String,
                display_name String,
                email String,
                phone String,
                last_activity DateTime64(3),
                status String,
                risk_score Float64,
                risk_level String,
                total_spent Float64,
                session_count UInt64,
                level UInt32,
                last_score Int64,
                segment String,
                updated_at DateTime64(3)
            ) ENGINE = ReplacingMergeTree(updated_at) ORDER BY user_id",
            "CREATE TABLE IF NOT EXISTS retention_campaigns (
                id String,
                campaign_type String,
                risk_level String,
                segments Array(String),
                min_spending Float64,
                max_spending Float64,
                title String,
                message String,
                rewards Array(String),
                discount_percent Nullable(Float64),
                duration_seconds UInt64,
                interval_seconds UInt64,
                last_run DateTime64(3),
                status String,
                created_at DateTime64(3),
                updated_at DateTime64(3)
            ) ENGINE = ReplacingMergeTree(updated_at) ORDER BY id",
            "CREATE TABLE IF NOT EXISTS retention_actions (
                id String,
                user_id String,
                campaign_id String,
                risk_level String,
                action_time DateTime64(3),
                status String
            ) ENGINE = MergeTree ORDER BY (action_time, user_id)",
            "CREATE TABLE IF NOT EXISTS in_game_offers (
                id String,
                user_id String,
                campaign_id String,
                rewards Array(String),
                discount_percent Nullable(Float64),
                granted_at DateTime64(3),
                expires_at DateTime64(3)
            ) ENGINE = MergeTree ORDER BY (user_id, granted_at)",
            "CREATE TABLE IF NOT EXISTS comeback_bonuses (
                id String,
                user_id String,
                campaign_id String,
                rewards Array(String),
                discount_percent Nullable(Float64),
                granted_at DateTime64(3),
                expires_at DateTime64(3)
            ) ENGINE = MergeTree ORDER BY (user_id, granted_at)",
        ];
        for ddl in statements {
            self.client.query(ddl).execute().await?;
        }
        Ok(())
    }

    async fn append_events(&self, events: &[ActivityEvent]) -> anyhow::Result<()> {
        let mut insert = self.client.insert("activity_events")?;
        for event in events {
            insert.write(&ActivityEventRow::from(event)).await?;
        }
        insert.end().await?;
        Ok(())
    }

    async fn recent_events(
        &self,
        user_id: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<ActivityEvent>> {
        let rows = self
            .client
            .query(
                "SELECT ?fields FROM activity_events \
                 WHERE user_id = ? ORDER BY event_time DESC LIMIT ?",
            )
            .bind(user_id)
            .bind(limit as u64)
            .fetch_all::<ActivityEventRow>()
            .await?;
        Ok(rows.into_iter().map(ActivityEvent::from).collect())
    }

    async fn events_since(&self, since_ms: i64) -> anyhow::Result<Vec<ActivityEvent>> {
        let rows = self
            .client
            .query(
                "SELECT ?fields FROM activity_events \
                 WHERE event_time >= fromUnixTimestamp64Milli(?) ORDER BY event_time ASC",
            )
            .bind(since_ms)
            .fetch_all::<ActivityEventRow>()
            .await?;
        Ok(rows.into_iter().map(ActivityEvent::from).collect())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.client.query("SELECT 1").execute().await?;
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for ClickhouseStore {
    async fn upsert_state(&self, state: &PlayerState) -> anyhow::Result<()> {
        let row = PlayerStateRow::from(state);
        let mut insert = self.client.insert("player_activity")?;
        insert.write(&row).await?;
        insert.end().await?;
        Ok(())
    }

    async fn fetch_state(&self, user_id: &str) -> anyhow::Result<Option<PlayerState>> {
        let row = self
            .client
            .query("SELECT ?fields FROM player_activity FINAL WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional::<PlayerStateRow>()
            .await?;
        Ok(row.map(PlayerState::from))
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<PlayerState>> {
        let rows = self
            .client
            .query("SELECT ?fields FROM player_activity FINAL")
            .fetch_all::<PlayerStateRow>()
            .await?;
        Ok(rows.into_iter().map(PlayerState::from).collect())
    }

    async fn fetch_inactive_since(&self, cutoff_ms: i64) -> anyhow::Result<Vec<PlayerState>> {
        let rows = self
            .client
            .query(
                "SELECT ?fields FROM player_activity FINAL \
                 WHERE last_activity < fromUnixTimestamp64Milli(?) AND status != 'churned'",
            )
            .bind(cutoff_ms)
            .fetch_all::<PlayerStateRow>()
            .await?;
        Ok(rows.into_iter().map(PlayerState::from).collect())
    }
}

#[async_trait]
impl CampaignRepository for ClickhouseStore {
    async fn insert_campaign(&self, campaign: &Campaign) -> anyhow::Result<()> {
        self.write_campaign_version(campaign).await
    }

    async fn update_campaign(&self, campaign: &Campaign) -> anyhow::Result<()> {
        self.write_campaign_version(campaign).await
    }

    async fn fetch_campaign(&self, id: &str) -> anyhow::Result<Option<Campaign>> {
        let row = self
            .client
            .query("SELECT ?fields FROM retention_campaigns FINAL WHERE id = ?")
            .bind(id)
            .fetch_optional::<CampaignRow>()
            .await?;
        Ok(row.map(Campaign::from))
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<Campaign>> {
        let rows = self
            .client
            .query("SELECT ?fields FROM retention_campaigns FINAL ORDER BY created_at ASC")
            .fetch_all::<CampaignRow>()
            .await?;
        Ok(rows.into_iter().map(Campaign::from).collect())
    }

    async fn fetch_by_status(&self, status: CampaignStatus) -> anyhow::Result<Vec<Campaign>> {
        let rows = self
            .client
            .query(
                "SELECT ?fields FROM retention_campaigns FINAL \
                 WHERE status = ? ORDER BY created_at ASC",
            )
            .bind(status.as_str())
            .fetch_all::<CampaignRow>()
            .await?;
        Ok(rows.into_iter().map(Campaign::from).collect())
    }
}

#[async_trait]
impl ActionRepository for ClickhouseStore {
    async fn append_action(&self, action: &RetentionAction) -> anyhow::Result<()> {
        let row = RetentionActionRow::from(action);
        let mut insert = self.client.insert("retention_actions")?;
        insert.write(&row).await?;
        insert.end().await?;
        Ok(())
    }

    async fn recent_actions(&self, limit: usize) -> anyhow::Result<Vec<RetentionAction>> {
        let rows = self
            .client
            .query(
                "SELECT ?fields FROM retention_actions \
                 ORDER BY action_time DESC LIMIT ?",
            )
            .bind(limit as u64)
            .fetch_all::<RetentionActionRow>()
            .await?;
        Ok(rows.into_iter().map(RetentionAction::from).collect())
    }
}

#[async_trait]
impl RewardRepository for ClickhouseStore {
    async fn insert_grant(&self, grant: &RewardGrant) -> anyhow::Result<()> {
        let row = RewardGrantRow::from(grant);
        let mut insert = self.client.insert(Self::reward_table(grant.kind))?;
        insert.write(&row).await?;
        insert.end().await?;
        Ok(())
    }
}
