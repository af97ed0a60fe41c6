// In-memory port fakes shared by the unit tests in this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;

use backend_domain::ports::{
    ActionRepository, ActivityRepository, CampaignRepository, EmailChannel, NotificationChannel,
    PlayerRepository, RealtimeCache, RewardRepository, SmsChannel,
};
use backend_domain::{
    ActivityEvent, Campaign, CampaignDraft, CampaignStatus, CampaignType, PlayerState,
    PlayerStatus, RetentionAction, RewardGrant, RiskLevel, RuntimeConfig,
    DEFAULT_CAMPAIGN_DURATION_SECONDS, DEFAULT_CAMPAIGN_INTERVAL_SECONDS,
};

use crate::{AppState, Metrics};

pub(crate) fn draft(campaign_type: CampaignType, risk_level: RiskLevel) -> CampaignDraft {
    CampaignDraft {
        campaign_type,
        risk_level,
        segments: Vec::new(),
        min_spending: 0.0,
        max_spending: f64::INFINITY,
        title: "We miss you".to_string(),
        message: "Come back, {playerName}!".to_string(),
        rewards: vec!["starter_pack".to_string()],
        discount_percent: None,
        duration_seconds: DEFAULT_CAMPAIGN_DURATION_SECONDS,
        interval_seconds: DEFAULT_CAMPAIGN_INTERVAL_SECONDS,
    }
}

fn test_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: None,
        campaigns_path: String::new(),
        push_webhook_url: None,
        email_webhook_url: None,
        sms_webhook_url: None,
        dispatch_timeout_seconds: 5,
        request_timeout_seconds: 15,
        max_body_bytes: 1024 * 1024,
        at_risk_scan_minutes: 30,
        campaign_sweep_minutes: 60,
        state_refresh_minutes: 5,
        at_risk_after_hours: 24,
        churn_after_days: 30,
        score_event_limit: 100,
        log_dir: None,
    }
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    events: Mutex<Vec<ActivityEvent>>,
    players: Mutex<HashMap<String, PlayerState>>,
    campaigns: Mutex<Vec<Campaign>>,
    actions: Mutex<Vec<RetentionAction>>,
    grants: Mutex<Vec<RewardGrant>>,
    fail_activity_reads: AtomicBool,
    fail_activity_writes: AtomicBool,
    fail_reward_writes: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn seed_events(&self, events: Vec<ActivityEvent>) {
        self.events.lock().unwrap().extend(events);
    }

    pub(crate) fn seed_player(&self, player: PlayerState) {
        self.players
            .lock()
            .unwrap()
            .insert(player.user_id.clone(), player);
    }

    pub(crate) fn seed_campaign(&self, campaign: Campaign) {
        self.campaigns.lock().unwrap().push(campaign);
    }

    pub(crate) fn player(&self, user_id: &str) -> Option<PlayerState> {
        self.players.lock().unwrap().get(user_id).cloned()
    }

    pub(crate) fn campaign(&self, id: &str) -> Option<Campaign> {
        self.campaigns
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    pub(crate) fn campaigns(&self) -> Vec<Campaign> {
        self.campaigns.lock().unwrap().clone()
    }

    pub(crate) fn actions(&self) -> Vec<RetentionAction> {
        self.actions.lock().unwrap().clone()
    }

    pub(crate) fn grants(&self) -> Vec<RewardGrant> {
        self.grants.lock().unwrap().clone()
    }

    pub(crate) fn fail_activity_reads(&self, value: bool) {
        self.fail_activity_reads.store(value, Ordering::Relaxed);
    }

    pub(crate) fn fail_activity_writes(&self, value: bool) {
        self.fail_activity_writes.store(value, Ordering::Relaxed);
    }

    pub(crate) fn fail_reward_writes(&self, value: bool) {
        self.fail_reward_writes.store(value, Ordering::Relaxed);
    }
}

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn append_events(&self, events: &[ActivityEvent]) -> anyhow::Result<()> {
        if self.fail_activity_writes.load(Ordering::Relaxed) {
            return Err(anyhow!("activity store unavailable"));
        }
        self.events.lock().unwrap().extend_from_slice(events);
        Ok(())
    }

    async fn recent_events(
        &self,
        user_id: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<ActivityEvent>> {
        if self.fail_activity_reads.load(Ordering::Relaxed) {
            return Err(anyhow!("activity store unavailable"));
        }
        let mut events: Vec<ActivityEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| std::cmp::Reverse(e.timestamp_ms));
        events.truncate(limit);
        Ok(events)
    }

    async fn events_since(&self, since_ms: i64) -> anyhow::Result<Vec<ActivityEvent>> {
        if self.fail_activity_reads.load(Ordering::Relaxed) {
            return Err(anyhow!("activity store unavailable"));
        }
        let mut events: Vec<ActivityEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.timestamp_ms >= since_ms)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.timestamp_ms);
        Ok(events)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for MemoryStore {
    async fn upsert_state(&self, state: &PlayerState) -> anyhow::Result<()> {
        self.players
            .lock()
            .unwrap()
            .insert(state.user_id.clone(), state.clone());
        Ok(())
    }

    async fn fetch_state(&self, user_id: &str) -> anyhow::Result<Option<PlayerState>> {
        Ok(self.players.lock().unwrap().get(user_id).cloned())
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<PlayerState>> {
        let mut players: Vec<PlayerState> = self.players.lock().unwrap().values().cloned().collect();
        players.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(players)
    }

    async fn fetch_inactive_since(&self, cutoff_ms: i64) -> anyhow::Result<Vec<PlayerState>> {
        let mut players: Vec<PlayerState> = self
            .players
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.last_activity_ms < cutoff_ms && p.status != PlayerStatus::Churned)
            .cloned()
            .collect();
        players.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(players)
    }
}

#[async_trait]
impl CampaignRepository for MemoryStore {
    async fn insert_campaign(&self, campaign: &Campaign) -> anyhow::Result<()> {
        self.campaigns.lock().unwrap().push(campaign.clone());
        Ok(())
    }

    async fn update_campaign(&self, campaign: &Campaign) -> anyhow::Result<()> {
        let mut campaigns = self.campaigns.lock().unwrap();
        match campaigns.iter_mut().find(|c| c.id == campaign.id) {
            Some(slot) => {
                *slot = campaign.clone();
                Ok(())
            }
            None => Err(anyhow!("campaign {} not found", campaign.id)),
        }
    }

    async fn fetch_campaign(&self, id: &str) -> anyhow::Result<Option<Campaign>> {
        Ok(self.campaign(id))
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<Campaign>> {
        Ok(self.campaigns())
    }

    async fn fetch_by_status(&self, status: CampaignStatus) -> anyhow::Result<Vec<Campaign>> {
        Ok(self
            .campaigns()
            .into_iter()
            .filter(|c| c.status == status)
            .collect())
    }
}

#[async_trait]
impl ActionRepository for MemoryStore {
    async fn append_action(&self, action: &RetentionAction) -> anyhow::Result<()> {
        self.actions.lock().unwrap().push(action.clone());
        Ok(())
    }

    async fn recent_actions(&self, limit: usize) -> anyhow::Result<Vec<RetentionAction>> {
        let mut actions = self.actions();
        actions.sort_by_key(|a| std::cmp::Reverse(a.timestamp_ms));
        actions.truncate(limit);
        Ok(actions)
    }
}

#[async_trait]
impl RewardRepository for MemoryStore {
    async fn insert_grant(&self, grant: &RewardGrant) -> anyhow::Result<()> {
        if self.fail_reward_writes.load(Ordering::Relaxed) {
            return Err(anyhow!("reward store unavailable"));
        }
        self.grants.lock().unwrap().push(grant.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryCache {
    entries: Mutex<HashMap<String, serde_json::Value>>,
    fail: AtomicBool,
}

impl MemoryCache {
    pub(crate) fn fail(&self, value: bool) {
        self.fail.store(value, Ordering::Relaxed);
    }

    pub(crate) fn get_raw(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl RealtimeCache for MemoryCache {
    async fn set_with_ttl(
        &self,
        key: &str,
        value: serde_json::Value,
        _ttl_seconds: u64,
    ) -> anyhow::Result<()> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(anyhow!("cache unavailable"));
        }
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(anyhow!("cache unavailable"));
        }
        Ok(self.get_raw(key))
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingPush {
    sent: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl RecordingPush {
    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn fail(&self, value: bool) {
        self.fail.store(value, Ordering::Relaxed);
    }
}

#[async_trait]
impl NotificationChannel for RecordingPush {
    async fn send(
        &self,
        user_id: &str,
        message: &str,
        _data: &serde_json::Value,
    ) -> anyhow::Result<()> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(anyhow!("push gateway rejected the message"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((user_id.to_string(), message.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingEmail {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingEmail {
    pub(crate) fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailChannel for RecordingEmail {
    async fn send(
        &self,
        email: &str,
        subject: &str,
        body: &str,
        _data: &serde_json::Value,
    ) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push((
            email.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingSms {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSms {
    #[allow(dead_code)]
    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsChannel for RecordingSms {
    async fn send(&self, phone: &str, message: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), message.to_string()));
        Ok(())
    }
}

pub(crate) struct TestHarness {
    pub(crate) state: AppState,
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) cache: Arc<MemoryCache>,
    pub(crate) push: Arc<RecordingPush>,
    pub(crate) email: Arc<RecordingEmail>,
    #[allow(dead_code)]
    pub(crate) sms: Arc<RecordingSms>,
}

impl TestHarness {
    pub(crate) fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let cache = Arc::new(MemoryCache::default());
        let push = Arc::new(RecordingPush::default());
        let email = Arc::new(RecordingEmail::default());
        let sms = Arc::new(RecordingSms::default());
        let state = AppState {
            config: test_config(),
            activity_repo: store.clone(),
            player_repo: store.clone(),
            campaign_repo: store.clone(),
            action_repo: store.clone(),
            reward_repo: store.clone(),
            cache: cache.clone(),
            push_channel: push.clone(),
            email_channel: email.clone(),
            sms_channel: sms.clone(),
            metrics: Arc::new(Metrics::default()),
        };
        Self {
            state,
            store,
            cache,
            push,
            email,
            sms,
        }
    }
}
