use std::sync::Arc;

use anyhow::Result;
use clickhouse::Client;
use tracing::{info, warn};

use backend_application::commands::campaign_commands;
use backend_application::{AppState, Metrics};
use backend_domain::ports::ActivityRepository;
use backend_infrastructure::{
    load_campaign_seeds, AppConfig, ClickhouseStore, MemoryTtlCache, WebhookEmailChannel,
    WebhookPushChannel, WebhookSmsChannel,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let mut clickhouse = Client::default()
            .with_url(&db_config.clickhouse_url)
            .with_database(&db_config.clickhouse_database);
        if let Some(user) = &db_config.clickhouse_user {
            clickhouse = clickhouse.with_user(user);
        }
        if let Some(password) = &db_config.clickhouse_password {
            clickhouse = clickhouse.with_password(password);
        }

        let store = Arc::new(ClickhouseStore::new(clickhouse));
        store.ensure_schema().await?;

        let push_channel = Arc::new(WebhookPushChannel::from_config(&runtime_config)?);
        let email_channel = Arc::new(WebhookEmailChannel::from_config(&runtime_config)?);
        let sms_channel = Arc::new(WebhookSmsChannel::from_config(&runtime_config)?);

        let state = AppState {
            config: runtime_config,
            activity_repo: store.clone(),
            player_repo: store.clone(),
            campaign_repo: store.clone(),
            action_repo: store.clone(),
            reward_repo: store,
            cache: Arc::new(MemoryTtlCache::new()),
            push_channel,
            email_channel,
            sms_channel,
            metrics: Arc::new(Metrics::default()),
        };

        seed_campaigns_if_empty(&state).await;

        Ok(Self { state })
    }
}

/// Pre-populate an empty catalog from the optional seed file. Failures only
/// warn; an unseeded catalog is a valid (if quiet) deployment.
async fn seed_campaigns_if_empty(state: &AppState) {
    let existing = match state.campaign_repo.fetch_all().await {
        Ok(campaigns) => campaigns,
        Err(err) => {
            warn!("campaign seed check skipped: {}", err);
            return;
        }
    };
    if !existing.is_empty() {
        return;
    }
    let drafts = match load_campaign_seeds(&state.config.campaigns_path).await {
        Ok(drafts) => drafts,
        Err(err) => {
            warn!(
                "campaign seed file {} unreadable: {}",
                state.config.campaigns_path, err
            );
            return;
        }
    };
    let mut seeded = 0usize;
    for draft in drafts {
        match campaign_commands::create_campaign(state, draft).await {
            Ok(_) => seeded += 1,
            Err(err) => warn!("campaign seed rejected: {}", err),
        }
    }
    if seeded > 0 {
        info!("seeded {} campaigns from {}", seeded, state.config.campaigns_path);
    }
}
