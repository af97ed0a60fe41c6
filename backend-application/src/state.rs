use std::sync::Arc;

use backend_domain::ports::{
    ActionRepository, ActivityRepository, CampaignRepository, EmailChannel, NotificationChannel,
    PlayerRepository, RealtimeCache, RewardRepository, SmsChannel,
};
use backend_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub activity_repo: Arc<dyn ActivityRepository>,
    pub player_repo: Arc<dyn PlayerRepository>,
    pub campaign_repo: Arc<dyn CampaignRepository>,
    pub action_repo: Arc<dyn ActionRepository>,
    pub reward_repo: Arc<dyn RewardRepository>,
    pub cache: Arc<dyn RealtimeCache>,
    pub push_channel: Arc<dyn NotificationChannel>,
    pub email_channel: Arc<dyn EmailChannel>,
    pub sms_channel: Arc<dyn SmsChannel>,
    pub metrics: Arc<Metrics>,
}
