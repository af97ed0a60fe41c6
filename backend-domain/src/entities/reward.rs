// Transient reward grants (in-game offers and comeback bonuses)
// Written to the durable store and mirrored into the real-time cache with a TTL

use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::Campaign;
use crate::utils::{millis_to_utc, utc_to_millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Offer,
    ComebackBonus,
}

impl RewardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardKind::Offer => "offer",
            RewardKind::ComebackBonus => "comeback_bonus",
        }
    }
}

impl From<&str> for RewardKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "comeback_bonus" => RewardKind::ComebackBonus,
            _ => RewardKind::Offer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardGrant {
    pub id: String,
    pub user_id: String,
    pub campaign_id: String,
    pub kind: RewardKind,
    pub rewards: Vec<String>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    pub granted_at_ms: i64,
    pub expires_at_ms: i64,
}

impl RewardGrant {
    pub fn from_campaign(kind: RewardKind, user_id: &str, campaign: &Campaign, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            campaign_id: campaign.id.clone(),
            kind,
            rewards: campaign.rewards.clone(),
            discount_percent: campaign.discount_percent,
            granted_at_ms: now_ms,
            expires_at_ms: now_ms + campaign.duration_seconds as i64 * 1000,
        }
    }

    /// Cache key convention: `offer:{userId}` / `bonus:{userId}`.
    pub fn cache_key(&self) -> String {
        match self.kind {
            RewardKind::Offer => format!("offer:{}", self.user_id),
            RewardKind::ComebackBonus => format!("bonus:{}", self.user_id),
        }
    }
}

/// Live (unexpired) reward view assembled from the real-time cache.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRewards {
    pub offer: Option<serde_json::Value>,
    pub bonus: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct RewardGrantRow {
    pub id: String,
    pub user_id: String,
    pub campaign_id: String,
    pub rewards: Vec<String>,
    pub discount_percent: Option<f64>,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub granted_at: OffsetDateTime,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub expires_at: OffsetDateTime,
}

impl From<&RewardGrant> for RewardGrantRow {
    fn from(grant: &RewardGrant) -> Self {
        Self {
            id: grant.id.clone(),
            user_id: grant.user_id.clone(),
            campaign_id: grant.campaign_id.clone(),
            rewards: grant.rewards.clone(),
            discount_percent: grant.discount_percent,
            granted_at: millis_to_utc(grant.granted_at_ms),
            expires_at: millis_to_utc(grant.expires_at_ms),
        }
    }
}
