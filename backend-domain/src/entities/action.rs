// Retention action audit record
// Immutable, appended after a successful dispatch

use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::utils::{millis_to_utc, utc_to_millis};
use crate::value_objects::RiskLevel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionAction {
    pub id: String,
    pub user_id: String,
    pub campaign_id: String,
    pub risk_level: RiskLevel,
    pub timestamp_ms: i64,
    pub status: String,
}

impl RetentionAction {
    pub fn sent(user_id: &str, campaign_id: &str, risk_level: RiskLevel, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            campaign_id: campaign_id.to_string(),
            risk_level,
            timestamp_ms: now_ms,
            status: "sent".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct RetentionActionRow {
    pub id: String,
    pub user_id: String,
    pub campaign_id: String,
    pub risk_level: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub action_time: OffsetDateTime,
    pub status: String,
}

impl From<&RetentionAction> for RetentionActionRow {
    fn from(action: &RetentionAction) -> Self {
        Self {
            id: action.id.clone(),
            user_id: action.user_id.clone(),
            campaign_id: action.campaign_id.clone(),
            risk_level: action.risk_level.as_str().to_string(),
            action_time: millis_to_utc(action.timestamp_ms),
            status: action.status.clone(),
        }
    }
}

impl From<RetentionActionRow> for RetentionAction {
    fn from(row: RetentionActionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            campaign_id: row.campaign_id,
            risk_level: RiskLevel::from(row.risk_level.as_str()),
            timestamp_ms: utc_to_millis(row.action_time),
            status: row.status,
        }
    }
}
