// Campaign entity
// A targeting rule plus an action template, re-fireable at a fixed interval

use clickhouse::Row;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::utils::{millis_to_utc, utc_to_millis};
use crate::value_objects::{CampaignStatus, CampaignType, RiskLevel};

pub const DEFAULT_CAMPAIGN_DURATION_SECONDS: u64 = 86_400;
pub const DEFAULT_CAMPAIGN_INTERVAL_SECONDS: u64 = 86_400;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub campaign_type: CampaignType,
    pub risk_level: RiskLevel,
    pub segments: Vec<String>,
    pub min_spending: f64,
    pub max_spending: f64,
    pub title: String,
    pub message: String,
    pub rewards: Vec<String>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    pub duration_seconds: u64,
    pub interval_seconds: u64,
    /// Epoch millis of the last campaign-sweep firing; 0 means never fired.
    pub last_run_ms: i64,
    pub status: CampaignStatus,
    pub created_at_ms: i64,
}

impl Campaign {
    pub fn from_draft(draft: CampaignDraft, now_ms: i64) -> Result<Self, CampaignValidationError> {
        draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            campaign_type: draft.campaign_type,
            risk_level: draft.risk_level,
            segments: draft.segments,
            min_spending: draft.min_spending,
            max_spending: draft.max_spending,
            title: draft.title,
            message: draft.message,
            rewards: draft.rewards,
            discount_percent: draft.discount_percent,
            duration_seconds: draft.duration_seconds,
            interval_seconds: draft.interval_seconds,
            last_run_ms: 0,
            status: CampaignStatus::Active,
            created_at_ms: now_ms,
        })
    }

    /// Interval gate used by the campaign sweep: due once `interval` has
    /// fully elapsed since `last_run` (inclusive).
    pub fn is_due(&self, now_ms: i64) -> bool {
        now_ms - self.last_run_ms >= self.interval_seconds as i64 * 1000
    }
}

/// Admin-boundary creation payload with the documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub campaign_type: CampaignType,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub segments: Vec<String>,
    #[serde(default)]
    pub min_spending: f64,
    #[serde(default = "default_max_spending")]
    pub max_spending: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rewards: Vec<String>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u64,
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

impl CampaignDraft {
    pub fn validate(&self) -> Result<(), CampaignValidationError> {
        if self.campaign_type.requires_message() && self.message.trim().is_empty() {
            return Err(CampaignValidationError::MissingMessage);
        }
        if self.min_spending < 0.0 || self.max_spending < self.min_spending {
            return Err(CampaignValidationError::InvalidSpendingBounds);
        }
        if self.duration_seconds == 0 {
            return Err(CampaignValidationError::ZeroDuration);
        }
        if self.interval_seconds == 0 {
            return Err(CampaignValidationError::ZeroInterval);
        }
        if let Some(discount) = self.discount_percent {
            if !(0.0..=100.0).contains(&discount) {
                return Err(CampaignValidationError::InvalidDiscount);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CampaignValidationError {
    #[error("message template must not be empty for push/email/sms campaigns")]
    MissingMessage,
    #[error("min_spending must be >= 0 and <= max_spending")]
    InvalidSpendingBounds,
    #[error("duration_seconds must be greater than 0")]
    ZeroDuration,
    #[error("interval_seconds must be greater than 0")]
    ZeroInterval,
    #[error("discount_percent must be within 0..=100")]
    InvalidDiscount,
}

fn default_max_spending() -> f64 {
    f64::INFINITY
}

fn default_duration_seconds() -> u64 {
    DEFAULT_CAMPAIGN_DURATION_SECONDS
}

fn default_interval_seconds() -> u64 {
    DEFAULT_CAMPAIGN_INTERVAL_SECONDS
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct CampaignRow {
    pub id: String,
    pub campaign_type: String,
    pub risk_level: String,
    pub segments: Vec<String>,
    pub min_spending: f64,
    pub max_spending: f64,
    pub title: String,
    pub message: String,
    pub rewards: Vec<String>,
    pub discount_percent: Option<f64>,
    pub duration_seconds: u64,
    pub interval_seconds: u64,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub last_run: OffsetDateTime,
    pub status: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub created_at: OffsetDateTime,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub updated_at: OffsetDateTime,
}

impl CampaignRow {
    pub fn from_campaign(campaign: &Campaign, updated_at_ms: i64) -> Self {
        Self {
            id: campaign.id.clone(),
            campaign_type: campaign.campaign_type.as_str().to_string(),
            risk_level: campaign.risk_level.as_str().to_string(),
            segments: campaign.segments.clone(),
            min_spending: campaign.min_spending,
            // Infinity does not survive a Float64 column round-trip cleanly
            // everywhere; store the sentinel as MAX and restore on read.
            max_spending: if campaign.max_spending.is_finite() {
                campaign.max_spending
            } else {
                f64::MAX
            },
            title: campaign.title.clone(),
            message: campaign.message.clone(),
            rewards: campaign.rewards.clone(),
            discount_percent: campaign.discount_percent,
            duration_seconds: campaign.duration_seconds,
            interval_seconds: campaign.interval_seconds,
            last_run: millis_to_utc(campaign.last_run_ms),
            status: campaign.status.as_str().to_string(),
            created_at: millis_to_utc(campaign.created_at_ms),
            updated_at: millis_to_utc(updated_at_ms),
        }
    }
}

impl From<CampaignRow> for Campaign {
    fn from(row: CampaignRow) -> Self {
        Self {
            id: row.id,
            campaign_type: CampaignType::from(row.campaign_type.as_str()),
            risk_level: RiskLevel::from(row.risk_level.as_str()),
            segments: row.segments,
            min_spending: row.min_spending,
            max_spending: if row.max_spending >= f64::MAX {
                f64::INFINITY
            } else {
                row.max_spending
            },
            title: row.title,
            message: row.message,
            rewards: row.rewards,
            discount_percent: row.discount_percent,
            duration_seconds: row.duration_seconds,
            interval_seconds: row.interval_seconds,
            last_run_ms: utc_to_millis(row.last_run),
            status: CampaignStatus::from(row.status.as_str()),
            created_at_ms: utc_to_millis(row.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CampaignDraft {
        CampaignDraft {
            campaign_type: CampaignType::Push,
            risk_level: RiskLevel::High,
            segments: Vec::new(),
            min_spending: 0.0,
            max_spending: default_max_spending(),
            title: "We miss you".to_string(),
            message: "Come back, {playerName}!".to_string(),
            rewards: Vec::new(),
            discount_percent: None,
            duration_seconds: default_duration_seconds(),
            interval_seconds: default_interval_seconds(),
        }
    }

    #[test]
    fn interval_gate_is_inclusive() {
        let mut campaign = Campaign::from_draft(draft(), 0).expect("valid draft");
        campaign.last_run_ms = 1_000_000;
        campaign.interval_seconds = 3_600;
        let interval_ms = 3_600_000;
        assert!(!campaign.is_due(1_000_000 + interval_ms - 1));
        assert!(campaign.is_due(1_000_000 + interval_ms));
    }

    #[test]
    fn never_fired_campaign_is_due() {
        let campaign = Campaign::from_draft(draft(), 0).expect("valid draft");
        assert_eq!(campaign.last_run_ms, 0);
        assert!(campaign.is_due(DEFAULT_CAMPAIGN_INTERVAL_SECONDS as i64 * 1000));
    }

    #[test]
    fn message_required_for_message_types() {
        let mut d = draft();
        d.message = String::new();
        assert_eq!(
            d.validate(),
            Err(CampaignValidationError::MissingMessage)
        );
        d.campaign_type = CampaignType::InGameOffer;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn spending_bounds_must_be_ordered() {
        let mut d = draft();
        d.min_spending = 50.0;
        d.max_spending = 10.0;
        assert_eq!(
            d.validate(),
            Err(CampaignValidationError::InvalidSpendingBounds)
        );
    }
}
