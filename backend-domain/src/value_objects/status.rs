// Player and campaign lifecycle statuses

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Active,
    Churned,
}

impl PlayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::Active => "active",
            PlayerStatus::Churned => "churned",
        }
    }
}

impl From<&str> for PlayerStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "churned" => PlayerStatus::Churned,
            _ => PlayerStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Inactive,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Inactive => "inactive",
        }
    }
}

impl From<&str> for CampaignStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "inactive" => CampaignStatus::Inactive,
            _ => CampaignStatus::Active,
        }
    }
}
