// Cohort-level retention metrics

use serde::{Deserialize, Serialize};

use crate::entities::{Campaign, PlayerState};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetentionMetrics {
    pub total_players: u64,
    pub active_players: u64,
    pub at_risk_players: u64,
    pub churned_players: u64,
    pub retention_rate: f64,
    pub churn_rate: f64,
}

/// Per-player retention view returned by the admin API.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRetentionReport {
    pub player: PlayerState,
    pub metrics: RetentionMetrics,
    pub recommendations: Vec<String>,
    pub eligible_campaigns: Vec<Campaign>,
}
