use tracing::info;

use backend_domain::utils::current_millis;
use backend_domain::{Campaign, CampaignDraft, CampaignStatus};

use crate::{AppError, AppState};

pub async fn create_campaign(state: &AppState, draft: CampaignDraft) -> Result<Campaign, AppError> {
    let campaign = Campaign::from_draft(draft, current_millis())
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    state
        .campaign_repo
        .insert_campaign(&campaign)
        .await
        .map_err(AppError::Internal)?;
    info!(
        "campaign {} created ({} / {})",
        campaign.id,
        campaign.campaign_type.as_str(),
        campaign.risk_level.as_str()
    );
    Ok(campaign)
}

pub async fn deactivate_campaign(state: &AppState, id: &str) -> Result<(), AppError> {
    let mut campaign = state
        .campaign_repo
        .fetch_campaign(id)
        .await
        .map_err(AppError::Internal)?
        .ok_or(AppError::NotFound)?;
    campaign.status = CampaignStatus::Inactive;
    state
        .campaign_repo
        .update_campaign(&campaign)
        .await
        .map_err(AppError::Internal)?;
    info!("campaign {} deactivated", id);
    Ok(())
}

pub async fn list_campaigns(state: &AppState) -> Result<Vec<Campaign>, AppError> {
    state
        .campaign_repo
        .fetch_all()
        .await
        .map_err(AppError::Internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{draft, TestHarness};
    use backend_domain::{CampaignType, RiskLevel, DEFAULT_CAMPAIGN_INTERVAL_SECONDS};

    #[tokio::test]
    async fn create_applies_documented_defaults() {
        let harness = TestHarness::new();
        let campaign = create_campaign(&harness.state, draft(CampaignType::Push, RiskLevel::High))
            .await
            .expect("create");
        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(campaign.interval_seconds, DEFAULT_CAMPAIGN_INTERVAL_SECONDS);
        assert_eq!(campaign.last_run_ms, 0);
        assert!(campaign.segments.is_empty());
        assert_eq!(campaign.min_spending, 0.0);
        assert!(campaign.max_spending.is_infinite());
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_at_the_boundary() {
        let harness = TestHarness::new();
        let mut bad = draft(CampaignType::Sms, RiskLevel::Medium);
        bad.message = String::new();
        let result = create_campaign(&harness.state, bad).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(harness.store.campaigns().is_empty());
    }

    #[tokio::test]
    async fn deactivate_unknown_campaign_is_not_found() {
        let harness = TestHarness::new();
        let result = deactivate_campaign(&harness.state, "nope").await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn deactivated_campaigns_stay_in_the_catalog() {
        let harness = TestHarness::new();
        let campaign = create_campaign(&harness.state, draft(CampaignType::Push, RiskLevel::High))
            .await
            .expect("create");
        deactivate_campaign(&harness.state, &campaign.id)
            .await
            .expect("deactivate");
        let listed = list_campaigns(&harness.state).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, CampaignStatus::Inactive);
    }
}
