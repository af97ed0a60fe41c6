//! Campaign targeting: first active campaign of the tier whose predicates
//! the player satisfies, falling back to the first of the tier.

use crate::entities::{Campaign, PlayerState};
use crate::value_objects::{CampaignStatus, RiskLevel};

/// Segment and spending predicates shared by the selector and the hourly
/// campaign sweep. An empty segment list matches every player.
pub fn matches_targeting(campaign: &Campaign, player: &PlayerState) -> bool {
    let segment_ok = campaign.segments.is_empty()
        || campaign.segments.iter().any(|s| s == &player.segment);
    segment_ok
        && player.total_spent >= campaign.min_spending
        && player.total_spent <= campaign.max_spending
}

/// `campaigns` must be in stable catalog (insertion) order; ties break on
/// that order.
pub fn select_campaign<'a>(
    campaigns: &'a [Campaign],
    risk_level: RiskLevel,
    player: &PlayerState,
) -> Option<&'a Campaign> {
    let tier: Vec<&Campaign> = campaigns
        .iter()
        .filter(|c| c.status == CampaignStatus::Active && c.risk_level == risk_level)
        .collect();
    if tier.is_empty() {
        return None;
    }
    tier.iter()
        .find(|c| matches_targeting(c, player))
        .copied()
        .or_else(|| tier.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::CampaignType;

    fn campaign(id: &str, risk_level: RiskLevel) -> Campaign {
        Campaign {
            id: id.to_string(),
            campaign_type: CampaignType::Push,
            risk_level,
            segments: Vec::new(),
            min_spending: 0.0,
            max_spending: f64::INFINITY,
            title: String::new(),
            message: "hi".to_string(),
            rewards: Vec::new(),
            discount_percent: None,
            duration_seconds: 86_400,
            interval_seconds: 86_400,
            last_run_ms: 0,
            status: CampaignStatus::Active,
            created_at_ms: 0,
        }
    }

    fn player(segment: &str, spent: f64) -> PlayerState {
        let mut p = PlayerState::new("p1", 0);
        p.segment = segment.to_string();
        p.total_spent = spent;
        p
    }

    #[test]
    fn empty_tier_selects_nothing() {
        let campaigns = vec![campaign("c1", RiskLevel::Low)];
        assert!(select_campaign(&campaigns, RiskLevel::High, &player("general", 0.0)).is_none());
    }

    #[test]
    fn inactive_campaigns_are_invisible() {
        let mut c = campaign("c1", RiskLevel::High);
        c.status = CampaignStatus::Inactive;
        assert!(select_campaign(&[c], RiskLevel::High, &player("general", 0.0)).is_none());
    }

    #[test]
    fn first_matching_predicate_wins_in_catalog_order() {
        let mut whales = campaign("whales", RiskLevel::High);
        whales.min_spending = 500.0;
        let mut casuals = campaign("casuals", RiskLevel::High);
        casuals.segments = vec!["casual".to_string()];
        let campaigns = vec![whales, casuals];

        let selected = select_campaign(&campaigns, RiskLevel::High, &player("casual", 10.0));
        assert_eq!(selected.map(|c| c.id.as_str()), Some("casuals"));
    }

    #[test]
    fn falls_back_to_first_of_tier_when_no_predicate_matches() {
        let mut whales = campaign("whales", RiskLevel::High);
        whales.min_spending = 500.0;
        let mut vip = campaign("vip", RiskLevel::High);
        vip.segments = vec!["vip".to_string()];
        let campaigns = vec![whales, vip];

        let selected = select_campaign(&campaigns, RiskLevel::High, &player("casual", 10.0));
        assert_eq!(selected.map(|c| c.id.as_str()), Some("whales"));
    }

    #[test]
    fn default_predicates_match_every_player() {
        let campaigns = vec![campaign("catch-all", RiskLevel::Medium)];
        for p in [player("casual", 0.0), player("vip", 9_999.0)] {
            let selected = select_campaign(&campaigns, RiskLevel::Medium, &p);
            assert_eq!(selected.map(|c| c.id.as_str()), Some("catch-all"));
        }
    }

    #[test]
    fn spending_bounds_are_inclusive() {
        let mut c = campaign("mid", RiskLevel::Medium);
        c.min_spending = 10.0;
        c.max_spending = 20.0;
        assert!(matches_targeting(&c, &player("general", 10.0)));
        assert!(matches_targeting(&c, &player("general", 20.0)));
        assert!(!matches_targeting(&c, &player("general", 9.99)));
        assert!(!matches_targeting(&c, &player("general", 20.01)));
    }
}
