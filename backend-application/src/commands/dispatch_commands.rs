use std::time::Duration;

use anyhow::{anyhow, Context};
use serde_json::json;
use tokio::time::timeout;
use tracing::{info, warn};

use backend_domain::services::{matches_targeting, render_message, score_events, select_campaign};
use backend_domain::utils::{current_millis, DAY_MS};
use backend_domain::{
    Campaign, CampaignStatus, CampaignType, PlayerState, PlayerStatus, RetentionAction,
    RewardGrant, RewardKind, RiskLevel,
};

use crate::{AppError, AppState};

/// Neutral score used when the activity store cannot be read; the scan
/// keeps moving instead of stalling on one bad record.
const FAIL_OPEN_SCORE: f64 = 0.5;

/// Recompute a player's risk, persist it, and fire at most one retention
/// action when the player lands in the medium or high tier.
pub async fn evaluate_player(state: &AppState, player: &mut PlayerState) -> Result<(), AppError> {
    let now = current_millis();
    let score = match state
        .activity_repo
        .recent_events(&player.user_id, state.config.score_event_limit)
        .await
    {
        Ok(events) => score_events(&events, now),
        Err(err) => {
            warn!(
                "activity read failed for player {}, scoring neutral: {}",
                player.user_id, err
            );
            FAIL_OPEN_SCORE
        }
    };
    player.set_risk(score, now);
    state.metrics.record_risk_evaluation();
    state
        .player_repo
        .upsert_state(player)
        .await
        .map_err(AppError::Internal)?;

    if matches!(player.risk_level, RiskLevel::Medium | RiskLevel::High) {
        let campaigns = state
            .campaign_repo
            .fetch_all()
            .await
            .map_err(AppError::Internal)?;
        if let Some(campaign) = select_campaign(&campaigns, player.risk_level, player) {
            execute_action(state, player, campaign).await?;
        }
    }
    Ok(())
}

/// Dispatch one campaign action to one player. Channel sends are bounded by
/// the dispatch timeout; reward grants tolerate a partial store/cache write.
/// A successful dispatch appends an immutable audit record.
pub async fn execute_action(
    state: &AppState,
    player: &PlayerState,
    campaign: &Campaign,
) -> Result<(), AppError> {
    state.metrics.record_dispatch_attempt();
    let now = current_millis();
    let send_timeout = Duration::from_secs(state.config.dispatch_timeout_seconds);
    let data = json!({
        "campaignId": campaign.id,
        "campaignType": campaign.campaign_type.as_str(),
        "riskLevel": player.risk_level.as_str(),
    });

    let outcome = match campaign.campaign_type {
        CampaignType::Push => {
            let message = render_message(&campaign.message, player, now);
            bounded(
                send_timeout,
                state.push_channel.send(&player.user_id, &message, &data),
            )
            .await
        }
        CampaignType::Email => match player.email.as_deref() {
            Some(email) => {
                let body = render_message(&campaign.message, player, now);
                let subject = if campaign.title.trim().is_empty() {
                    "A message from your game"
                } else {
                    campaign.title.as_str()
                };
                bounded(
                    send_timeout,
                    state.email_channel.send(email, subject, &body, &data),
                )
                .await
            }
            None => Err(anyhow!("player {} has no email address", player.user_id)),
        },
        CampaignType::Sms => match player.phone.as_deref() {
            Some(phone) => {
                let message = render_message(&campaign.message, player, now);
                bounded(send_timeout, state.sms_channel.send(phone, &message)).await
            }
            None => Err(anyhow!("player {} has no phone number", player.user_id)),
        },
        CampaignType::InGameOffer => {
            grant_reward(state, RewardKind::Offer, player, campaign, now).await
        }
        CampaignType::ComebackBonus => {
            grant_reward(state, RewardKind::ComebackBonus, player, campaign, now).await
        }
    };

    match outcome {
        Ok(()) => {
            let action =
                RetentionAction::sent(&player.user_id, &campaign.id, player.risk_level, now);
            if let Err(err) = state.action_repo.append_action(&action).await {
                warn!(
                    "audit append failed for player {} campaign {}: {}",
                    player.user_id, campaign.id, err
                );
            }
            info!(
                "dispatched {} to player {} via campaign {}",
                campaign.campaign_type.as_str(),
                player.user_id,
                campaign.id
            );
            Ok(())
        }
        Err(err) => {
            state.metrics.record_dispatch_failure();
            Err(AppError::Internal(err.context(format!(
                "dispatch failed for player {} campaign {}",
                player.user_id, campaign.id
            ))))
        }
    }
}

async fn bounded(
    limit: Duration,
    send: impl std::future::Future<Output = anyhow::Result<()>>,
) -> anyhow::Result<()> {
    match timeout(limit, send).await {
        Ok(result) => result,
        Err(_) => Err(anyhow!("channel send timed out after {:?}", limit)),
    }
}

/// Durable write first, then the cache mirror. The two writes are sequential
/// and non-transactional; losing one side is tolerated, losing both fails
/// the dispatch.
async fn grant_reward(
    state: &AppState,
    kind: RewardKind,
    player: &PlayerState,
    campaign: &Campaign,
    now_ms: i64,
) -> anyhow::Result<()> {
    let grant = RewardGrant::from_campaign(kind, &player.user_id, campaign, now_ms);

    let stored = match state.reward_repo.insert_grant(&grant).await {
        Ok(()) => true,
        Err(err) => {
            warn!(
                "durable reward write failed for player {} campaign {}: {}",
                player.user_id, campaign.id, err
            );
            false
        }
    };

    let payload = serde_json::to_value(&grant).context("serialize reward grant")?;
    let cached = match state
        .cache
        .set_with_ttl(&grant.cache_key(), payload, campaign.duration_seconds)
        .await
    {
        Ok(()) => true,
        Err(err) => {
            warn!(
                "cache reward write failed for player {} campaign {}: {}",
                player.user_id, campaign.id, err
            );
            false
        }
    };

    if stored || cached {
        state.metrics.record_reward_granted();
        Ok(())
    } else {
        Err(anyhow!("reward grant failed on both stores"))
    }
}

/// At-risk scan body: re-score every player idle beyond the at-risk window,
/// applying the churn policy first. Individual failures never stop the scan.
pub async fn run_at_risk_scan(state: &AppState) {
    let now = current_millis();
    let at_risk_cutoff = now - state.config.at_risk_after_hours as i64 * 3_600_000;
    let churn_cutoff = now - state.config.churn_after_days as i64 * DAY_MS;

    let players = match state.player_repo.fetch_inactive_since(at_risk_cutoff).await {
        Ok(players) => players,
        Err(err) => {
            warn!("at-risk scan skipped, player store unreachable: {}", err);
            return;
        }
    };

    for mut player in players {
        if player.status == PlayerStatus::Churned {
            continue;
        }
        if player.last_activity_ms < churn_cutoff {
            player.mark_churned(now);
            match state.player_repo.upsert_state(&player).await {
                Ok(()) => {
                    state.metrics.record_player_churned();
                    info!("player {} marked churned after prolonged inactivity", player.user_id);
                }
                Err(err) => warn!("churn update failed for player {}: {}", player.user_id, err),
            }
            continue;
        }
        if let Err(err) = evaluate_player(state, &mut player).await {
            warn!("risk evaluation failed for player {}: {}", player.user_id, err);
        }
    }
}

/// Campaign sweep body: fire every due active campaign at all players
/// passing its segment/spend filters, then advance `last_run`. This is the
/// only place `last_run` moves.
pub async fn run_campaign_sweep(state: &AppState) {
    let now = current_millis();
    let campaigns = match state.campaign_repo.fetch_by_status(CampaignStatus::Active).await {
        Ok(campaigns) => campaigns,
        Err(err) => {
            warn!("campaign sweep skipped, catalog unreachable: {}", err);
            return;
        }
    };
    let due: Vec<Campaign> = campaigns.into_iter().filter(|c| c.is_due(now)).collect();
    if due.is_empty() {
        return;
    }

    let players = match state.player_repo.fetch_all().await {
        Ok(players) => players,
        Err(err) => {
            warn!("campaign sweep skipped, player store unreachable: {}", err);
            return;
        }
    };

    for mut campaign in due {
        for player in players
            .iter()
            .filter(|p| p.status != PlayerStatus::Churned && matches_targeting(&campaign, p))
        {
            if let Err(err) = execute_action(state, player, &campaign).await {
                warn!("{}", err);
            }
        }
        campaign.last_run_ms = now;
        if let Err(err) = state.campaign_repo.update_campaign(&campaign).await {
            warn!("last_run update failed for campaign {}: {}", campaign.id, err);
        }
        state.metrics.record_campaign_run();
    }
}
