//! Scheduled sweeps: three independently-cadenced periodic tasks sharing a
//! watch-based shutdown signal. Each loop sleeps its full period before the
//! first pass, runs its sweep body, and exits promptly once shutdown flips,
//! letting an in-flight pass drain first.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use backend_application::commands::{
    activity_commands, dispatch_commands,
};
use backend_application::AppState;

pub fn spawn_sweeps(state: AppState, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
    let at_risk_period = Duration::from_secs(state.config.at_risk_scan_minutes * 60);
    let campaign_period = Duration::from_secs(state.config.campaign_sweep_minutes * 60);
    let refresh_period = Duration::from_secs(state.config.state_refresh_minutes * 60);

    vec![
        tokio::spawn(at_risk_scan_loop(
            state.clone(),
            shutdown.clone(),
            at_risk_period,
        )),
        tokio::spawn(campaign_sweep_loop(
            state.clone(),
            shutdown.clone(),
            campaign_period,
        )),
        tokio::spawn(state_refresh_loop(state, shutdown, refresh_period)),
    ]
}

async fn at_risk_scan_loop(state: AppState, mut shutdown: watch::Receiver<bool>, period: Duration) {
    info!("at-risk scan scheduled every {:?}", period);
    loop {
        tokio::select! {
            _ = tokio::time::sleep(period) => {
                debug!("at-risk scan pass starting");
                dispatch_commands::run_at_risk_scan(&state).await;
            }
            _ = shutdown.changed() => {
                info!("at-risk scan stopping");
                break;
            }
        }
    }
}

async fn campaign_sweep_loop(
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
    period: Duration,
) {
    info!("campaign sweep scheduled every {:?}", period);
    loop {
        tokio::select! {
            _ = tokio::time::sleep(period) => {
                debug!("campaign sweep pass starting");
                dispatch_commands::run_campaign_sweep(&state).await;
            }
            _ = shutdown.changed() => {
                info!("campaign sweep stopping");
                break;
            }
        }
    }
}

async fn state_refresh_loop(
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
    period: Duration,
) {
    info!("state refresh scheduled every {:?}", period);
    loop {
        tokio::select! {
            _ = tokio::time::sleep(period) => {
                debug!("state refresh pass starting");
                activity_commands::refresh_player_states(&state).await;
            }
            _ = shutdown.changed() => {
                info!("state refresh stopping");
                break;
            }
        }
    }
}
