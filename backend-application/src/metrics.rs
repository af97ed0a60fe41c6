use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    activity_events: AtomicU64,
    activity_errors: AtomicU64,
    risk_evaluations: AtomicU64,
    dispatch_attempts: AtomicU64,
    dispatch_failures: AtomicU64,
    campaign_runs: AtomicU64,
    rewards_granted: AtomicU64,
    players_churned: AtomicU64,
}

impl Metrics {
    pub fn record_activity(&self, event_count: usize) {
        self.activity_events
            .fetch_add(event_count as u64, Ordering::Relaxed);
    }

    pub fn record_activity_error(&self) {
        self.activity_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_risk_evaluation(&self) {
        self.risk_evaluations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch_attempt(&self) {
        self.dispatch_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch_failure(&self) {
        self.dispatch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_campaign_run(&self) {
        self.campaign_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reward_granted(&self) {
        self.rewards_granted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_player_churned(&self) {
        self.players_churned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dispatch_failures(&self) -> u64 {
        self.dispatch_failures.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let activity = self.activity_events.load(Ordering::Relaxed);
        let activity_errors = self.activity_errors.load(Ordering::Relaxed);
        let evaluations = self.risk_evaluations.load(Ordering::Relaxed);
        let attempts = self.dispatch_attempts.load(Ordering::Relaxed);
        let failures = self.dispatch_failures.load(Ordering::Relaxed);
        let campaign_runs = self.campaign_runs.load(Ordering::Relaxed);
        let rewards = self.rewards_granted.load(Ordering::Relaxed);
        let churned = self.players_churned.load(Ordering::Relaxed);

        format!(
            "# TYPE embercall_activity_events_total counter\n\
embercall_activity_events_total {}\n\
# TYPE embercall_activity_errors_total counter\n\
embercall_activity_errors_total {}\n\
# TYPE embercall_risk_evaluations_total counter\n\
embercall_risk_evaluations_total {}\n\
# TYPE embercall_dispatch_attempts_total counter\n\
embercall_dispatch_attempts_total {}\n\
# TYPE embercall_dispatch_failures_total counter\n\
embercall_dispatch_failures_total {}\n\
# TYPE embercall_campaign_runs_total counter\n\
embercall_campaign_runs_total {}\n\
# TYPE embercall_rewards_granted_total counter\n\
embercall_rewards_granted_total {}\n\
# TYPE embercall_players_churned_total counter\n\
embercall_players_churned_total {}\n",
            activity, activity_errors, evaluations, attempts, failures, campaign_runs, rewards,
            churned
        )
    }
}
