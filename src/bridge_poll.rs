use std::{env, time::Duration};

use crate::{
    BOOTSTRAP_POLL_INTERVAL_ENV, DEFAULT_BOOTSTRAP_POLL_INTERVAL_MS,
    MIN_BOOTSTRAP_POLL_INTERVAL_MS,
};

/// Read-only readiness probe for the host auth bridge. Implementations only
/// observe whether the bridge has been installed; they never construct or
/// mutate it.
pub(crate) trait BridgeReadiness {
    fn is_ready(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PollConfig {
    pub(crate) poll_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_BOOTSTRAP_POLL_INTERVAL_MS),
        }
    }
}

impl PollConfig {
    pub(crate) fn from_env() -> Self {
        let raw = env::var(BOOTSTRAP_POLL_INTERVAL_ENV).ok();
        Self {
            poll_interval: Duration::from_millis(resolve_poll_interval_ms(raw.as_deref())),
        }
    }
}

fn resolve_poll_interval_ms(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_BOOTSTRAP_POLL_INTERVAL_MS)
        .max(MIN_BOOTSTRAP_POLL_INTERVAL_MS)
}

/// Suspends until the bridge reports ready: one immediate check, then a
/// re-check every `poll_interval`. Never fails and never times out; if the
/// host never installs the bridge this future never resolves and the UI
/// stays in the loading state.
pub(crate) async fn wait_for_bridge<R>(readiness: &R, config: &PollConfig)
where
    R: BridgeReadiness,
{
    loop {
        if readiness.is_ready() {
            return;
        }
        tokio::time::sleep(config.poll_interval).await;
    }
}
