//! Retraining progress polling.

use super::types::RetrainStatus;
use super::BackendClient;
use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Phases shown while the backend retrains.
pub const RETRAIN_STEPS: [&str; 7] = [
    "Loading new data",
    "Validating dataset",
    "Preparing features",
    "Fine-tuning model",
    "Cross-validation",
    "Saving weights",
    "Updating service",
];

/// Failed status fetches in a row before polling gives up.
const MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Index into [`RETRAIN_STEPS`] for a progress percentage.
pub fn retrain_step(progress: u8) -> usize {
    let idx = (f64::from(progress) / 100.0 * RETRAIN_STEPS.len() as f64).floor() as usize;
    idx.min(RETRAIN_STEPS.len() - 1)
}

/// Poll `/retrain/status` every `interval` until `completed` or `idle`.
/// Single fetch failures are logged and polling continues.
pub async fn poll_retrain<F>(
    client: &BackendClient,
    interval: Duration,
    on_progress: F,
) -> Result<RetrainStatus>
where
    F: FnMut(&RetrainStatus, usize),
{
    poll_until_finished(interval, move || client.retrain_status(), on_progress).await
}

async fn poll_until_finished<Fetch, Fut, F>(
    interval: Duration,
    mut fetch: Fetch,
    mut on_progress: F,
) -> Result<RetrainStatus>
where
    Fetch: FnMut() -> Fut,
    Fut: Future<Output = Result<RetrainStatus>>,
    F: FnMut(&RetrainStatus, usize),
{
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // status is only meaningful a beat after the start request
    ticker.tick().await;
    let mut failures = 0;
    loop {
        ticker.tick().await;
        match fetch().await {
            Ok(status) => {
                failures = 0;
                let step = retrain_step(status.progress);
                info!(
                    status = ?status.status,
                    progress = status.progress,
                    step = RETRAIN_STEPS[step],
                    "retrain progress"
                );
                on_progress(&status, step);
                if status.is_finished() {
                    return Ok(status);
                }
            }
            Err(e) => {
                failures += 1;
                warn!(error = %e, failures, "retrain status fetch failed");
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RetrainState;
    use crate::error::ConsoleError;
    use std::cell::Cell;

    #[test]
    fn step_mapping() {
        assert_eq!(retrain_step(0), 0);
        assert_eq!(retrain_step(14), 0);
        assert_eq!(retrain_step(15), 1);
        assert_eq!(retrain_step(50), 3);
        assert_eq!(retrain_step(99), 6);
        assert_eq!(retrain_step(100), 6);
    }

    fn status(state: RetrainState, progress: u8) -> RetrainStatus {
        RetrainStatus {
            status: state,
            progress,
            message: String::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_completed_through_transient_errors() {
        let script = [
            Ok(status(RetrainState::Running, 10)),
            Err(ConsoleError::Network("reset".into())),
            Ok(status(RetrainState::Running, 60)),
            Ok(status(RetrainState::Completed, 100)),
            Ok(status(RetrainState::Running, 0)),
        ];
        let calls = Cell::new(0);
        let mut steps = Vec::new();
        let out = poll_until_finished(
            Duration::from_secs(1),
            || {
                let i = calls.get();
                calls.set(i + 1);
                let next = match &script[i] {
                    Ok(s) => Ok(s.clone()),
                    Err(_) => Err(ConsoleError::Network("reset".into())),
                };
                async move { next }
            },
            |_, step| steps.push(step),
        )
        .await
        .unwrap();
        assert_eq!(out.status, RetrainState::Completed);
        assert_eq!(calls.get(), 4);
        assert_eq!(steps, [0, 4, 6]);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_still_polls() {
        let out = poll_until_finished(
            Duration::ZERO,
            || async { Ok(status(RetrainState::Completed, 100)) },
            |_, _| {},
        )
        .await
        .unwrap();
        assert_eq!(out.status, RetrainState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_repeated_failures() {
        let calls = Cell::new(0u32);
        let r = poll_until_finished(
            Duration::from_secs(1),
            || {
                calls.set(calls.get() + 1);
                async { Err(ConsoleError::Api { status: 503, detail: "down".into() }) }
            },
            |_, _| {},
        )
        .await;
        assert!(matches!(r, Err(ConsoleError::Api { status: 503, .. })));
        assert_eq!(calls.get(), MAX_CONSECUTIVE_FAILURES);
    }
}
