//! Drives a [`LiveFeed`] from a tokio interval timer.
//!
//! Each ticket's request runs on its own task under a deadline; results come
//! back over a channel and are applied by this loop only, so the feed has a
//! single writer. The loop ends when the feed stops: on a stop signal, or on
//! the first failed or timed-out fetch. Dropping the loop drops the timer.

use super::feed::{BatchTicket, Completion, LiveFeed};
use crate::error::{ConsoleError, Result};
use crate::transactions::{ScoredTransaction, TransactionFeatures};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Produces the raw transactions sent on each tick.
pub trait BatchSource: Send {
    fn next_batch(&mut self) -> Vec<TransactionFeatures>;
}

/// Anything that can score a batch; the HTTP client in production.
pub trait ScoringBackend: Send + Sync + 'static {
    fn score(
        &self,
        batch: Vec<TransactionFeatures>,
    ) -> impl Future<Output = Result<Vec<ScoredTransaction>>> + Send;
}

/// Shortest tick period; a zero interval is raised to this.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
pub struct RunnerOptions {
    pub interval: Duration,
    pub request_timeout: Duration,
}

impl From<&crate::config::LiveConfig> for RunnerOptions {
    fn from(c: &crate::config::LiveConfig) -> Self {
        Self {
            interval: c.interval(),
            request_timeout: c.request_timeout(),
        }
    }
}

type Done = (BatchTicket, Result<Vec<ScoredTransaction>>);

fn dispatch<B: ScoringBackend>(
    backend: &Arc<B>,
    ticket: BatchTicket,
    batch: Vec<TransactionFeatures>,
    deadline: Duration,
    done: &mpsc::UnboundedSender<Done>,
) {
    let backend = Arc::clone(backend);
    let done = done.clone();
    debug!(seq = ticket.seq(), size = batch.len(), "dispatching batch");
    tokio::spawn(async move {
        let outcome = match tokio::time::timeout(deadline, backend.score(batch)).await {
            Ok(r) => r,
            Err(_) => Err(ConsoleError::Timeout(deadline)),
        };
        // receiver gone means the run ended; the result is irrelevant
        let _ = done.send((ticket, outcome));
    });
}

/// Start `feed` and run it until stopped. `on_batch` sees the feed after every
/// applied batch. Returns the error that stopped the feed, or `Ok` when stopped
/// by signal. Counters persist in `feed` for the next run.
pub async fn run_live_feed<B, S, F>(
    feed: &mut LiveFeed,
    backend: Arc<B>,
    source: &mut S,
    options: RunnerOptions,
    mut stop: watch::Receiver<bool>,
    mut on_batch: F,
) -> Result<()>
where
    B: ScoringBackend,
    S: BatchSource,
    F: FnMut(&LiveFeed),
{
    if *stop.borrow() {
        return Ok(());
    }
    let period = options.interval.max(MIN_INTERVAL);
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Done>();
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // first tick fires at once; the start fetch covers it
    ticker.tick().await;

    let Some(first) = feed.start() else {
        return Ok(());
    };
    info!(interval_ms = period.as_millis() as u64, "live feed started");
    dispatch(&backend, first, source.next_batch(), options.request_timeout, &done_tx);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(ticket) = feed.tick() {
                    let batch = source.next_batch();
                    dispatch(&backend, ticket, batch, options.request_timeout, &done_tx);
                }
            }
            Some((ticket, outcome)) = done_rx.recv() => {
                match feed.complete(ticket, outcome) {
                    Completion::Applied { seq, received, blocked } => {
                        let c = feed.counters();
                        info!(
                            seq,
                            received,
                            blocked,
                            checked = c.checked,
                            blocked_total = c.blocked,
                            saved = c.saved,
                            pass_rate = c.pass_rate(),
                            "batch scored"
                        );
                        on_batch(feed);
                    }
                    Completion::Discarded { .. } => {}
                    Completion::Failed(e) => return Err(e),
                }
            }
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    feed.stop();
                    info!(checked = feed.counters().checked, "live feed stopped");
                    return Ok(());
                }
            }
        }
    }
}
