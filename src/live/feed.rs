//! Live feed state machine.
//!
//! `start` arms the feed and issues the immediate fetch; `tick` issues one
//! fetch per timer tick while running; `stop` disarms. Every issued fetch gets
//! a [`BatchTicket`] stamped with the current generation. `start` and `stop`
//! both bump the generation, so a completion that belongs to an earlier run is
//! recognised and dropped: it cannot count, cannot log, and cannot restart the
//! feed.

use super::counters::{RunningCounters, TransactionLog};
use crate::error::{ConsoleError, Result};
use crate::transactions::ScoredTransaction;
use chrono::Local;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedState {
    Stopped,
    Running,
}

/// Handle for one in-flight batch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTicket {
    generation: u64,
    seq: u64,
}

impl BatchTicket {
    /// Monotonic across the whole feed lifetime, restarts included.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What [`LiveFeed::complete`] did with a result.
#[derive(Debug)]
pub enum Completion {
    /// Batch logged and counted.
    Applied { seq: u64, received: usize, blocked: usize },
    /// Result of a request issued before the last start/stop; ignored.
    Discarded { seq: u64 },
    /// Current request failed; the feed is now stopped.
    Failed(ConsoleError),
}

#[derive(Debug, Clone)]
pub struct LiveFeed {
    state: FeedState,
    generation: u64,
    next_seq: u64,
    counters: RunningCounters,
    log: TransactionLog,
    last_error: Option<String>,
    discarded: u64,
}

impl LiveFeed {
    /// `window` is the number of log entries kept for display.
    pub fn new(window: usize) -> Self {
        Self {
            state: FeedState::Stopped,
            generation: 0,
            next_seq: 0,
            counters: RunningCounters::default(),
            log: TransactionLog::new(window),
            last_error: None,
            discarded: 0,
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == FeedState::Running
    }

    fn issue(&mut self) -> BatchTicket {
        let ticket = BatchTicket {
            generation: self.generation,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        ticket
    }

    /// STOPPED → RUNNING. Returns the ticket for the immediate fetch; `None` if already running.
    /// Counters and log carry over from earlier runs.
    pub fn start(&mut self) -> Option<BatchTicket> {
        if self.is_running() {
            return None;
        }
        self.generation += 1;
        self.state = FeedState::Running;
        self.last_error = None;
        Some(self.issue())
    }

    /// Timer tick. Issues a fetch only while running.
    pub fn tick(&mut self) -> Option<BatchTicket> {
        if self.is_running() {
            Some(self.issue())
        } else {
            None
        }
    }

    /// RUNNING → STOPPED. In-flight requests keep going; their results will be discarded.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.generation += 1;
        self.state = FeedState::Stopped;
        true
    }

    pub fn complete(
        &mut self,
        ticket: BatchTicket,
        outcome: Result<Vec<ScoredTransaction>>,
    ) -> Completion {
        let stamp = Local::now().format("%H:%M:%S").to_string();
        self.complete_at(ticket, outcome, &stamp)
    }

    fn complete_at(
        &mut self,
        ticket: BatchTicket,
        outcome: Result<Vec<ScoredTransaction>>,
        stamp: &str,
    ) -> Completion {
        if ticket.generation != self.generation || !self.is_running() {
            self.discarded += 1;
            debug!(seq = ticket.seq, ok = outcome.is_ok(), "discarding stale batch result");
            return Completion::Discarded { seq: ticket.seq };
        }
        match outcome {
            Ok(mut batch) => {
                for tx in batch.iter_mut() {
                    tx.timestamp = Some(stamp.to_string());
                }
                self.counters.apply_batch(&batch);
                let received = batch.len();
                let blocked = batch.iter().filter(|t| t.is_blocked()).count();
                self.log.prepend_batch(ticket.seq, batch);
                Completion::Applied {
                    seq: ticket.seq,
                    received,
                    blocked,
                }
            }
            Err(e) => {
                warn!(seq = ticket.seq, error = %e, "live feed fetch failed; stopping");
                self.stop();
                self.last_error = Some(e.to_string());
                Completion::Failed(e)
            }
        }
    }

    pub fn counters(&self) -> &RunningCounters {
        &self.counters
    }

    pub fn log(&self) -> &TransactionLog {
        &self.log
    }

    /// Message of the failure that last stopped the feed; cleared on `start`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Stale results dropped so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Explicit session boundary: zero counters, clear log. Stop/start never calls this.
    pub fn reset(&mut self) {
        self.counters = RunningCounters::default();
        self.log.clear();
        self.last_error = None;
    }
}
