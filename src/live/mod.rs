//! Live transaction feed: running counters, bounded log, state machine, timer-driven runner.

mod counters;
mod feed;
mod runner;

pub use counters::{LogEntry, RunningCounters, TransactionLog};
pub use feed::{BatchTicket, Completion, FeedState, LiveFeed};
pub use runner::{run_live_feed, BatchSource, RunnerOptions, ScoringBackend};
