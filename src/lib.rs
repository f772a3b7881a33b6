//! Fraud console: operator-side companion to a fraud scoring backend.
//!
//! Modular structure:
//! - [`transactions`]: Scored transaction model and the shared feature schema
//! - [`analytics`]: Aggregation of scored transactions into dashboard figures
//! - [`risk`]: Display-side risk levels, severity badges, threshold hints
//! - [`live`]: Live feed counters, bounded log, state machine and runner
//! - [`session`]: Last analyzed dataset
//! - [`client`]: Backend HTTP client
//! - [`logging`]: Structured logging and JSON output lines

pub mod config;
pub mod error;
pub mod transactions;
pub mod analytics;
pub mod risk;
pub mod live;
pub mod session;
pub mod client;
pub mod logging;

pub use config::ConsoleConfig;
pub use error::{ConsoleError, Result};
pub use transactions::{ScoredTransaction, TransactionFeatures, Verdict};
pub use analytics::{AggregateResult, Aggregator};
pub use live::{run_live_feed, LiveFeed, RunningCounters};
pub use session::AnalysisSession;
pub use client::BackendClient;
pub use logging::StructuredLogger;
