//! Display-side risk classification. Verdicts themselves come from the backend.

mod engine;

pub use engine::{threshold_percent, DatasetRiskLevel, ThresholdHint, TransactionSeverity};
