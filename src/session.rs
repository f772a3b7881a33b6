//! Last analyzed dataset.
//!
//! One owner writes (the upload flow); everything else reads through `&self`.

use crate::analytics::{AggregateResult, Aggregator};
use crate::client::{CsvPrediction, UploadStats};
use crate::config::AnalyticsConfig;
use crate::transactions::ScoredTransaction;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub filename: String,
    pub analyzed_at: DateTime<Utc>,
    pub predictions: Vec<ScoredTransaction>,
    pub stats: UploadStats,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    current: Option<AnalysisRecord>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current dataset with a fresh upload result.
    pub fn save(
        &mut self,
        filename: impl Into<String>,
        prediction: CsvPrediction,
    ) -> &AnalysisRecord {
        let record = AnalysisRecord {
            id: Uuid::new_v4(),
            filename: filename.into(),
            analyzed_at: Utc::now(),
            predictions: prediction.predictions,
            stats: prediction.stats,
        };
        info!(
            id = %record.id,
            filename = %record.filename,
            transactions = record.predictions.len(),
            "analysis saved"
        );
        self.current.insert(record)
    }

    pub fn current(&self) -> Option<&AnalysisRecord> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        if let Some(r) = self.current.take() {
            info!(id = %r.id, "analysis cleared");
        }
    }

    /// Dashboard figures for the current dataset, `None` when nothing is loaded.
    pub fn analytics(&self, top_n: usize) -> Option<AggregateResult> {
        let record = self.current.as_ref()?;
        let aggregator = Aggregator::new(AnalyticsConfig { top_n });
        Some(aggregator.aggregate(&record.predictions, record.stats.metrics.clone()))
    }
}
