//! Wire types for the scoring backend. Response fields default independently so a
//! partial body still renders.

use crate::analytics::QualityMetrics;
use crate::transactions::{null_as_default, ScoredTransaction, TransactionId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub threshold: f64,
}

/// Aggregate stats the backend computed for an upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadStats {
    pub total_transactions: u64,
    pub blocked_count: u64,
    pub passed_count: u64,
    pub block_rate: f64,
    pub money_saved: f64,
    /// Present only when the CSV carried `is_fraud`.
    pub metrics: Option<QualityMetrics>,
}

/// Response of `POST /predict/csv`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvPrediction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub predictions: Vec<ScoredTransaction>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stats: UploadStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrainState {
    #[default]
    Idle,
    Running,
    Completed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrainStatus {
    pub status: RetrainState,
    /// 0..=100
    pub progress: u8,
    pub message: String,
}

impl RetrainStatus {
    /// Polling ends once the backend reports `completed` or falls back to `idle`.
    pub fn is_finished(&self) -> bool {
        matches!(self.status, RetrainState::Completed | RetrainState::Idle)
    }
}

/// Backend service counters (`GET /stats`, and the `kpi` block of `/dashboard`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceStats {
    pub transactions_checked: u64,
    pub fraud_blocked_count: u64,
    pub money_saved_total: f64,
    pub false_positive_estimate: u64,
    pub block_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeriesPoint {
    pub time: String,
    pub checked: u64,
    pub blocked: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountDistributionRow {
    pub range: String,
    pub count: u64,
    pub fraud: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Incident {
    pub transaction_id: Option<TransactionId>,
    pub amount: f64,
    pub score: f64,
    pub timestamp: Option<String>,
}

/// Response of `GET /dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub kpi: ServiceStats,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_series: Vec<TimeSeriesPoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount_distribution: Vec<AmountDistributionRow>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_incidents: Vec<Incident>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_fields_default_independently() {
        let snap: DashboardSnapshot = serde_json::from_str(
            r#"{"kpi": {"transactions_checked": 12}, "time_series": null,
                "top_incidents": [{"transaction_id": 5, "amount": 900000}]}"#,
        )
        .unwrap();
        assert_eq!(snap.kpi.transactions_checked, 12);
        assert_eq!(snap.kpi.money_saved_total, 0.0);
        assert!(snap.time_series.is_empty());
        assert!(snap.amount_distribution.is_empty());
        assert_eq!(snap.top_incidents[0].transaction_id, Some(TransactionId::Int(5)));
        assert_eq!(snap.top_incidents[0].score, 0.0);

        let empty: DashboardSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DashboardSnapshot::default());
    }

    #[test]
    fn csv_prediction_with_metrics() {
        let body = r#"{
            "predictions": [
                {"transaction_id": 1, "amount": 700000, "score": 0.97, "verdict": "BLOCK"}
            ],
            "stats": {"total_transactions": 1, "blocked_count": 1, "passed_count": 0,
                      "block_rate": 100.0, "money_saved": 700000,
                      "metrics": {"accuracy": 99.1, "precision": 97.0,
                                  "recall": 95.2, "f1_score": 96.1}}
        }"#;
        let p: CsvPrediction = serde_json::from_str(body).unwrap();
        assert_eq!(p.predictions.len(), 1);
        assert_eq!(p.stats.blocked_count, 1);
        assert_eq!(p.stats.metrics.as_ref().map(|m| m.recall), Some(95.2));
    }

    #[test]
    fn csv_prediction_tolerates_rows_without_id_or_amount() {
        let body = r#"{
            "predictions": [
                {"transaction_id": 1, "amount": 700000, "score": 0.97, "verdict": "BLOCK"},
                {"amount": 5.0, "score": 0.1, "verdict": "PASS"},
                {"transaction_id": null, "amount": 12000, "score": 0.2, "verdict": "PASS"},
                {"transaction_id": 4, "amount": null, "score": 0.91, "verdict": "BLOCK"}
            ],
            "stats": {"total_transactions": 4, "blocked_count": 2}
        }"#;
        let p: CsvPrediction = serde_json::from_str(body).unwrap();
        assert_eq!(p.predictions.len(), 4);
        assert_eq!(p.predictions[1].transaction_id, None);
        assert_eq!(p.predictions[2].transaction_id, None);
        assert_eq!(p.predictions[3].amount, 0.0);
        assert_eq!(p.predictions[3].transaction_id, Some(TransactionId::Int(4)));
    }

    #[test]
    fn retrain_status_parsing() {
        let s: RetrainStatus = serde_json::from_str(
            r#"{"status": "running", "progress": 42, "message": "Training"}"#,
        )
        .unwrap();
        assert_eq!(s.status, RetrainState::Running);
        assert!(!s.is_finished());

        let s: RetrainStatus = serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
        assert!(s.is_finished());
        assert_eq!(s.progress, 0);

        let s: RetrainStatus = serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
        assert_eq!(s.status, RetrainState::Unknown);
        assert!(!s.is_finished());
    }
}
