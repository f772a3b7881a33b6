//! Analytics aggregation: scored transactions → KPIs, histograms, top-N, insights.
//!
//! - [`buckets`]: amount and score histograms
//! - [`insights`]: max-rate amount range, fraud/average amount ratio
//! - [`ranking`]: largest blocked transactions
//!
//! Everything here is a pure function of its input. Recomputing from the same
//! slice yields identical output; summation always runs in input order.

pub mod buckets;
pub mod insights;
pub mod ranking;

use crate::config::AnalyticsConfig;
use crate::risk::DatasetRiskLevel;
use crate::transactions::ScoredTransaction;
use serde::{Deserialize, Serialize};

pub use buckets::{AmountBucket, AmountBuckets, BucketStats, ScoreBucket, ScoreBuckets};
pub use insights::{fraud_amount_ratio, max_fraud_rate_bucket, MaxFraudRateBucket};
pub use ranking::top_blocked;

/// Model quality reported by the backend when the upload carried `is_fraud` labels.
/// Values are percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub total: u64,
    pub blocked_count: u64,
    pub passed_count: u64,
    /// Percent of transactions blocked.
    pub fraud_rate: f64,
    pub total_amount: f64,
    pub fraud_amount: f64,
    pub avg_amount: f64,
    pub avg_fraud_amount: f64,
    /// Mean score over blocked transactions only.
    pub avg_fraud_score: f64,
    pub fraud_amount_ratio: f64,
    pub amount_buckets: AmountBuckets,
    pub score_buckets: ScoreBuckets,
    pub top_blocked: Vec<ScoredTransaction>,
    pub max_fraud_rate_bucket: MaxFraudRateBucket,
    pub risk_level: DatasetRiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<QualityMetrics>,
}

fn mean(sum: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub struct Aggregator {
    config: AnalyticsConfig,
}

impl Aggregator {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn aggregate(
        &self,
        transactions: &[ScoredTransaction],
        metrics: Option<QualityMetrics>,
    ) -> AggregateResult {
        let mut amount_buckets = AmountBuckets::default();
        let mut score_buckets = ScoreBuckets::default();
        let mut blocked_count = 0u64;
        let mut total_amount = 0.0;
        let mut fraud_amount = 0.0;
        let mut fraud_score_sum = 0.0;

        for tx in transactions {
            total_amount += tx.amount;
            score_buckets.record(tx);
            amount_buckets.record(tx);
            if tx.is_blocked() {
                blocked_count += 1;
                fraud_amount += tx.amount;
                fraud_score_sum += tx.score;
            }
        }

        let total = transactions.len() as u64;
        let fraud_rate = mean(blocked_count as f64, total) * 100.0;
        let avg_amount = mean(total_amount, total);
        let avg_fraud_amount = mean(fraud_amount, blocked_count);

        AggregateResult {
            total,
            blocked_count,
            passed_count: total - blocked_count,
            fraud_rate,
            total_amount,
            fraud_amount,
            avg_amount,
            avg_fraud_amount,
            avg_fraud_score: mean(fraud_score_sum, blocked_count),
            fraud_amount_ratio: fraud_amount_ratio(avg_fraud_amount, avg_amount),
            max_fraud_rate_bucket: max_fraud_rate_bucket(&amount_buckets),
            amount_buckets,
            score_buckets,
            top_blocked: top_blocked(transactions, self.config.top_n),
            risk_level: DatasetRiskLevel::from_fraud_rate(fraud_rate),
            metrics,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::Verdict;

    fn tx(id: i64, amount: f64, score: f64, verdict: Verdict) -> ScoredTransaction {
        ScoredTransaction::new(id, amount, score, verdict)
    }

    fn sample() -> Vec<ScoredTransaction> {
        vec![
            tx(1, 5_000.0, 0.05, Verdict::Pass),
            tx(2, 9_999.99, 0.1999, Verdict::Pass),
            tx(3, 10_000.0, 0.2, Verdict::Pass),
            tx(4, 49_999.99, 0.55, Verdict::Pass),
            tx(5, 75_000.0, 0.91, Verdict::Block),
            tx(6, 250_000.0, 0.87, Verdict::Block),
            tx(7, 500_000.0, 1.0, Verdict::Block),
            tx(8, 20_000.0, 0.3, Verdict::Pass),
            tx(9, 1_000.0, 0.62, Verdict::Pass),
            tx(10, 60_000.0, 0.45, Verdict::Pass),
        ]
    }

    #[test]
    fn counts_and_rates() {
        let r = Aggregator::default().aggregate(&sample(), None);
        assert_eq!(r.total, 10);
        assert_eq!(r.blocked_count, 3);
        assert_eq!(r.passed_count, 7);
        assert_eq!(r.blocked_count + r.passed_count, r.total);
        assert!((r.fraud_rate - 30.0).abs() < 1e-9);
        assert!((r.fraud_amount - 825_000.0).abs() < 1e-6);
        assert!((r.avg_fraud_amount - 275_000.0).abs() < 1e-6);
        assert!((r.avg_fraud_score - (0.91 + 0.87 + 1.0) / 3.0).abs() < 1e-12);
        assert!((r.avg_amount - r.total_amount / 10.0).abs() < 1e-9);
        assert!((r.fraud_amount_ratio - r.avg_fraud_amount / r.avg_amount).abs() < 1e-12);
        assert_eq!(r.risk_level, DatasetRiskLevel::High);
    }

    #[test]
    fn every_transaction_lands_in_one_bucket_of_each_kind() {
        let r = Aggregator::default().aggregate(&sample(), None);
        assert_eq!(r.amount_buckets.total(), r.total);
        assert_eq!(r.score_buckets.total(), r.total);
        let fraud: u64 = r.amount_buckets.iter().map(|(_, s)| s.fraud_count).sum();
        assert_eq!(fraud, r.blocked_count);

        assert_eq!(r.amount_buckets.get(AmountBucket::UpTo10K).total, 3);
        assert_eq!(r.amount_buckets.get(AmountBucket::From10KTo50K).total, 3);
        assert_eq!(r.amount_buckets.get(AmountBucket::Over500K).total, 1);
        assert_eq!(r.score_buckets.count(ScoreBucket::Below20), 2);
        assert_eq!(r.score_buckets.count(ScoreBucket::From20To40), 2);
        assert_eq!(r.score_buckets.count(ScoreBucket::From80To100), 3);
    }

    #[test]
    fn max_bucket_and_top_blocked() {
        let r = Aggregator::default().aggregate(&sample(), None);
        // 100-500K and 500K+ are both 100%; the first one wins.
        assert_eq!(r.max_fraud_rate_bucket.bucket, Some(AmountBucket::From100KTo500K));
        assert_eq!(r.top_blocked.len(), 3);
        let amounts: Vec<f64> = r.top_blocked.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, [500_000.0, 250_000.0, 75_000.0]);
    }

    #[test]
    fn top_n_follows_config() {
        let agg = Aggregator::new(AnalyticsConfig { top_n: 2 });
        let r = agg.aggregate(&sample(), None);
        assert_eq!(r.top_blocked.len(), 2);
    }

    #[test]
    fn empty_input_has_no_division_by_zero() {
        let r = Aggregator::default().aggregate(&[], None);
        assert_eq!(r.total, 0);
        assert_eq!(r.fraud_rate, 0.0);
        assert_eq!(r.avg_amount, 0.0);
        assert_eq!(r.avg_fraud_amount, 0.0);
        assert_eq!(r.avg_fraud_score, 0.0);
        assert_eq!(r.fraud_amount_ratio, 0.0);
        assert_eq!(r.max_fraud_rate_bucket.rate, 0.0);
        assert_eq!(r.max_fraud_rate_bucket.range(), "");
        assert!(r.top_blocked.is_empty());
        assert_eq!(r.risk_level, DatasetRiskLevel::Low);
    }

    #[test]
    fn all_passed_has_zero_fraud_averages() {
        let txs = vec![tx(1, 100.0, 0.1, Verdict::Pass), tx(2, 300.0, 0.2, Verdict::Pass)];
        let r = Aggregator::default().aggregate(&txs, None);
        assert_eq!(r.blocked_count, 0);
        assert_eq!(r.avg_fraud_score, 0.0);
        assert_eq!(r.avg_fraud_amount, 0.0);
        assert!((r.avg_amount - 200.0).abs() < 1e-12);
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let txs = sample();
        let agg = Aggregator::default();
        let a = agg.aggregate(&txs, None);
        let b = agg.aggregate(&txs, None);
        assert_eq!(a, b);
        assert_eq!(a.fraud_rate.to_bits(), b.fraud_rate.to_bits());
        assert_eq!(a.total_amount.to_bits(), b.total_amount.to_bits());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn metrics_pass_through() {
        let m = QualityMetrics {
            accuracy: 97.1,
            precision: 88.0,
            recall: 91.5,
            f1_score: 89.7,
        };
        let r = Aggregator::default().aggregate(&sample(), Some(m.clone()));
        assert_eq!(r.metrics, Some(m));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["metrics"]["recall"], 91.5);
        assert_eq!(v["max_fraud_rate_bucket"]["range"], "100-500K");
        assert_eq!(v["risk_level"], "high");
    }
}
