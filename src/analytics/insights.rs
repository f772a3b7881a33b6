//! Narrative statistics derived from a finished aggregate.

use super::buckets::{AmountBucket, AmountBuckets};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Amount range with the highest block rate. Serializes as `{range, rate}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxFraudRateBucket {
    /// `None` when no bucket has a positive rate.
    pub bucket: Option<AmountBucket>,
    pub rate: f64,
}

impl MaxFraudRateBucket {
    /// Label of the winning range, empty when there is none.
    pub fn range(&self) -> &'static str {
        self.bucket.map(AmountBucket::label).unwrap_or("")
    }
}

impl Serialize for MaxFraudRateBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("MaxFraudRateBucket", 2)?;
        st.serialize_field("range", self.range())?;
        st.serialize_field("rate", &self.rate)?;
        st.end()
    }
}

/// Scan in declaration order, skip empty buckets, replace only on a strictly higher rate.
/// Ties keep the first range encountered.
pub fn max_fraud_rate_bucket(buckets: &AmountBuckets) -> MaxFraudRateBucket {
    let mut best = MaxFraudRateBucket {
        bucket: None,
        rate: 0.0,
    };
    for (bucket, stats) in buckets.iter() {
        if stats.total == 0 {
            continue;
        }
        let rate = stats.fraud_rate_percent();
        if rate > best.rate {
            best = MaxFraudRateBucket {
                bucket: Some(bucket),
                rate,
            };
        }
    }
    best
}

/// How many times larger the average blocked amount is; 0 when there is no average.
pub fn fraud_amount_ratio(avg_fraud_amount: f64, avg_amount: f64) -> f64 {
    if avg_amount == 0.0 {
        0.0
    } else {
        avg_fraud_amount / avg_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::{ScoredTransaction, Verdict};

    fn fill(buckets: &mut AmountBuckets, amount: f64, total: usize, blocked: usize) {
        for i in 0..total {
            let verdict = if i < blocked { Verdict::Block } else { Verdict::Pass };
            buckets.record(&ScoredTransaction::new(i as i64, amount, 0.5, verdict));
        }
    }

    #[test]
    fn picks_highest_rate_and_skips_empty() {
        let mut b = AmountBuckets::default();
        fill(&mut b, 1_000.0, 10, 2);
        fill(&mut b, 60_000.0, 10, 5);
        let max = max_fraud_rate_bucket(&b);
        assert_eq!(max.bucket, Some(AmountBucket::From50KTo100K));
        assert_eq!(max.range(), "50-100K");
        assert!((max.rate - 50.0).abs() < 1e-12);
    }

    #[test]
    fn ties_keep_first_range() {
        let mut b = AmountBuckets::default();
        fill(&mut b, 20_000.0, 4, 2);
        fill(&mut b, 700_000.0, 2, 1);
        assert_eq!(max_fraud_rate_bucket(&b).bucket, Some(AmountBucket::From10KTo50K));
    }

    #[test]
    fn no_fraud_leaves_initial_maximum() {
        let mut b = AmountBuckets::default();
        fill(&mut b, 20_000.0, 4, 0);
        let max = max_fraud_rate_bucket(&b);
        assert_eq!(max.range(), "");
        assert_eq!(max.rate, 0.0);
        assert_eq!(max_fraud_rate_bucket(&AmountBuckets::default()).bucket, None);
    }

    #[test]
    fn serializes_range_label() {
        let empty = max_fraud_rate_bucket(&AmountBuckets::default());
        assert_eq!(
            serde_json::to_value(empty).unwrap(),
            serde_json::json!({"range": "", "rate": 0.0})
        );

        let mut b = AmountBuckets::default();
        fill(&mut b, 200_000.0, 4, 1);
        let v = serde_json::to_value(max_fraud_rate_bucket(&b)).unwrap();
        assert_eq!(v["range"], "100-500K");
        assert_eq!(v["rate"], 25.0);
        assert!(v.get("bucket").is_none());
    }

    #[test]
    fn ratio_guards_zero() {
        assert_eq!(fraud_amount_ratio(500.0, 0.0), 0.0);
        assert!((fraud_amount_ratio(300.0, 100.0) - 3.0).abs() < 1e-12);
    }
}
