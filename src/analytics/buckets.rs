//! Fixed histograms over transaction amount and score.

use crate::transactions::ScoredTransaction;
use serde::{Serialize, Serializer};

/// Half-open amount ranges in the currency's base unit; lower bound inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AmountBucket {
    #[serde(rename = "0-10K")]
    UpTo10K,
    #[serde(rename = "10-50K")]
    From10KTo50K,
    #[serde(rename = "50-100K")]
    From50KTo100K,
    #[serde(rename = "100-500K")]
    From100KTo500K,
    #[serde(rename = "500K+")]
    Over500K,
}

impl AmountBucket {
    /// Declaration order; insight scans depend on it.
    pub const ALL: [AmountBucket; 5] = [
        AmountBucket::UpTo10K,
        AmountBucket::From10KTo50K,
        AmountBucket::From50KTo100K,
        AmountBucket::From100KTo500K,
        AmountBucket::Over500K,
    ];

    pub fn classify(amount: f64) -> Self {
        if amount < 10_000.0 {
            AmountBucket::UpTo10K
        } else if amount < 50_000.0 {
            AmountBucket::From10KTo50K
        } else if amount < 100_000.0 {
            AmountBucket::From50KTo100K
        } else if amount < 500_000.0 {
            AmountBucket::From100KTo500K
        } else {
            AmountBucket::Over500K
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AmountBucket::UpTo10K => "0-10K",
            AmountBucket::From10KTo50K => "10-50K",
            AmountBucket::From50KTo100K => "50-100K",
            AmountBucket::From100KTo500K => "100-500K",
            AmountBucket::Over500K => "500K+",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketStats {
    pub total: u64,
    pub fraud_count: u64,
}

impl BucketStats {
    /// 0 for an empty bucket.
    pub fn fraud_rate_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.fraud_count as f64 / self.total as f64 * 100.0
        }
    }
}

/// One histogram row as handed to a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountBucketRow {
    pub range: &'static str,
    pub total: u64,
    pub fraud_count: u64,
    pub fraud_rate_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmountBuckets {
    stats: [BucketStats; 5],
}

impl AmountBuckets {
    pub fn record(&mut self, tx: &ScoredTransaction) {
        let s = &mut self.stats[AmountBucket::classify(tx.amount).index()];
        s.total += 1;
        if tx.is_blocked() {
            s.fraud_count += 1;
        }
    }

    pub fn get(&self, bucket: AmountBucket) -> &BucketStats {
        &self.stats[bucket.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (AmountBucket, &BucketStats)> {
        AmountBucket::ALL.into_iter().zip(self.stats.iter())
    }

    pub fn rows(&self) -> Vec<AmountBucketRow> {
        self.iter()
            .map(|(b, s)| AmountBucketRow {
                range: b.label(),
                total: s.total,
                fraud_count: s.fraud_count,
                fraud_rate_percent: s.fraud_rate_percent(),
            })
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.stats.iter().map(|s| s.total).sum()
    }
}

impl Serialize for AmountBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

/// 20-point ranges over `score * 100`; the top range also takes 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScoreBucket {
    #[serde(rename = "0-20%")]
    Below20,
    #[serde(rename = "20-40%")]
    From20To40,
    #[serde(rename = "40-60%")]
    From40To60,
    #[serde(rename = "60-80%")]
    From60To80,
    #[serde(rename = "80-100%")]
    From80To100,
}

impl ScoreBucket {
    pub const ALL: [ScoreBucket; 5] = [
        ScoreBucket::Below20,
        ScoreBucket::From20To40,
        ScoreBucket::From40To60,
        ScoreBucket::From60To80,
        ScoreBucket::From80To100,
    ];

    pub fn classify(score: f64) -> Self {
        let percent = score * 100.0;
        if percent < 20.0 {
            ScoreBucket::Below20
        } else if percent < 40.0 {
            ScoreBucket::From20To40
        } else if percent < 60.0 {
            ScoreBucket::From40To60
        } else if percent < 80.0 {
            ScoreBucket::From60To80
        } else {
            ScoreBucket::From80To100
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBucket::Below20 => "0-20%",
            ScoreBucket::From20To40 => "20-40%",
            ScoreBucket::From40To60 => "40-60%",
            ScoreBucket::From60To80 => "60-80%",
            ScoreBucket::From80To100 => "80-100%",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBucketRow {
    pub range: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBuckets {
    counts: [u64; 5],
}

impl ScoreBuckets {
    pub fn record(&mut self, tx: &ScoredTransaction) {
        self.counts[ScoreBucket::classify(tx.score) as usize] += 1;
    }

    pub fn count(&self, bucket: ScoreBucket) -> u64 {
        self.counts[bucket as usize]
    }

    pub fn rows(&self) -> Vec<ScoreBucketRow> {
        ScoreBucket::ALL
            .into_iter()
            .map(|b| ScoreBucketRow {
                range: b.label(),
                count: self.count(b),
            })
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Serialize for ScoreBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}
