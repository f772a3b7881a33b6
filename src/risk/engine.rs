//! Risk classification for display: dataset level, per-transaction severity, threshold hints.

use serde::{Deserialize, Serialize};

/// Dataset risk from its block rate (percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetRiskLevel {
    Low,
    Medium,
    High,
}

impl DatasetRiskLevel {
    /// `> 10` high, `> 5` medium, anything else low.
    pub fn from_fraud_rate(fraud_rate: f64) -> Self {
        if fraud_rate > 10.0 {
            DatasetRiskLevel::High
        } else if fraud_rate > 5.0 {
            DatasetRiskLevel::Medium
        } else {
            DatasetRiskLevel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetRiskLevel::Low => "low",
            DatasetRiskLevel::Medium => "medium",
            DatasetRiskLevel::High => "high",
        }
    }
}

/// Badge on a blocked transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSeverity {
    High,
    Critical,
}

impl TransactionSeverity {
    pub const CRITICAL_SCORE: f64 = 0.9;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::CRITICAL_SCORE {
            TransactionSeverity::Critical
        } else {
            TransactionSeverity::High
        }
    }
}

/// Operator guidance for a blocking threshold given in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdHint {
    /// Only blatant fraud is blocked; few false positives, subtle attacks slip through.
    Conservative,
    /// Most fraud caught; roughly 2-3% of honest traffic goes to manual review.
    Balanced,
    /// Nearly all fraud caught; up to 10% of customers may hit false blocks.
    Aggressive,
}

impl ThresholdHint {
    pub fn for_threshold(percent: u8) -> Self {
        if percent >= 90 {
            ThresholdHint::Conservative
        } else if percent >= 70 {
            ThresholdHint::Balanced
        } else {
            ThresholdHint::Aggressive
        }
    }

    pub fn message(self, percent: u8) -> String {
        match self {
            ThresholdHint::Conservative => format!(
                "At {}% only blatant fraud is blocked: minimal false positives, \
                 but subtle attacks may pass.",
                percent
            ),
            ThresholdHint::Balanced => format!(
                "At {}% the balance is optimal: most fraud is caught, \
                 about 2-3% of honest transactions go to manual review.",
                percent
            ),
            ThresholdHint::Aggressive => format!(
                "At {}% blocking is aggressive: almost all fraud is caught, \
                 but up to 10% of customers may be falsely blocked.",
                percent
            ),
        }
    }
}

/// Threshold as whole percent, the unit the settings view works in.
pub fn threshold_percent(threshold: f64) -> u8 {
    (threshold.clamp(0.0, 1.0) * 100.0).round() as u8
}
