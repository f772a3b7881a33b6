//! Scored transaction records as returned by the scoring backend.
//! Shared schema of the feature columns the backend expects.

pub mod schema;
mod simulate;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub use schema::{TransactionFeatures, OPTIONAL_COLUMNS, REQUIRED_FEATURE_COLUMNS};
pub use simulate::{MockTrafficSource, FIRST_MOCK_ID};

/// `null` and absent both become `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Scores above this carry a SHAP explanation from the backend.
pub const EXPLANATION_THRESHOLD: f64 = 0.40;

/// Opaque transaction identifier; the backend emits integers, CSV uploads may carry strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    Int(i64),
    Text(String),
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionId::Int(n) => write!(f, "{}", n),
            TransactionId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TransactionId {
    fn from(n: i64) -> Self {
        TransactionId::Int(n)
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        TransactionId::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Block,
    Pass,
}

impl Verdict {
    pub fn is_block(self) -> bool {
        self == Verdict::Block
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Block => "BLOCK",
            Verdict::Pass => "PASS",
        }
    }
}

/// Feature value as shown next to its SHAP contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{}", n),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

/// Signed attribution of one feature to a transaction's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature_name: String,
    pub feature_value: FeatureValue,
    pub shap_value: f64,
}

impl FeatureContribution {
    /// Positive contributions push the score toward BLOCK.
    pub fn raises_risk(&self) -> bool {
        self.shap_value > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTransaction {
    /// Absent when the uploaded CSV had no `transaction_id` column.
    #[serde(default)]
    pub transaction_id: Option<TransactionId>,
    /// Missing or `null` counts as 0.
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    pub score: f64,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Vec<FeatureContribution>>,
    /// Arrival time (`HH:MM:SS`), attached by the live feed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ScoredTransaction {
    pub fn new(
        transaction_id: impl Into<TransactionId>,
        amount: f64,
        score: f64,
        verdict: Verdict,
    ) -> Self {
        Self {
            transaction_id: Some(transaction_id.into()),
            amount,
            score,
            verdict,
            explanation: None,
            timestamp: None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.verdict.is_block()
    }

    /// Id for display; `-` when the row had none.
    pub fn id_label(&self) -> String {
        self.transaction_id
            .as_ref()
            .map_or_else(|| "-".to_string(), TransactionId::to_string)
    }

    pub fn has_explanation(&self) -> bool {
        self.explanation.as_ref().is_some_and(|e| !e.is_empty())
    }
}
