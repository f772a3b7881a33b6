//! Feature columns required by `/predict` and `/predict/csv`.
//!
//! One definition serves both the request payload ([`TransactionFeatures`])
//! and upload validation ([`validate_csv_header`]); a test keeps the two in step.

use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};

/// Columns the scoring model consumes, in model order.
pub const REQUIRED_FEATURE_COLUMNS: [&str; 25] = [
    "amount",
    "log_amount",
    "hour_of_day",
    "day_of_week",
    "is_night",
    "is_weekend",
    "is_month_end",
    "is_month_start",
    "monthly_os_changes",
    "monthly_phone_model_changes",
    "logins_last_7_days",
    "logins_last_30_days",
    "login_frequency_7d",
    "login_frequency_30d",
    "freq_change_7d_vs_mean",
    "logins_7d_over_30d_ratio",
    "avg_login_interval_30d",
    "std_login_interval_30d",
    "ewm_login_interval_7d",
    "burstiness_login_interval",
    "zscore_avg_login_interval_7d",
    "is_cold_start",
    "os_family",
    "phone_brand",
    "direction",
];

/// `is_fraud` is ground truth; when present the backend returns quality metrics.
pub const OPTIONAL_COLUMNS: [&str; 2] = ["transaction_id", "is_fraud"];

/// One raw transaction as sent to `/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i64>,
    pub amount: f64,
    pub log_amount: f64,
    pub hour_of_day: u8,
    pub day_of_week: u8,
    pub is_night: u8,
    pub is_weekend: u8,
    pub is_month_end: u8,
    pub is_month_start: u8,
    pub monthly_os_changes: u32,
    pub monthly_phone_model_changes: u32,
    pub logins_last_7_days: u32,
    pub logins_last_30_days: u32,
    pub login_frequency_7d: f64,
    pub login_frequency_30d: f64,
    pub freq_change_7d_vs_mean: f64,
    pub logins_7d_over_30d_ratio: f64,
    pub avg_login_interval_30d: f64,
    pub std_login_interval_30d: f64,
    pub ewm_login_interval_7d: f64,
    pub burstiness_login_interval: f64,
    pub zscore_avg_login_interval_7d: f64,
    pub is_cold_start: u8,
    pub os_family: String,
    pub phone_brand: String,
    pub direction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fraud: Option<u8>,
}

/// Required columns absent from `columns`, in schema order.
pub fn missing_columns<'a, I>(columns: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: std::collections::HashSet<&str> = columns.into_iter().map(str::trim).collect();
    REQUIRED_FEATURE_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect()
}

/// Check a CSV header line before upload. The backend performs the same
/// check and answers 4xx with a `detail`; failing locally saves the round trip.
pub fn validate_csv_header(header_line: &str) -> Result<()> {
    let header = header_line.trim_start_matches('\u{feff}').trim_end_matches(['\r', '\n']);
    if header.trim().is_empty() {
        return Err(ConsoleError::Validation("CSV file is empty".to_string()));
    }
    let missing = missing_columns(header.split(',').map(|c| c.trim_matches('"')));
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConsoleError::Validation(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )))
    }
}

/// Human-readable column list for upload help text.
pub fn upload_help() -> String {
    format!(
        "Required columns: {}. Optional: {}.",
        REQUIRED_FEATURE_COLUMNS.join(", "),
        OPTIONAL_COLUMNS.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransactionFeatures {
        TransactionFeatures {
            transaction_id: Some(1),
            amount: 1000.0,
            log_amount: (1001.0f64).ln(),
            hour_of_day: 14,
            day_of_week: 2,
            is_night: 0,
            is_weekend: 0,
            is_month_end: 0,
            is_month_start: 0,
            monthly_os_changes: 0,
            monthly_phone_model_changes: 0,
            logins_last_7_days: 3,
            logins_last_30_days: 12,
            login_frequency_7d: 3.0 / 7.0,
            login_frequency_30d: 12.0 / 30.0,
            freq_change_7d_vs_mean: 0.1,
            logins_7d_over_30d_ratio: 0.25,
            avg_login_interval_30d: 50_000.0,
            std_login_interval_30d: 20_000.0,
            ewm_login_interval_7d: 40_000.0,
            burstiness_login_interval: 0.1,
            zscore_avg_login_interval_7d: 0.0,
            is_cold_start: 0,
            os_family: "Android".into(),
            phone_brand: "Samsung".into(),
            direction: "abc123".into(),
            is_fraud: None,
        }
    }

    #[test]
    fn payload_fields_match_schema() {
        let v = serde_json::to_value(sample()).unwrap();
        let obj = v.as_object().unwrap();
        for col in REQUIRED_FEATURE_COLUMNS {
            assert!(obj.contains_key(col), "payload lacks {}", col);
        }
        let extra: Vec<&String> = obj
            .keys()
            .filter(|k| !REQUIRED_FEATURE_COLUMNS.contains(&k.as_str()))
            .filter(|k| !OPTIONAL_COLUMNS.contains(&k.as_str()))
            .collect();
        assert!(extra.is_empty(), "payload has unknown fields {:?}", extra);
        assert!(obj.get("is_fraud").is_none());
    }

    #[test]
    fn header_with_all_columns_passes() {
        let header = format!("transaction_id,{}\r\n", REQUIRED_FEATURE_COLUMNS.join(","));
        assert!(validate_csv_header(&header).is_ok());
    }

    #[test]
    fn header_reports_missing_columns_in_order() {
        let cols: Vec<&str> = REQUIRED_FEATURE_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != "direction" && *c != "amount")
            .collect();
        let err = validate_csv_header(&cols.join(",")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Validation failed: Missing required columns: amount, direction"
        );
    }

    #[test]
    fn quoted_header_and_bom_are_tolerated() {
        let quoted: Vec<String> = REQUIRED_FEATURE_COLUMNS
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect();
        let header = format!("\u{feff}{}", quoted.join(","));
        assert!(validate_csv_header(&header).is_ok());
        assert!(validate_csv_header("").is_err());
    }

    #[test]
    fn help_lists_every_column() {
        let help = upload_help();
        assert!(REQUIRED_FEATURE_COLUMNS.iter().all(|c| help.contains(c)));
        assert!(help.contains("is_fraud"));
    }
}
