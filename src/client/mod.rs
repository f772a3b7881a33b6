//! Backend client: scoring, CSV upload, threshold config, retraining, dashboard stats.

mod retrain;
mod types;

pub use retrain::{poll_retrain, retrain_step, RETRAIN_STEPS};
pub use types::{
    AmountDistributionRow, CsvPrediction, DashboardSnapshot, Incident, RetrainState,
    RetrainStatus, ServiceStats, ThresholdConfig, TimeSeriesPoint, UploadStats,
};

use crate::config::ApiConfig;
use crate::error::{ConsoleError, Result};
use crate::live::ScoringBackend;
use crate::transactions::{ScoredTransaction, TransactionFeatures};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use tracing::{debug, info, warn};

#[derive(Serialize)]
struct Empty {}

/// Pulls a readable message out of an error body: the JSON `detail` field when
/// present (string as-is, anything else serialized), otherwise the raw text.
fn error_detail(body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        match map.get("detail") {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(serde_json::Value::Null) | None => {}
            Some(other) => return other.to_string(),
        }
    }
    body.trim().to_string()
}

#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| ConsoleError::Config(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends, maps non-2xx to [`ConsoleError::Api`].
    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let res = req.send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let text = res.text().await.unwrap_or_default();
        let mut detail = error_detail(&text);
        if detail.is_empty() {
            detail = status.canonical_reason().unwrap_or("request failed").to_string();
        }
        warn!(status = status.as_u16(), %detail, "backend request failed");
        Err(ConsoleError::Api {
            status: status.as_u16(),
            detail,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let res = self.send(req).await?;
        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Score a batch of raw transactions.
    pub async fn predict(&self, batch: &[TransactionFeatures]) -> Result<Vec<ScoredTransaction>> {
        debug!(size = batch.len(), "POST /predict");
        self.send_json(self.client.post(self.url("/predict")).json(batch))
            .await
    }

    /// Upload a CSV file for batch scoring. The caller validates the header first.
    pub async fn predict_csv(&self, filename: &str, bytes: Vec<u8>) -> Result<CsvPrediction> {
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);
        let out: CsvPrediction = self
            .send_json(self.client.post(self.url("/predict/csv")).multipart(form))
            .await?;
        info!(
            filename,
            size,
            scored = out.predictions.len(),
            blocked = out.stats.blocked_count,
            "csv scored"
        );
        Ok(out)
    }

    pub async fn get_config(&self) -> Result<ThresholdConfig> {
        self.send_json(self.client.get(self.url("/config"))).await
    }

    /// Rejects values outside [0, 1] without contacting the backend.
    pub async fn set_threshold(&self, threshold: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConsoleError::Validation(format!(
                "threshold must be within [0, 1], got {threshold}"
            )));
        }
        self.send(
            self.client
                .post(self.url("/config"))
                .json(&ThresholdConfig { threshold }),
        )
        .await?;
        info!(threshold, "threshold updated");
        Ok(())
    }

    pub async fn start_retrain(&self) -> Result<()> {
        self.send(self.client.post(self.url("/retrain")).json(&Empty {}))
            .await?;
        info!("retraining started");
        Ok(())
    }

    pub async fn retrain_status(&self) -> Result<RetrainStatus> {
        self.send_json(self.client.get(self.url("/retrain/status")))
            .await
    }

    pub async fn dashboard(&self) -> Result<DashboardSnapshot> {
        self.send_json(self.client.get(self.url("/dashboard"))).await
    }

    pub async fn get_stats(&self) -> Result<ServiceStats> {
        self.send_json(self.client.get(self.url("/stats"))).await
    }

    pub async fn reset_stats(&self) -> Result<()> {
        self.send(self.client.post(self.url("/stats/reset"))).await?;
        info!("backend stats reset");
        Ok(())
    }
}

impl ScoringBackend for BackendClient {
    fn score(
        &self,
        batch: Vec<TransactionFeatures>,
    ) -> impl Future<Output = Result<Vec<ScoredTransaction>>> + Send {
        let this = self.clone();
        async move { this.predict(&batch).await }
    }
}
