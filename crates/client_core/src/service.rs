use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{
    HealthResponse, PredictRequest, PredictResponse, ServiceErrorBody, HEALTH_PATH, PREDICT_PATH,
};
use tracing::{debug, warn};

use crate::{config::ClientSettings, controller::PredictionResult, error::PredictionError};

const ERROR_DETAIL_MAX_CHARS: usize = 200;

#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, PredictionError>;
}

pub struct HttpPredictionService {
    http: Client,
    base_url: String,
}

impl HttpPredictionService {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build prediction http client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        Self::new(settings.service_url.clone(), settings.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn check_health(&self) -> Result<HealthResponse, PredictionError> {
        let response = self
            .http
            .get(self.endpoint(HEALTH_PATH))
            .send()
            .await
            .map_err(PredictionError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::unavailable(format!(
                "health check returned {status}"
            )));
        }
        let body = response
            .bytes()
            .await
            .map_err(PredictionError::from_transport)?;
        serde_json::from_slice(&body).map_err(|err| PredictionError::invalid(err.to_string()))
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, PredictionError> {
        let response = self
            .http
            .post(self.endpoint(PREDICT_PATH))
            .json(request)
            .send()
            .await
            .map_err(PredictionError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PredictionError::unavailable(format!(
                "prediction service returned {status}: {}",
                error_detail(&body)
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(PredictionError::from_transport)?;
        let parsed: PredictResponse = serde_json::from_slice(&body)
            .map_err(|err| PredictionError::invalid(err.to_string()))?;

        if let Some(echo) = parsed.input {
            if echo != *request {
                warn!(
                    sent_temperature = request.temperature,
                    sent_pressure = request.pressure,
                    echoed_temperature = echo.temperature,
                    echoed_pressure = echo.pressure,
                    "prediction service echoed different inputs"
                );
            }
        }
        debug!(label = %parsed.prediction, is_golden = parsed.is_golden_batch, "prediction received");

        Ok(PredictionResult {
            label: parsed.prediction,
            is_golden: parsed.is_golden_batch,
        })
    }
}

fn error_detail(body: &str) -> String {
    let detail = serde_json::from_str::<ServiceErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| body.trim().to_string());
    if detail.is_empty() {
        return "<empty body>".to_string();
    }
    detail.chars().take(ERROR_DETAIL_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::error_detail;

    #[test]
    fn error_detail_prefers_service_error_field() {
        assert_eq!(error_detail(r#"{"error": "Model not loaded"}"#), "Model not loaded");
        assert_eq!(error_detail("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(error_detail(""), "<empty body>");
        assert_eq!(error_detail(&"x".repeat(500)).len(), 200);
    }
}
