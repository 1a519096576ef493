//! HTTP transport to the coverage optimizer.
//!
//! [`HttpOptimizer`] posts the request JSON to `{API_URL}/api/optimize` and
//! maps every failure onto [`LumenError::Transport`]. It never retries.

use lumen_core::config::ApiSettings;
use lumen_core::orchestrator::OptimizerBackend;
use lumen_core::protocol::{
    ErrorResponse, HealthResponse, OptimizationRequest, OptimizationResult, HEALTH_PATH,
    OPTIMIZE_PATH,
};
use lumen_core::{LumenError, LumenResult};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct HttpOptimizer {
    client: Client,
    base_url: String,
}

impl HttpOptimizer {
    /// Client without a request timeout.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &ApiSettings) -> LumenResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| LumenError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: settings.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Liveness probe against the service root.
    pub async fn health(&self) -> LumenResult<HealthResponse> {
        let url = self.endpoint(HEALTH_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| send_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LumenError::Transport(format!(
                "Health check failed ({})",
                status
            )));
        }
        response
            .json::<HealthResponse>()
            .await
            .map_err(|e| LumenError::Transport(format!("Unreadable health response: {}", e)))
    }

    async fn post_optimize(&self, request: &OptimizationRequest) -> LumenResult<OptimizationResult> {
        let url = self.endpoint(OPTIMIZE_PATH);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| send_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = failure_message(status, &body);
            warn!("Optimizer answered {}: {}", status, message);
            return Err(LumenError::Transport(message));
        }

        response
            .json::<OptimizationResult>()
            .await
            .map_err(|e| LumenError::Transport(format!("Unreadable optimization result: {}", e)))
    }
}

impl OptimizerBackend for HttpOptimizer {
    async fn optimize(&self, request: &OptimizationRequest) -> LumenResult<OptimizationResult> {
        self.post_optimize(request).await
    }
}

fn send_error(url: &str, e: reqwest::Error) -> LumenError {
    let reason = if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    LumenError::Transport(format!("{} {}: {}", url, reason, e))
}

/// The backend's `detail` when it sent one, else a generic message.
pub fn failure_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.message())
        .unwrap_or_else(|| format!("Optimization request failed ({})", status))
}
