#![deny(warnings)]

//! HTTP client for the remote pricing simulator.
//!
//! One call to [`SimulationBackend::run`] issues exactly one `POST /api/simulate`.
//! There is no retry and no caching; failures are classified into
//! [`SimulationError`] kinds so the dashboard can surface them as notices.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sim_contract::{
    validate_history, SimulationParams, SimulationResult, ValidationError, SIMULATE_PATH,
};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Base URL used for local development.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Longest server error body kept in a [`SimulationError::ServerFailure`].
const BODY_EXCERPT_CHARS: usize = 200;

/// Connection settings for the simulator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port of the simulator, without the endpoint path.
    pub base_url: String,
    /// Whole-request timeout. Expiry is reported as a network failure.
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ClientConfig {
    /// Full URL of the simulation endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SIMULATE_PATH)
    }
}

/// Coarse failure category, used for notices and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Network,
    Server,
    MalformedResponse,
}

/// Failures of a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Parameters rejected before any request was made.
    #[error("invalid parameters: {0}")]
    Validation(#[from] ValidationError),
    /// Request could not be sent, no response arrived, or the timeout expired.
    #[error("network failure: {0}")]
    NetworkFailure(String),
    /// Response arrived with a non-success status.
    #[error("simulator returned HTTP {status}: {body}")]
    ServerFailure { status: u16, body: String },
    /// Response body does not match the contract.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl SimulationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimulationError::Validation(_) => ErrorKind::Validation,
            SimulationError::NetworkFailure(_) => ErrorKind::Network,
            SimulationError::ServerFailure { .. } => ErrorKind::Server,
            SimulationError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }
}

fn network(e: reqwest::Error) -> SimulationError {
    if e.is_timeout() {
        SimulationError::NetworkFailure(format!("request timed out: {e}"))
    } else {
        SimulationError::NetworkFailure(e.to_string())
    }
}

fn excerpt(body: &str) -> String {
    body.trim().chars().take(BODY_EXCERPT_CHARS).collect()
}

/// Parse a success body and re-check the history ordering guarantee.
pub fn decode_response(body: &str) -> Result<SimulationResult, SimulationError> {
    let result: SimulationResult = serde_json::from_str(body)
        .map_err(|e| SimulationError::MalformedResponse(e.to_string()))?;
    validate_history(&result.history)
        .map_err(|e| SimulationError::MalformedResponse(e.to_string()))?;
    Ok(result)
}

/// Anything that can execute a simulation run.
#[async_trait]
pub trait SimulationBackend: Send + Sync {
    /// Run one simulation. Callers validate `params` beforehand.
    async fn run(&self, params: &SimulationParams) -> Result<SimulationResult, SimulationError>;
}

/// [`SimulationBackend`] over HTTP.
pub struct HttpSimulationClient {
    http: Client,
    endpoint: String,
}

impl HttpSimulationClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self, SimulationError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| SimulationError::NetworkFailure(format!("client setup: {e}")))?;
        Ok(Self {
            http,
            endpoint: cfg.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SimulationBackend for HttpSimulationClient {
    async fn run(&self, params: &SimulationParams) -> Result<SimulationResult, SimulationError> {
        debug!(endpoint = %self.endpoint, ?params, "posting simulation request");
        let resp = self
            .http
            .post(&self.endpoint)
            .json(params)
            .send()
            .await
            .map_err(network)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "simulator rejected request");
            return Err(SimulationError::ServerFailure {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }
        let body = resp.text().await.map_err(network)?;
        let result = decode_response(&body)?;
        info!(days = result.history.len(), "simulation response received");
        Ok(result)
    }
}
