//! Transport to the remote analysis service.
//!
//! One multipart request per call (`file` + `role`), one free-text reply.
//! The session only sees the `AnalysisTransport` trait, so tests can swap in
//! scripted transports.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::session::inputs::{Document, Role};

pub const ANALYZE_ENDPOINT: &str = "/analyze/";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Malformed(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Wire shape of a successful reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    detail: String,
}

/// Sends a document and role, resolves to the service's raw reply text.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn analyze(&self, document: &Document, role: &Role) -> Result<String, TransportError>;
}

/// reqwest-backed transport. Timeouts surface as `TransportError::Network`.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        Self::new(
            config.api_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn analyze(&self, document: &Document, role: &Role) -> Result<String, TransportError> {
        let url = format!("{}{}", self.base_url, ANALYZE_ENDPOINT);

        let file = Part::bytes(document.bytes.to_vec())
            .file_name(document.name.clone())
            .mime_str(&document.content_type)
            .map_err(|e| {
                TransportError::InvalidDocument(format!(
                    "unsupported content type '{}': {e}",
                    document.content_type
                ))
            })?;
        let form = Form::new()
            .part("file", file)
            .text("role", role.label.clone());

        debug!(
            "POST {} ({} bytes, role '{}')",
            url,
            document.size(),
            role.label
        );

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            // A body that fails to arrive still leaves the status to report.
            let body = response.text().await.unwrap_or_default();
            warn!("Analysis service returned {}: {}", status, body);
            return Err(TransportError::Server {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<AnalyzeResponse>(&body)
            .map(|reply| reply.analysis)
            .map_err(|e| TransportError::Malformed(format!("{e}")))
    }
}

/// Pulls a human-readable message out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    if let Ok(envelope) = serde_json::from_str::<DetailEnvelope>(body) {
        return envelope.detail;
    }
    body.trim().to_string()
}
