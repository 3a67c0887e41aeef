use anyhow::{Context, Result, bail};
use client::transport::{
    CLEAR_CACHE_PATH, COMPATIBILITY_PATH, CONFIGS_PATH, FIELD_CONFIG, FIELD_FILE, FIELD_MODEL, HEALTH_PATH,
    IMPLEMENTATION_STATUS_PATH, MODELS_PATH, PREDICT_PATH,
};
use client::{ClientConfig, HttpReply, PredictRequest, PredictionTransport, TransportError};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use shared::{
    CompatibilityResponse, ConfigInfo, ConfigsResponse, HealthResponse, ImplementationStatus, MessageResponse,
};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Talks to the inference service over `reqwest`.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    /// Every request, predictions included, gives up after `timeout`.
    pub fn new(config: ClientConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.endpoint(path);
        log::debug!("GET {}", url);
        self.read_json(self.client.get(&url), &url).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.endpoint(path);
        log::debug!("POST {}", url);
        self.read_json(self.client.post(&url), &url).await
    }

    async fn read_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder, url: &str) -> Result<T> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Server error: {} - {}", status, body);
        }
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.get_json(HEALTH_PATH).await
    }

    pub async fn models(&self) -> Result<BTreeMap<String, ConfigInfo>> {
        self.get_json(MODELS_PATH).await
    }

    pub async fn configs(&self) -> Result<ConfigsResponse> {
        self.get_json(CONFIGS_PATH).await
    }

    pub async fn implementation_status(&self) -> Result<ImplementationStatus> {
        self.get_json(IMPLEMENTATION_STATUS_PATH).await
    }

    pub async fn compatibility(&self) -> Result<CompatibilityResponse> {
        self.get_json(COMPATIBILITY_PATH).await
    }

    /// Asks the service to drop its loaded models.
    pub async fn clear_cache(&self) -> Result<MessageResponse> {
        self.post_json(CLEAR_CACHE_PATH).await
    }
}

fn transport_error(e: reqwest::Error) -> TransportError {
    TransportError(e.to_string())
}

impl PredictionTransport for HttpBackend {
    async fn send(&self, request: PredictRequest) -> Result<HttpReply, TransportError> {
        let part = Part::bytes(request.bytes)
            .file_name(request.file_name)
            .mime_str(&request.mime)
            .map_err(transport_error)?;
        let form = Form::new()
            .part(FIELD_FILE, part)
            .text(FIELD_MODEL, request.model.to_string())
            .text(FIELD_CONFIG, request.config.to_string());

        let url = self.config.endpoint(PREDICT_PATH);
        log::debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        Ok(HttpReply { status, body })
    }
}
