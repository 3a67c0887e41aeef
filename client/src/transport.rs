use shared::{ConfigId, ModelId};

pub const PREDICT_PATH: &str = "/predict";
pub const HEALTH_PATH: &str = "/health";
pub const MODELS_PATH: &str = "/models";
pub const CONFIGS_PATH: &str = "/configs";
pub const IMPLEMENTATION_STATUS_PATH: &str = "/implementation-status";
pub const COMPATIBILITY_PATH: &str = "/compatibility";
pub const CLEAR_CACHE_PATH: &str = "/clear-cache";

pub const FIELD_FILE: &str = "file";
pub const FIELD_MODEL: &str = "model";
pub const FIELD_CONFIG: &str = "config";

/// Everything needed to build the multipart `POST /predict` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictRequest {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub model: ModelId,
    pub config: ConfigId,
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Network error: {0}")]
pub struct TransportError(pub String);

/// Sends a prediction request to the inference service.
///
/// Server-side failures are returned as an `Ok` reply with a non-success
/// status; `Err` is reserved for failures of the call itself.
#[allow(async_fn_in_trait)]
pub trait PredictionTransport {
    async fn send(&self, request: PredictRequest) -> Result<HttpReply, TransportError>;
}
