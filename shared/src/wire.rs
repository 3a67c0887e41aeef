use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One `(disease, probability)` pair as sent by the inference service.
/// `disease` stays a string here; the client checks it against [`crate::Disease`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub disease: String,
    pub prob: f64,
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Vec<PredictionResult>,
    #[serde(rename = "processingTime", alias = "processing_time", default)]
    pub processing_time: f64,
    #[serde(rename = "modelVersion", alias = "model_name", default)]
    pub model_version: String,
    #[serde(default)]
    pub config: String,
    #[serde(rename = "imageSize", alias = "image_size", default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error payloads returned with a non-success status. The service emits either
/// `{"error": ...}` or `{"detail": ...}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn message(self) -> Option<String> {
        self.error.or(self.detail).filter(|m| !m.trim().is_empty())
    }
}

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub device: String,
    pub available_configs: Vec<String>,
    pub available_models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub filename: String,
    pub compatible: bool,
    pub path: String,
}

/// Entry of `GET /models`, keyed by configuration id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub image_size: u32,
    pub loss: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub image_size: u32,
    pub learning_rate: f64,
    pub loss_function: String,
    pub model_type: String,
    pub description: String,
}

/// `GET /configs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigsResponse {
    pub configs: BTreeMap<String, ConfigSummary>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCombination {
    pub model: String,
    pub config: String,
    pub compatible: bool,
    pub file_exists: bool,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `GET /implementation-status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationStatus {
    pub fully_implemented: Vec<ModelCombination>,
    pub compatible_combinations: Vec<ModelCombination>,
    pub incompatible_combinations: Vec<ModelCombination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigCompatibility {
    pub description: String,
    pub compatible_models: Vec<String>,
}

/// `GET /compatibility`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResponse {
    /// Model name to the configurations it was trained under.
    pub compatibility_matrix: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub config_descriptions: BTreeMap<String, ConfigCompatibility>,
}

/// Plain acknowledgement, e.g. from `POST /clear-cache`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
