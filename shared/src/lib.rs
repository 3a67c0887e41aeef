mod disease;
mod ids;
mod thresholds;
mod wire;

pub use disease::Disease;
pub use ids::{ConfigId, ModelId};
pub use thresholds::{ThresholdMap, ThresholdMapError, clamp_probability};
pub use wire::{
    CompatibilityResponse, ConfigCompatibility, ConfigInfo, ConfigSummary, ConfigsResponse, ErrorBody,
    HealthResponse, ImplementationStatus, MessageResponse, ModelCombination, ModelInfo, PredictionResponse,
    PredictionResult,
};
