use shared::{ConfigId, Disease, ModelId};

/// Local, pre-request rejection of a candidate upload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File is too large ({size} bytes). Maximum size is {limit} bytes.")]
    TooLarge { size: u64, limit: u64 },
    #[error("Unsupported file type '{0}'. Please upload a PNG or JPEG image.")]
    UnsupportedType(String),
}

/// A response whose result list does not cover every disease exactly once.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResultSetError {
    #[error("unknown disease '{0}' in results")]
    UnknownDisease(String),
    #[error("no result for {0}")]
    MissingDisease(Disease),
    #[error("duplicate result for {0}")]
    DuplicateDisease(Disease),
    #[error("probability {prob} for {disease} is outside [0, 1]")]
    OutOfRange { disease: Disease, prob: f64 },
}

/// Why a dispatched prediction ended in the failed state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("{0}")]
    Server(String),
    #[error("{0}")]
    Transport(String),
    #[error("Malformed prediction results: {0}")]
    MalformedResults(#[from] ResultSetError),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Catalog references unknown model: {0}")]
    UnknownModel(ModelId),
    #[error("Catalog references unknown config: {0}")]
    UnknownConfig(ConfigId),
    #[error("Duplicate catalog entry: {0}")]
    Duplicate(String),
}
