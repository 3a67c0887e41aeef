//! Selection, validation, and prediction orchestration for the chest X-ray
//! classification client.
//!
//! Hosts own a [`Session`] and drive it from user events; network I/O goes
//! through a [`PredictionTransport`] supplied by the host.

pub mod classify;
pub mod config;
pub mod error;
pub mod fallback;
pub mod orchestrator;
pub mod registry;
pub mod results;
pub mod selection;
pub mod session;
pub mod thresholds;
pub mod transport;
pub mod upload;

pub use classify::{Classification, DiseaseCall, RiskBucket, Summary, classify};
pub use config::{ClientConfig, UnavailableBackend};
pub use error::{CatalogError, PredictError, ResultSetError, ValidationError};
pub use fallback::{FallbackPolicy, SurfaceFailure, SyntheticResults, policy_for};
pub use orchestrator::{Completion, Dispatch, Outcome, Phase, PredictionMeta, PredictionOrchestrator};
pub use registry::{ConfigRegistry, Configuration, Model};
pub use results::ResultSet;
pub use selection::{Selection, SelectionAction};
pub use session::{ReadTicket, Session};
pub use thresholds::ThresholdStore;
pub use transport::{HttpReply, PredictRequest, PredictionTransport, TransportError};
pub use upload::{FileMeta, Upload, UploadSlot, UploadedImage};
