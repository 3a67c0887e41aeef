use std::env;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const API_BASE_URL_VAR: &str = "API_BASE_URL";
pub const UNAVAILABLE_BACKEND_VAR: &str = "UNAVAILABLE_BACKEND";

/// What the orchestrator does when the transport itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableBackend {
    /// Report the failure to the user.
    Surface,
    /// Synthesize random results. Only honoured in debug builds.
    Synthetic,
}

impl UnavailableBackend {
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            UnavailableBackend::Synthetic
        } else {
            UnavailableBackend::Surface
        }
    }

    /// Parses an override value. Release builds never yield `Synthetic`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "surface" => Some(UnavailableBackend::Surface),
            "synthetic" if cfg!(debug_assertions) => Some(UnavailableBackend::Synthetic),
            "synthetic" => {
                log::warn!("Synthetic fallback requested in a release build; ignoring");
                Some(UnavailableBackend::Surface)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub unavailable_backend: UnavailableBackend,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            unavailable_backend: UnavailableBackend::build_default(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: Option<&str>, unavailable_backend: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(url) = api_base_url.map(str::trim).filter(|u| !u.is_empty()) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = unavailable_backend {
            match UnavailableBackend::parse(raw) {
                Some(policy) => config.unavailable_backend = policy,
                None => log::warn!("Unrecognised {} value '{}'", UNAVAILABLE_BACKEND_VAR, raw),
            }
        }
        config
    }

    /// Reads `API_BASE_URL` and `UNAVAILABLE_BACKEND` from the process environment.
    pub fn from_env() -> Self {
        let url = env::var(API_BASE_URL_VAR).ok();
        let policy = env::var(UNAVAILABLE_BACKEND_VAR).ok();
        Self::new(url.as_deref(), policy.as_deref())
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
