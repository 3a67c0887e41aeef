//! What to do when the inference service cannot be reached at all.

use crate::config::UnavailableBackend;
use crate::results::ResultSet;
use crate::transport::TransportError;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

pub const SYNTHETIC_RANGE: Range<f64> = 0.05..0.95;

pub trait FallbackPolicy {
    /// Returns replacement results, or `None` to report the failure.
    fn on_unavailable(&mut self, error: &TransportError) -> Option<ResultSet>;

    fn name(&self) -> &'static str;
}

/// Production behaviour: the transport failure is the outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct SurfaceFailure;

impl FallbackPolicy for SurfaceFailure {
    fn on_unavailable(&mut self, _error: &TransportError) -> Option<ResultSet> {
        None
    }

    fn name(&self) -> &'static str {
        "surface"
    }
}

/// Development convenience: one independent uniform draw per disease.
#[derive(Debug, Clone)]
pub struct SyntheticResults<R> {
    rng: R,
}

impl<R: Rng> SyntheticResults<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl SyntheticResults<SmallRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FallbackPolicy for SyntheticResults<R> {
    fn on_unavailable(&mut self, error: &TransportError) -> Option<ResultSet> {
        log::warn!("Backend unreachable ({}); substituting synthetic results", error);
        Some(ResultSet::from_fn(|_| self.rng.random_range(SYNTHETIC_RANGE)))
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

/// Builds the policy named by the client configuration.
pub fn policy_for(mode: UnavailableBackend, seed: u64) -> Box<dyn FallbackPolicy> {
    match mode {
        UnavailableBackend::Surface => Box::new(SurfaceFailure),
        UnavailableBackend::Synthetic => Box::new(SyntheticResults::seeded(seed)),
    }
}
