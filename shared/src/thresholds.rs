use crate::Disease;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Clamps a probability into `[0, 1]`. NaN collapses to `0`.
pub fn clamp_probability(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdMapError {
    #[error("missing threshold for {0}")]
    Missing(Disease),
    #[error("threshold for {0} is outside [0, 1]")]
    OutOfRange(Disease),
}

/// One cutoff per disease. Every entry is always present and inside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Disease, f64>", into = "BTreeMap<Disease, f64>")]
pub struct ThresholdMap {
    values: [f64; Disease::count()],
}

impl ThresholdMap {
    pub fn uniform(value: f64) -> Self {
        Self {
            values: [clamp_probability(value); Disease::count()],
        }
    }

    pub fn get(&self, disease: Disease) -> f64 {
        self.values[disease.index()]
    }

    /// Stores `value` clamped into `[0, 1]`. Other entries are untouched.
    pub fn set(&mut self, disease: Disease, value: f64) {
        self.values[disease.index()] = clamp_probability(value);
    }

    pub fn with(mut self, disease: Disease, value: f64) -> Self {
        self.set(disease, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Disease, f64)> + '_ {
        Disease::all().map(move |d| (d, self.get(d)))
    }
}

impl TryFrom<BTreeMap<Disease, f64>> for ThresholdMap {
    type Error = ThresholdMapError;

    fn try_from(map: BTreeMap<Disease, f64>) -> Result<Self, Self::Error> {
        let mut values = [0.0; Disease::count()];
        for disease in Disease::all() {
            let value = *map.get(&disease).ok_or(ThresholdMapError::Missing(disease))?;
            if !(0.0..=1.0).contains(&value) {
                return Err(ThresholdMapError::OutOfRange(disease));
            }
            values[disease.index()] = value;
        }
        Ok(Self { values })
    }
}

impl From<ThresholdMap> for BTreeMap<Disease, f64> {
    fn from(map: ThresholdMap) -> Self {
        map.iter().collect()
    }
}
