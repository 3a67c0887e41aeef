use crate::error::ResultSetError;
use shared::{Disease, PredictionResult};
use std::str::FromStr;

/// Exactly one probability per disease, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultSet {
    probabilities: [f64; Disease::count()],
}

impl ResultSet {
    /// Builds a set from the service's result list. The list may arrive in any
    /// order but must name every disease exactly once.
    pub fn from_wire(results: &[PredictionResult]) -> Result<Self, ResultSetError> {
        let mut slots: [Option<f64>; Disease::count()] = [None; Disease::count()];
        for result in results {
            let disease = Disease::from_str(&result.disease)
                .map_err(|_| ResultSetError::UnknownDisease(result.disease.clone()))?;
            if !(0.0..=1.0).contains(&result.prob) {
                return Err(ResultSetError::OutOfRange {
                    disease,
                    prob: result.prob,
                });
            }
            let slot = &mut slots[disease.index()];
            if slot.is_some() {
                return Err(ResultSetError::DuplicateDisease(disease));
            }
            *slot = Some(result.prob);
        }

        let mut probabilities = [0.0; Disease::count()];
        for disease in Disease::all() {
            probabilities[disease.index()] =
                slots[disease.index()].ok_or(ResultSetError::MissingDisease(disease))?;
        }
        Ok(Self { probabilities })
    }

    pub fn from_fn(mut probability: impl FnMut(Disease) -> f64) -> Self {
        let mut probabilities = [0.0; Disease::count()];
        for disease in Disease::all() {
            probabilities[disease.index()] = shared::clamp_probability(probability(disease));
        }
        Self { probabilities }
    }

    pub fn get(&self, disease: Disease) -> f64 {
        self.probabilities[disease.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Disease, f64)> + '_ {
        Disease::all().map(move |d| (d, self.get(d)))
    }

    pub fn to_wire(&self) -> Vec<PredictionResult> {
        self.iter()
            .map(|(disease, prob)| PredictionResult {
                disease: disease.to_string(),
                prob,
            })
            .collect()
    }
}
