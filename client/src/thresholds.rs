use crate::registry::ConfigRegistry;
use shared::{Disease, ModelId, ThresholdMap};

/// Lenient parse of user input: anything that is not a number becomes `0`,
/// the result is clamped into `[0, 1]`.
pub fn parse_threshold(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .map(shared::clamp_probability)
        .unwrap_or(0.0)
}

/// The active per-disease cutoffs and the model they were seeded from.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdStore {
    model: ModelId,
    current: ThresholdMap,
}

impl ThresholdStore {
    pub fn seeded(registry: &ConfigRegistry, model: &ModelId) -> Self {
        Self {
            model: model.clone(),
            current: registry.default_thresholds(model),
        }
    }

    /// Replaces every entry with the defaults of `model`, dropping user edits.
    pub fn seed(&mut self, registry: &ConfigRegistry, model: &ModelId) {
        log::debug!("Seeding thresholds from model {}", model);
        self.model = model.clone();
        self.current = registry.default_thresholds(model);
    }

    pub fn set_threshold(&mut self, disease: Disease, raw: &str) {
        self.current.set(disease, parse_threshold(raw));
    }

    pub fn set_value(&mut self, disease: Disease, value: f64) {
        self.current.set(disease, value);
    }

    pub fn reset(&mut self, registry: &ConfigRegistry) {
        let model = self.model.clone();
        self.seed(registry, &model);
    }

    pub fn get(&self, disease: Disease) -> f64 {
        self.current.get(disease)
    }

    pub fn current(&self) -> &ThresholdMap {
        &self.current
    }

    pub fn seeded_from(&self) -> &ModelId {
        &self.model
    }

    /// True when no entry differs from the seed value.
    pub fn is_pristine(&self, registry: &ConfigRegistry) -> bool {
        self.current == registry.default_thresholds(&self.model)
    }
}
