//! Configuration → model → thresholds, derived atomically.
//!
//! Each [`SelectionAction`] produces a complete next [`Selection`]; the model
//! is always a member of the configuration's model list (or the catalog
//! fallback when that list is empty), and the thresholds always belong to the
//! current model.

use crate::registry::ConfigRegistry;
use crate::thresholds::ThresholdStore;
use shared::{ConfigId, Disease, ModelId};

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionAction {
    SelectConfig(ConfigId),
    /// The id must come from `models_for(current config)`.
    SelectModel(ModelId),
    SetThreshold(Disease, String),
    ResetThresholds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    config: ConfigId,
    model: ModelId,
    thresholds: ThresholdStore,
}

impl Selection {
    pub fn initial(registry: &ConfigRegistry) -> Self {
        Self::for_config(registry, registry.initial_config())
    }

    fn for_config(registry: &ConfigRegistry, config: ConfigId) -> Self {
        let model = registry.default_model_for(&config);
        let thresholds = ThresholdStore::seeded(registry, &model);
        Self {
            config,
            model,
            thresholds,
        }
    }

    pub fn config(&self) -> &ConfigId {
        &self.config
    }

    pub fn model(&self) -> &ModelId {
        &self.model
    }

    pub fn thresholds(&self) -> &ThresholdStore {
        &self.thresholds
    }

    /// Computes the state that follows `action`.
    ///
    /// Choosing a configuration always picks its default model, even when the
    /// previous model is also valid there. Any change of model reseeds the
    /// thresholds and discards user edits.
    pub fn reduce(&self, registry: &ConfigRegistry, action: SelectionAction) -> Selection {
        match action {
            SelectionAction::SelectConfig(config) => {
                log::debug!("Selecting config {}", config);
                Self::for_config(registry, config)
            }
            SelectionAction::SelectModel(model) => {
                debug_assert!(
                    registry.is_compatible(&model, &self.config)
                        || registry.models_for(&self.config).is_empty(),
                    "model {} is not offered by config {}",
                    model,
                    self.config
                );
                log::debug!("Selecting model {}", model);
                let thresholds = ThresholdStore::seeded(registry, &model);
                Selection {
                    config: self.config.clone(),
                    model,
                    thresholds,
                }
            }
            SelectionAction::SetThreshold(disease, raw) => {
                let mut next = self.clone();
                next.thresholds.set_threshold(disease, &raw);
                next
            }
            SelectionAction::ResetThresholds => {
                let mut next = self.clone();
                next.thresholds.reset(registry);
                next
            }
        }
    }

    pub fn apply(&mut self, registry: &ConfigRegistry, action: SelectionAction) {
        *self = self.reduce(registry, action);
    }
}
