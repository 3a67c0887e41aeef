//! Read-only catalog of configurations, models, and threshold defaults.
//!
//! The registry is built once and handed to the session by reference; nothing
//! in it changes at runtime.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use shared::{ConfigId, Disease, ModelId, ThresholdMap};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub id: ConfigId,
    pub name: String,
    pub description: String,
    pub image_size: u32,
    pub learning_rate: f64,
    #[serde(default)]
    pub loss: String,
    #[serde(default)]
    pub model_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: ModelId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    fallback_model: ModelId,
    default_thresholds: ThresholdMap,
    models: Vec<ModelEntry>,
    configs: Vec<ConfigEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    #[serde(flatten)]
    model: Model,
    #[serde(default)]
    thresholds: Option<ThresholdMap>,
}

#[derive(Debug, Deserialize)]
struct ConfigEntry {
    #[serde(flatten)]
    config: Configuration,
    #[serde(default)]
    models: Vec<ModelId>,
}

#[derive(Debug, Clone)]
pub struct ConfigRegistry {
    configs: Vec<Configuration>,
    models: Vec<Model>,
    relation: HashMap<ConfigId, Vec<ModelId>>,
    model_defaults: HashMap<ModelId, ThresholdMap>,
    global_defaults: ThresholdMap,
    fallback_model: ModelId,
}

/// Global default cutoffs used when a model has no calibrated map of its own.
pub fn reference_thresholds() -> ThresholdMap {
    ThresholdMap::uniform(0.0)
        .with(Disease::Atelectasis, 0.05)
        .with(Disease::Edema, 0.40)
        .with(Disease::LungOpacity, 0.05)
        .with(Disease::PleuralEffusion, 0.30)
        .with(Disease::Pneumonia, 0.35)
        .with(Disease::Pneumothorax, 0.30)
}

impl ConfigRegistry {
    pub fn builder(fallback_model: impl Into<ModelId>, global_defaults: ThresholdMap) -> RegistryBuilder {
        RegistryBuilder {
            registry: ConfigRegistry {
                configs: Vec::new(),
                models: Vec::new(),
                relation: HashMap::new(),
                model_defaults: HashMap::new(),
                global_defaults,
                fallback_model: fallback_model.into(),
            },
        }
    }

    /// The catalog the inference service ships with.
    pub fn reference() -> Self {
        const CNN: [&str; 3] = ["densenet121", "efficientnet-b2", "regnety-800mf"];
        const TRANSFORMER: [&str; 2] = ["efficientformerv2-s2", "mobilevit-s"];

        let config = |id: &str, name: &str, description: &str, size: u32, lr: f64, loss: &str, kind: &str| {
            Configuration {
                id: ConfigId::new(id),
                name: name.to_string(),
                description: description.to_string(),
                image_size: size,
                learning_rate: lr,
                loss: loss.to_string(),
                model_type: kind.to_string(),
            }
        };

        Self::builder("densenet121", reference_thresholds())
            .model("densenet121", "DenseNet-121")
            .model("efficientnet-b2", "EfficientNet-B2")
            .model("regnety-800mf", "RegNetY-800MF")
            .model("efficientformerv2-s2", "EfficientFormerV2-S2")
            .model("mobilevit-s", "MobileViT-S")
            .config(
                config("config1", "Config 1", "CNN models, 224×224, Focal Loss", 224, 1e-4, "focal", "CNN"),
                &CNN,
            )
            .config(
                config("config2", "Config 2", "CNN models, 320×320, Focal Loss", 320, 3e-4, "focal", "CNN"),
                &CNN,
            )
            .config(
                config(
                    "config3",
                    "Config 3",
                    "CNN-Transformer models, 224×224, Focal Loss",
                    224,
                    1e-4,
                    "focal",
                    "CNN-Transformer",
                ),
                &TRANSFORMER,
            )
            .config(
                config(
                    "config4",
                    "Config 4",
                    "All models, 224×224, Asymmetric Loss",
                    224,
                    1e-4,
                    "asymmetric",
                    "CNN+CNN-Transformer",
                ),
                &[CNN.as_slice(), TRANSFORMER.as_slice()].concat(),
            )
            .build_unchecked()
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(source)?;
        let mut builder = Self::builder(file.fallback_model, file.default_thresholds);
        for entry in file.models {
            if let Some(thresholds) = entry.thresholds {
                builder.registry.model_defaults.insert(entry.model.id.clone(), thresholds);
            }
            builder.registry.models.push(entry.model);
        }
        for entry in file.configs {
            builder.registry.relation.insert(entry.config.id.clone(), entry.models);
            builder.registry.configs.push(entry.config);
        }
        builder.build()
    }

    /// Models reachable from `config`, in catalog order. Unknown configs yield
    /// an empty list.
    pub fn models_for(&self, config: &ConfigId) -> Vec<&Model> {
        self.relation
            .get(config)
            .map(|ids| ids.iter().filter_map(|id| self.model(id)).collect())
            .unwrap_or_default()
    }

    /// First model of `config`, or the catalog's fallback identity when none.
    pub fn default_model_for(&self, config: &ConfigId) -> ModelId {
        self.models_for(config)
            .first()
            .map(|m| m.id.clone())
            .unwrap_or_else(|| self.fallback_model.clone())
    }

    pub fn default_thresholds(&self, model: &ModelId) -> ThresholdMap {
        self.model_defaults.get(model).copied().unwrap_or(self.global_defaults)
    }

    pub fn global_thresholds(&self) -> ThresholdMap {
        self.global_defaults
    }

    pub fn is_compatible(&self, model: &ModelId, config: &ConfigId) -> bool {
        self.relation.get(config).is_some_and(|ids| ids.contains(model))
    }

    pub fn compatible_configs(&self, model: &ModelId) -> Vec<&ConfigId> {
        self.configs
            .iter()
            .map(|c| &c.id)
            .filter(|id| self.is_compatible(model, id))
            .collect()
    }

    pub fn config(&self, id: &ConfigId) -> Option<&Configuration> {
        self.configs.iter().find(|c| &c.id == id)
    }

    pub fn model(&self, id: &ModelId) -> Option<&Model> {
        self.models.iter().find(|m| &m.id == id)
    }

    pub fn configs(&self) -> &[Configuration] {
        &self.configs
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn fallback_model(&self) -> &ModelId {
        &self.fallback_model
    }

    /// Checks referential integrity of the catalog.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for model in &self.models {
            if !seen.insert(model.id.as_str()) {
                return Err(CatalogError::Duplicate(model.id.to_string()));
            }
        }
        let mut seen = HashSet::new();
        for config in &self.configs {
            if !seen.insert(config.id.as_str()) {
                return Err(CatalogError::Duplicate(config.id.to_string()));
            }
        }

        if self.model(&self.fallback_model).is_none() {
            return Err(CatalogError::UnknownModel(self.fallback_model.clone()));
        }
        for (config, ids) in &self.relation {
            if self.config(config).is_none() {
                return Err(CatalogError::UnknownConfig(config.clone()));
            }
            if let Some(missing) = ids.iter().find(|id| self.model(id).is_none()) {
                return Err(CatalogError::UnknownModel(missing.clone()));
            }
        }
        if let Some(missing) = self.model_defaults.keys().find(|id| self.model(id).is_none()) {
            return Err(CatalogError::UnknownModel(missing.clone()));
        }
        Ok(())
    }

    /// Configuration a fresh session starts on.
    pub fn initial_config(&self) -> ConfigId {
        self.configs
            .first()
            .map(|c| c.id.clone())
            .unwrap_or_else(|| ConfigId::new(""))
    }
}

pub struct RegistryBuilder {
    registry: ConfigRegistry,
}

impl RegistryBuilder {
    pub fn model(mut self, id: &str, name: &str) -> Self {
        self.registry.models.push(Model {
            id: ModelId::new(id),
            name: name.to_string(),
        });
        self
    }

    pub fn model_thresholds(mut self, id: &str, thresholds: ThresholdMap) -> Self {
        self.registry.model_defaults.insert(ModelId::new(id), thresholds);
        self
    }

    pub fn config(mut self, config: Configuration, models: &[&str]) -> Self {
        let ids = models.iter().map(|m| ModelId::new(*m)).collect();
        self.registry.relation.insert(config.id.clone(), ids);
        self.registry.configs.push(config);
        self
    }

    pub fn build(self) -> Result<ConfigRegistry, CatalogError> {
        self.registry.validate()?;
        Ok(self.registry)
    }

    fn build_unchecked(self) -> ConfigRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(models: Vec<&Model>) -> Vec<&str> {
        models.into_iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn reference_catalog_is_consistent() {
        let registry = ConfigRegistry::reference();
        assert_eq!(registry.configs().len(), 4);
        assert_eq!(registry.models().len(), 5);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn models_for_preserves_catalog_order() {
        let registry = ConfigRegistry::reference();
        assert_eq!(
            ids(registry.models_for(&"config3".into())),
            vec!["efficientformerv2-s2", "mobilevit-s"]
        );
        assert_eq!(registry.models_for(&"config4".into()).len(), 5);
    }

    #[test]
    fn unknown_config_has_no_models() {
        let registry = ConfigRegistry::reference();
        assert!(registry.models_for(&"config9".into()).is_empty());
        assert_eq!(registry.default_model_for(&"config9".into()).as_str(), "densenet121");
    }

    #[test]
    fn default_model_is_first_listed() {
        let registry = ConfigRegistry::reference();
        assert_eq!(registry.default_model_for(&"config3".into()).as_str(), "efficientformerv2-s2");
        assert_eq!(registry.default_model_for(&"config2".into()).as_str(), "densenet121");
    }

    #[test]
    fn compatibility_follows_relation() {
        let registry = ConfigRegistry::reference();
        assert!(registry.is_compatible(&"mobilevit-s".into(), &"config4".into()));
        assert!(!registry.is_compatible(&"mobilevit-s".into(), &"config1".into()));
        let configs: Vec<&str> = registry
            .compatible_configs(&"regnety-800mf".into())
            .into_iter()
            .map(|c| c.as_str())
            .collect();
        assert_eq!(configs, vec!["config1", "config2", "config4"]);
    }

    #[test]
    fn thresholds_fall_back_to_global_defaults() {
        let calibrated = ThresholdMap::uniform(0.5);
        let registry = ConfigRegistry::builder("a", reference_thresholds())
            .model("a", "A")
            .model("b", "B")
            .model_thresholds("b", calibrated)
            .build()
            .unwrap();

        assert_eq!(registry.default_thresholds(&"a".into()), reference_thresholds());
        assert_eq!(registry.default_thresholds(&"b".into()), calibrated);
        assert_eq!(registry.default_thresholds(&"zzz".into()), reference_thresholds());
    }

    #[test]
    fn build_rejects_dangling_references() {
        let result = ConfigRegistry::builder("ghost", reference_thresholds())
            .model("a", "A")
            .build();
        assert!(matches!(result, Err(CatalogError::UnknownModel(_))));

        let config = Configuration {
            id: "c".into(),
            name: "C".into(),
            description: String::new(),
            image_size: 224,
            learning_rate: 1e-4,
            loss: String::new(),
            model_type: String::new(),
        };
        let result = ConfigRegistry::builder("a", reference_thresholds())
            .model("a", "A")
            .config(config, &["a", "b"])
            .build();
        assert!(matches!(result, Err(CatalogError::UnknownModel(id)) if id.as_str() == "b"));
    }

    #[test]
    fn loads_catalog_from_yaml() {
        let source = r#"
fallback_model: small
default_thresholds:
  Atelectasis: 0.1
  Edema: 0.2
  Lung_Opacity: 0.3
  Pleural_Effusion: 0.4
  Pneumonia: 0.5
  Pneumothorax: 0.6
models:
  - id: small
    name: Small Net
  - id: large
    name: Large Net
    thresholds:
      Atelectasis: 0.9
      Edema: 0.9
      Lung_Opacity: 0.9
      Pleural_Effusion: 0.9
      Pneumonia: 0.9
      Pneumothorax: 0.9
configs:
  - id: fast
    name: Fast
    description: Small inputs
    image_size: 128
    learning_rate: 0.001
    models: [large, small]
  - id: empty
    name: Empty
    description: Nothing trained yet
    image_size: 512
    learning_rate: 0.0001
"#;
        let registry = ConfigRegistry::from_yaml_str(source).unwrap();
        assert_eq!(ids(registry.models_for(&"fast".into())), vec!["large", "small"]);
        assert!(registry.models_for(&"empty".into()).is_empty());
        assert_eq!(registry.default_model_for(&"empty".into()).as_str(), "small");
        assert_eq!(registry.default_thresholds(&"large".into()).get(Disease::Edema), 0.9);
        assert_eq!(registry.default_thresholds(&"small".into()).get(Disease::Pneumothorax), 0.6);
        assert_eq!(registry.initial_config().as_str(), "fast");
    }

    #[test]
    fn yaml_with_partial_thresholds_is_rejected() {
        let source = r#"
fallback_model: a
default_thresholds:
  Atelectasis: 0.1
models:
  - id: a
    name: A
configs: []
"#;
        assert!(matches!(ConfigRegistry::from_yaml_str(source), Err(CatalogError::Parse(_))));
    }
}
