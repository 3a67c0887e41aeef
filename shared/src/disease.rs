use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{AsRefStr, Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

/// The fixed label set predicted by every model. Declaration order is the
/// canonical ordering used for result sets and tie-breaking.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    EnumCountMacro,
)]
pub enum Disease {
    Atelectasis,
    Edema,
    #[serde(rename = "Lung_Opacity")]
    #[strum(serialize = "Lung_Opacity")]
    LungOpacity,
    #[serde(rename = "Pleural_Effusion")]
    #[strum(serialize = "Pleural_Effusion")]
    PleuralEffusion,
    Pneumonia,
    Pneumothorax,
}

impl Disease {
    pub fn all() -> impl Iterator<Item = Disease> {
        Disease::iter()
    }

    pub const fn count() -> usize {
        Disease::COUNT
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Human readable label, with underscores replaced.
    pub fn label(self) -> String {
        self.as_ref().replace('_', " ")
    }
}
