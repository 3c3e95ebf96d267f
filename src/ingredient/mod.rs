//! Cannabis ingredients and their classification enums.

pub mod cannabis;

pub use cannabis::CannabisIngredient;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of cannabis ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientType {
    Flower,
    Concentrate,
    Distillate,
    Isolate,
    Tincture,
    /// Cannabis-infused butter
    Butter,
    /// Cannabis-infused oil
    Oil,
    /// Rick Simpson Oil
    Rso,
    Kief,
    Hash,
    Rosin,
    Sauce,
    Extract,
}

impl IngredientType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientType::Flower => "flower",
            IngredientType::Concentrate => "concentrate",
            IngredientType::Distillate => "distillate",
            IngredientType::Isolate => "isolate",
            IngredientType::Tincture => "tincture",
            IngredientType::Butter => "butter",
            IngredientType::Oil => "oil",
            IngredientType::Rso => "rso",
            IngredientType::Kief => "kief",
            IngredientType::Hash => "hash",
            IngredientType::Rosin => "rosin",
            IngredientType::Sauce => "sauce",
            IngredientType::Extract => "extract",
        }
    }

    /// Physical form a freshly made ingredient of this type usually has
    #[must_use]
    pub fn default_form(&self) -> IngredientForm {
        match self {
            IngredientType::Flower | IngredientType::Kief => IngredientForm::Solid,
            IngredientType::Isolate => IngredientForm::Crystal,
            IngredientType::Butter
            | IngredientType::Hash
            | IngredientType::Rosin
            | IngredientType::Rso => IngredientForm::Paste,
            IngredientType::Concentrate
            | IngredientType::Distillate
            | IngredientType::Tincture
            | IngredientType::Oil
            | IngredientType::Sauce
            | IngredientType::Extract => IngredientForm::Liquid,
        }
    }
}

impl fmt::Display for IngredientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngredientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flower" => Ok(IngredientType::Flower),
            "concentrate" => Ok(IngredientType::Concentrate),
            "distillate" => Ok(IngredientType::Distillate),
            "isolate" => Ok(IngredientType::Isolate),
            "tincture" => Ok(IngredientType::Tincture),
            "butter" => Ok(IngredientType::Butter),
            "oil" => Ok(IngredientType::Oil),
            "rso" => Ok(IngredientType::Rso),
            "kief" => Ok(IngredientType::Kief),
            "hash" => Ok(IngredientType::Hash),
            "rosin" => Ok(IngredientType::Rosin),
            "sauce" => Ok(IngredientType::Sauce),
            "extract" => Ok(IngredientType::Extract),
            other => Err(format!("unknown ingredient type: {other}")),
        }
    }
}

/// Physical form of an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientForm {
    Solid,
    Liquid,
    Powder,
    Paste,
    Crystal,
}

impl IngredientForm {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientForm::Solid => "solid",
            IngredientForm::Liquid => "liquid",
            IngredientForm::Powder => "powder",
            IngredientForm::Paste => "paste",
            IngredientForm::Crystal => "crystal",
        }
    }
}

impl fmt::Display for IngredientForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngredientForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" => Ok(IngredientForm::Solid),
            "liquid" => Ok(IngredientForm::Liquid),
            "powder" => Ok(IngredientForm::Powder),
            "paste" => Ok(IngredientForm::Paste),
            "crystal" => Ok(IngredientForm::Crystal),
            other => Err(format!("unknown ingredient form: {other}")),
        }
    }
}
