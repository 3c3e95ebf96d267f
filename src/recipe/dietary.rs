//! Dietary labels, allergens and nutrition facts for recipes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dietary restriction a recipe satisfies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    Vegan,
    Vegetarian,
    GlutenFree,
    DairyFree,
    NutFree,
    SoyFree,
    Keto,
    Paleo,
    LowSugar,
    Organic,
}

impl DietaryRestriction {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryRestriction::Vegan => "vegan",
            DietaryRestriction::Vegetarian => "vegetarian",
            DietaryRestriction::GlutenFree => "gluten_free",
            DietaryRestriction::DairyFree => "dairy_free",
            DietaryRestriction::NutFree => "nut_free",
            DietaryRestriction::SoyFree => "soy_free",
            DietaryRestriction::Keto => "keto",
            DietaryRestriction::Paleo => "paleo",
            DietaryRestriction::LowSugar => "low_sugar",
            DietaryRestriction::Organic => "organic",
        }
    }

    /// Allergen whose presence contradicts this label, if any
    #[must_use]
    pub fn excluded_allergen(&self) -> Option<AllergenType> {
        match self {
            DietaryRestriction::GlutenFree => Some(AllergenType::Wheat),
            DietaryRestriction::DairyFree => Some(AllergenType::Milk),
            DietaryRestriction::SoyFree => Some(AllergenType::Soy),
            _ => None,
        }
    }
}

impl fmt::Display for DietaryRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietaryRestriction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vegan" => Ok(DietaryRestriction::Vegan),
            "vegetarian" => Ok(DietaryRestriction::Vegetarian),
            "gluten_free" => Ok(DietaryRestriction::GlutenFree),
            "dairy_free" => Ok(DietaryRestriction::DairyFree),
            "nut_free" => Ok(DietaryRestriction::NutFree),
            "soy_free" => Ok(DietaryRestriction::SoyFree),
            "keto" => Ok(DietaryRestriction::Keto),
            "paleo" => Ok(DietaryRestriction::Paleo),
            "low_sugar" => Ok(DietaryRestriction::LowSugar),
            "organic" => Ok(DietaryRestriction::Organic),
            other => Err(format!("unknown dietary restriction: {other}")),
        }
    }
}

/// Major food allergens declared on a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllergenType {
    Milk,
    Eggs,
    Fish,
    Shellfish,
    TreeNuts,
    Peanuts,
    Wheat,
    Soy,
    Sesame,
}

impl AllergenType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AllergenType::Milk => "milk",
            AllergenType::Eggs => "eggs",
            AllergenType::Fish => "fish",
            AllergenType::Shellfish => "shellfish",
            AllergenType::TreeNuts => "tree_nuts",
            AllergenType::Peanuts => "peanuts",
            AllergenType::Wheat => "wheat",
            AllergenType::Soy => "soy",
            AllergenType::Sesame => "sesame",
        }
    }
}

impl fmt::Display for AllergenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllergenType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "milk" => Ok(AllergenType::Milk),
            "eggs" => Ok(AllergenType::Eggs),
            "fish" => Ok(AllergenType::Fish),
            "shellfish" => Ok(AllergenType::Shellfish),
            "tree_nuts" => Ok(AllergenType::TreeNuts),
            "peanuts" => Ok(AllergenType::Peanuts),
            "wheat" => Ok(AllergenType::Wheat),
            "soy" => Ok(AllergenType::Soy),
            "sesame" => Ok(AllergenType::Sesame),
            other => Err(format!("unknown allergen: {other}")),
        }
    }
}

/// Nutrition facts for one serving
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub calories: u32,
    pub fat_grams: Decimal,
    pub carbs_grams: Decimal,
    pub protein_grams: Decimal,
    pub fiber_grams: Decimal,
    pub sugar_grams: Decimal,
    pub sodium_mg: u32,
}
