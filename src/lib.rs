//! # CDES-FS
//!
//! Food service extension of the Cannabis Data Exchange Standard: COA-linked
//! cannabis ingredients, recipes with exact per-serving dosing, and terpene
//! based flavor pairing.
//!
//! ```no_run
//! use std::sync::Arc;
//! use rust_decimal::Decimal;
//! use cdes_fs::{CannabisIngredient, CoaReference, IngredientType, Recipe, RecipeCategory};
//!
//! # fn main() -> cdes_fs::Result<()> {
//! let coa = Arc::new(CoaReference::new("COA-2024-001", "B-778", "Lemon Haze")?);
//! let butter = Arc::new(CannabisIngredient::new(
//!     "Cannabis-Infused Butter",
//!     IngredientType::Butter,
//!     Decimal::TEN,
//!     None,
//!     coa,
//! )?);
//! let recipe = Recipe::new(
//!     "Brownies",
//!     RecipeCategory::Dessert,
//!     12,
//!     [(butter, Decimal::from(50))],
//! )?;
//! let dosage = recipe.calculate_total_dosage()?;
//! println!("{}", dosage.display_label());
//! # Ok(())
//! # }
//! ```

pub mod coa;
pub mod config;
pub mod error;
pub mod ingredient;
pub mod metrics;
pub mod recipe;
pub mod terpene;

pub use coa::CoaReference;
pub use config::EngineConfig;
pub use error::{CdesError, Result};
pub use ingredient::{CannabisIngredient, IngredientForm, IngredientType};
pub use recipe::{
    AllergenType, DietaryRestriction, Difficulty, DosageCalculator, DosageInfo, ExperienceLevel,
    NutritionInfo, Recipe, RecipeCategory, RecipeIngredient, RecipeStep,
};
pub use terpene::{ConcentrationUnit, PairingPolicy, Terpene, TerpeneProfile};
