//! Error types for record construction and the dosage/pairing engines.
//!
//! Every error is raised synchronously by the call whose precondition was
//! violated. The only condition that is not reported is an unrecognized
//! terpene name under the default (non-strict) pairing policy.

use std::fmt;

/// Error type for CDES-FS operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdesError {
    /// Recipe cannot be dosed (e.g. zero servings)
    InvalidRecipe { recipe: String, reason: String },
    /// Negative potency or quantity on a cannabis ingredient
    InvalidIngredient { ingredient: String, reason: String },
    /// Terpene name missing from the pairing table (strict mode only)
    UnknownTerpene(String),
    /// COA reference with an empty identifying field
    InvalidCoaReference(String),
    /// Terpene profile with a negative or out-of-range concentration
    InvalidProfile(String),
    /// Decimal arithmetic exceeded the representable range
    DosageOverflow { ingredient: String },
}

impl fmt::Display for CdesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdesError::InvalidRecipe { recipe, reason } => {
                write!(f, "Invalid recipe '{recipe}': {reason}")
            }
            CdesError::InvalidIngredient { ingredient, reason } => {
                write!(f, "Invalid ingredient '{ingredient}': {reason}")
            }
            CdesError::UnknownTerpene(name) => {
                write!(f, "Unknown terpene: {name}")
            }
            CdesError::InvalidCoaReference(msg) => {
                write!(f, "Invalid COA reference: {msg}")
            }
            CdesError::InvalidProfile(msg) => {
                write!(f, "Invalid terpene profile: {msg}")
            }
            CdesError::DosageOverflow { ingredient } => {
                write!(
                    f,
                    "Dosage calculation overflowed while adding ingredient '{ingredient}'"
                )
            }
        }
    }
}

impl std::error::Error for CdesError {}

pub type Result<T> = std::result::Result<T, CdesError>;
