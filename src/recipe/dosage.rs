//! Dosage calculation engine
//!
//! All arithmetic uses `rust_decimal::Decimal`: potency × mass is summed
//! exactly and the per-serving division keeps full decimal precision. Values
//! are only rounded by the presentation helpers on [`DosageInfo`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{check_quantity, Recipe};
use crate::error::{CdesError, Result};

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Per-serving THC (mg) above which a dosage is flagged as high.
///
/// Matches the common single-serving edible guideline.
pub const DEFAULT_HIGH_DOSE_THRESHOLD_MG: Decimal = Decimal::TEN;

/// Per-serving THC (mg) at or below which a dosage is suitable for beginners
pub const DEFAULT_BEGINNER_MAX_THC_MG: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Decimal places used by [`DosageInfo::display_label`]
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Typical edible onset window, in minutes
pub const DEFAULT_ONSET_TIME_MINUTES: u32 = 60;
/// Typical duration of effects, in hours
pub const DEFAULT_DURATION_HOURS: u32 = 6;

/// Consumer experience a serving is suited to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Regular,
    Experienced,
}

impl ExperienceLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Regular => "regular",
            ExperienceLevel::Experienced => "experienced",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "regular" => Ok(ExperienceLevel::Regular),
            "experienced" => Ok(ExperienceLevel::Experienced),
            other => Err(format!("unknown experience level: {other}")),
        }
    }
}

/// Cannabis dosage for a recipe and for one serving of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DosageInfo {
    pub total_thc_mg: Decimal,
    pub total_cbd_mg: Decimal,
    pub per_serving_thc_mg: Decimal,
    pub per_serving_cbd_mg: Decimal,
    pub servings: u32,
    /// Per-serving THC exceeds the calculator's threshold
    pub high_dose_warning: bool,
    pub onset_time_minutes: u32,
    pub duration_hours: u32,
    pub recommended_for: ExperienceLevel,
}

impl DosageInfo {
    /// Copy with every mg value rounded to `dp` places (midpoint away from zero).
    ///
    /// Intended for display only; `high_dose_warning` is carried over from
    /// the full-precision calculation.
    #[must_use]
    pub fn rounded(&self, dp: u32) -> Self {
        let round = |value: Decimal| {
            value
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
                .normalize()
        };
        Self {
            total_thc_mg: round(self.total_thc_mg),
            total_cbd_mg: round(self.total_cbd_mg),
            per_serving_thc_mg: round(self.per_serving_thc_mg),
            per_serving_cbd_mg: round(self.per_serving_cbd_mg),
            ..self.clone()
        }
    }

    /// Per-serving label for menus and packaging, e.g. `"10mg THC | 5mg CBD"`.
    #[must_use]
    pub fn display_label(&self) -> String {
        let shown = self.rounded(DISPLAY_DECIMAL_PLACES);
        format!(
            "{}mg THC | {}mg CBD",
            shown.per_serving_thc_mg, shown.per_serving_cbd_mg
        )
    }
}

/// Computes [`DosageInfo`] for recipes against a high-dose threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosageCalculator {
    high_dose_threshold_mg: Decimal,
    beginner_max_thc_mg: Decimal,
}

impl Default for DosageCalculator {
    fn default() -> Self {
        Self::with_threshold(DEFAULT_HIGH_DOSE_THRESHOLD_MG)
    }
}

impl DosageCalculator {
    #[must_use]
    pub fn with_threshold(high_dose_threshold_mg: Decimal) -> Self {
        Self {
            high_dose_threshold_mg,
            beginner_max_thc_mg: DEFAULT_BEGINNER_MAX_THC_MG,
        }
    }

    /// Override the per-serving THC ceiling for [`ExperienceLevel::Beginner`].
    #[must_use]
    pub fn with_beginner_limit(mut self, beginner_max_thc_mg: Decimal) -> Self {
        self.beginner_max_thc_mg = beginner_max_thc_mg;
        self
    }

    pub fn high_dose_threshold_mg(&self) -> Decimal {
        self.high_dose_threshold_mg
    }

    pub fn beginner_max_thc_mg(&self) -> Decimal {
        self.beginner_max_thc_mg
    }

    /// Audience for a serving with `per_serving_thc_mg`.
    ///
    /// Anything over the high-dose threshold is for experienced consumers,
    /// even when the beginner limit is configured higher.
    #[must_use]
    pub fn recommended_for(&self, per_serving_thc_mg: Decimal) -> ExperienceLevel {
        if per_serving_thc_mg > self.high_dose_threshold_mg {
            ExperienceLevel::Experienced
        } else if per_serving_thc_mg <= self.beginner_max_thc_mg {
            ExperienceLevel::Beginner
        } else {
            ExperienceLevel::Regular
        }
    }

    /// Calculate total and per-serving THC/CBD for `recipe`.
    ///
    /// The recipe is not modified. An empty ingredient list yields an
    /// all-zero dosage.
    ///
    /// # Errors
    ///
    /// - `CdesError::InvalidRecipe` if `servings` is zero
    /// - `CdesError::InvalidIngredient` if any quantity or potency is negative
    /// - `CdesError::DosageOverflow` if a product or sum leaves the decimal range
    pub fn calculate(&self, recipe: &Recipe) -> Result<DosageInfo> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::calculate_dosage_span(&recipe.name).entered();

        recipe.check_servings()?;

        let mut total_thc = Decimal::ZERO;
        let mut total_cbd = Decimal::ZERO;

        for line in &recipe.cannabis_ingredients {
            let ingredient = &line.ingredient;
            ingredient.validate()?;
            check_quantity(line)?;

            let overflow = || CdesError::DosageOverflow {
                ingredient: ingredient.name.clone(),
            };

            let thc = ingredient.calculate_thc_dose(line.grams).ok_or_else(overflow)?;
            let cbd = ingredient.calculate_cbd_dose(line.grams).ok_or_else(overflow)?;
            total_thc = total_thc.checked_add(thc).ok_or_else(overflow)?;
            total_cbd = total_cbd.checked_add(cbd).ok_or_else(overflow)?;
        }

        let servings = Decimal::from(recipe.servings);
        let per_serving_thc = total_thc / servings;
        let per_serving_cbd = total_cbd / servings;
        let high_dose_warning = per_serving_thc > self.high_dose_threshold_mg;

        if high_dose_warning {
            log::debug!(
                "recipe '{}' exceeds high-dose threshold: {} mg THC per serving > {} mg",
                recipe.name,
                per_serving_thc,
                self.high_dose_threshold_mg
            );
        }

        #[cfg(feature = "metrics")]
        METRICS.record_dosage_calculation(high_dose_warning);

        Ok(DosageInfo {
            total_thc_mg: total_thc,
            total_cbd_mg: total_cbd,
            per_serving_thc_mg: per_serving_thc,
            per_serving_cbd_mg: per_serving_cbd,
            servings: recipe.servings,
            high_dose_warning,
            onset_time_minutes: DEFAULT_ONSET_TIME_MINUTES,
            duration_hours: DEFAULT_DURATION_HOURS,
            recommended_for: self.recommended_for(per_serving_thc),
        })
    }
}
