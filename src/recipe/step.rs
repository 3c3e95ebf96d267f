//! Preparation steps of a recipe

use serde::{Deserialize, Serialize};

/// Cooking temperature (°F) above which cannabinoids start to degrade.
///
/// Steps hotter than this carry `max_temp_warning`.
pub const MAX_CANNABINOID_COOKING_TEMP_F: u32 = 340;

/// One numbered instruction in a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub step_number: u32,
    pub instruction: String,
    pub duration_minutes: Option<u32>,
    pub temperature_f: Option<u32>,
    pub tips: Option<String>,

    /// Temperature exceeds [`MAX_CANNABINOID_COOKING_TEMP_F`]
    pub max_temp_warning: bool,
    /// Step activates raw cannabis
    pub decarb_step: bool,
}

impl RecipeStep {
    #[must_use]
    pub fn new(step_number: u32, instruction: impl Into<String>) -> Self {
        Self {
            step_number,
            instruction: instruction.into(),
            duration_minutes: None,
            temperature_f: None,
            tips: None,
            max_temp_warning: false,
            decarb_step: false,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Set the step temperature and flag it if it is hot enough to degrade
    /// cannabinoids.
    #[must_use]
    pub fn with_temperature(mut self, temperature_f: u32) -> Self {
        self.temperature_f = Some(temperature_f);
        self.max_temp_warning = temperature_f > MAX_CANNABINOID_COOKING_TEMP_F;
        self
    }

    #[must_use]
    pub fn with_tips(mut self, tips: impl Into<String>) -> Self {
        self.tips = Some(tips.into());
        self
    }

    #[must_use]
    pub fn decarb(mut self) -> Self {
        self.decarb_step = true;
        self
    }
}
