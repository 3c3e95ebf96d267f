//! Cannabis-based ingredient with a COA reference

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::{IngredientForm, IngredientType};
use crate::coa::CoaReference;
use crate::error::{CdesError, Result};
use crate::terpene::TerpeneProfile;

/// Storage range (°F) applied when none is recorded
pub const DEFAULT_STORAGE_TEMP_MIN_F: i32 = 60;
pub const DEFAULT_STORAGE_TEMP_MAX_F: i32 = 70;
pub const DEFAULT_SHELF_LIFE_DAYS: u32 = 365;

/// Cannabis ingredient with potency measured per gram.
///
/// Ingredients are immutable once built and are shared between recipes
/// through `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CannabisIngredient {
    pub id: Uuid,
    pub name: String,
    pub ingredient_type: IngredientType,
    pub form: IngredientForm,

    pub coa_reference: Arc<CoaReference>,
    pub terpene_profile: Option<Arc<TerpeneProfile>>,

    pub thc_mg_per_gram: Decimal,
    /// `None` when the certificate reports no CBD figure
    pub cbd_mg_per_gram: Option<Decimal>,

    // Activation
    pub is_decarboxylated: bool,
    pub decarb_temp_f: Option<u32>,
    pub decarb_time_minutes: Option<u32>,

    // Storage
    pub storage_temp_min_f: i32,
    pub storage_temp_max_f: i32,
    pub shelf_life_days: u32,
    pub light_sensitive: bool,

    // Sourcing
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub lot_number: Option<String>,
    pub received_date: Option<NaiveDate>,
}

impl CannabisIngredient {
    /// Create an ingredient; its form defaults to the type's usual form.
    ///
    /// # Errors
    ///
    /// Returns `CdesError::InvalidIngredient` if the name is empty or a
    /// potency value is negative.
    pub fn new(
        name: impl Into<String>,
        ingredient_type: IngredientType,
        thc_mg_per_gram: Decimal,
        cbd_mg_per_gram: Option<Decimal>,
        coa_reference: Arc<CoaReference>,
    ) -> Result<Self> {
        let ingredient = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ingredient_type,
            form: ingredient_type.default_form(),
            coa_reference,
            terpene_profile: None,
            thc_mg_per_gram,
            cbd_mg_per_gram,
            is_decarboxylated: true,
            decarb_temp_f: None,
            decarb_time_minutes: None,
            storage_temp_min_f: DEFAULT_STORAGE_TEMP_MIN_F,
            storage_temp_max_f: DEFAULT_STORAGE_TEMP_MAX_F,
            shelf_life_days: DEFAULT_SHELF_LIFE_DAYS,
            light_sensitive: true,
            supplier_id: None,
            supplier_name: None,
            lot_number: None,
            received_date: None,
        };
        ingredient.validate()?;
        Ok(ingredient)
    }

    #[must_use]
    pub fn with_form(mut self, form: IngredientForm) -> Self {
        self.form = form;
        self
    }

    #[must_use]
    pub fn with_terpene_profile(mut self, profile: Arc<TerpeneProfile>) -> Self {
        self.terpene_profile = Some(profile);
        self
    }

    /// Record decarboxylation temperature (°F) and time (minutes).
    #[must_use]
    pub fn with_decarboxylation(mut self, temp_f: u32, time_minutes: u32) -> Self {
        self.is_decarboxylated = true;
        self.decarb_temp_f = Some(temp_f);
        self.decarb_time_minutes = Some(time_minutes);
        self
    }

    /// Mark the ingredient as not yet activated.
    #[must_use]
    pub fn raw(mut self) -> Self {
        self.is_decarboxylated = false;
        self.decarb_temp_f = None;
        self.decarb_time_minutes = None;
        self
    }

    #[must_use]
    pub fn with_lot_number(mut self, lot_number: impl Into<String>) -> Self {
        self.lot_number = Some(lot_number.into());
        self
    }

    /// Record storage conditions.
    ///
    /// # Errors
    ///
    /// Returns `CdesError::InvalidIngredient` if `temp_min_f` is above
    /// `temp_max_f`.
    pub fn with_storage(
        mut self,
        temp_min_f: i32,
        temp_max_f: i32,
        shelf_life_days: u32,
        light_sensitive: bool,
    ) -> Result<Self> {
        self.storage_temp_min_f = temp_min_f;
        self.storage_temp_max_f = temp_max_f;
        self.shelf_life_days = shelf_life_days;
        self.light_sensitive = light_sensitive;
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_supplier(
        mut self,
        supplier_id: impl Into<String>,
        supplier_name: impl Into<String>,
    ) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self.supplier_name = Some(supplier_name.into());
        self
    }

    #[must_use]
    pub fn with_received_date(mut self, received_date: NaiveDate) -> Self {
        self.received_date = Some(received_date);
        self
    }

    /// Last usable day: received date plus shelf life.
    ///
    /// `None` when no received date is recorded or the date is out of range.
    pub fn best_before(&self) -> Option<NaiveDate> {
        self.received_date?
            .checked_add_days(Days::new(u64::from(self.shelf_life_days)))
    }

    /// Whether the shelf life has run out by `on`; unknown dates never expire.
    pub fn is_past_shelf_life(&self, on: NaiveDate) -> bool {
        self.best_before().is_some_and(|last_day| on > last_day)
    }

    /// Whether `temp_f` lies within the storage range (inclusive)
    pub fn storage_temp_ok(&self, temp_f: i32) -> bool {
        (self.storage_temp_min_f..=self.storage_temp_max_f).contains(&temp_f)
    }

    /// Check name, potency and storage invariants.
    ///
    /// # Errors
    ///
    /// Returns `CdesError::InvalidIngredient` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }
        if self.thc_mg_per_gram < Decimal::ZERO {
            return Err(self.invalid(format!(
                "thc_mg_per_gram must be non-negative, got {}",
                self.thc_mg_per_gram
            )));
        }
        if let Some(cbd) = self.cbd_mg_per_gram {
            if cbd < Decimal::ZERO {
                return Err(self.invalid(format!(
                    "cbd_mg_per_gram must be non-negative, got {cbd}"
                )));
            }
        }
        if self.storage_temp_min_f > self.storage_temp_max_f {
            return Err(self.invalid(format!(
                "storage range is inverted ({} °F > {} °F)",
                self.storage_temp_min_f, self.storage_temp_max_f
            )));
        }
        Ok(())
    }

    /// THC (mg) contained in `grams` of this ingredient
    ///
    /// Returns `None` on decimal overflow.
    #[must_use]
    pub fn calculate_thc_dose(&self, grams: Decimal) -> Option<Decimal> {
        self.thc_mg_per_gram.checked_mul(grams)
    }

    /// CBD (mg) contained in `grams`; zero when no CBD potency is reported.
    ///
    /// Returns `None` on decimal overflow.
    #[must_use]
    pub fn calculate_cbd_dose(&self, grams: Decimal) -> Option<Decimal> {
        match self.cbd_mg_per_gram {
            Some(cbd) => cbd.checked_mul(grams),
            None => Some(Decimal::ZERO),
        }
    }

    pub(crate) fn invalid(&self, reason: impl Into<String>) -> CdesError {
        CdesError::InvalidIngredient {
            ingredient: self.name.clone(),
            reason: reason.into(),
        }
    }
}
