//! Certificate of Analysis references.
//!
//! A [`CoaReference`] ties an ingredient or terpene profile back to the lab
//! certificate for the tested batch. References are built once and shared
//! through `Arc`; nothing in this crate mutates them after construction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CdesError, Result};

/// Reference to a Certificate of Analysis issued for a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoaReference {
    /// Lab-issued certificate identifier
    pub coa_id: String,
    pub batch_number: String,
    pub strain_name: String,
    pub lab_name: Option<String>,
    pub test_date: Option<NaiveDate>,
    /// Link to the full certificate document
    pub coa_url: Option<String>,

    // Headline potency reported on the certificate
    pub thc_percentage: Decimal,
    pub cbd_percentage: Decimal,
    pub total_cannabinoids: Decimal,

    // Safety panel
    pub passed_microbial: bool,
    pub passed_pesticides: bool,
    pub passed_heavy_metals: bool,
    pub passed_residual_solvents: bool,

    pub harvest_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
}

impl CoaReference {
    /// Create a reference from the three identifying fields.
    ///
    /// # Errors
    ///
    /// Returns `CdesError::InvalidCoaReference` if any field is empty or
    /// whitespace only.
    pub fn new(
        coa_id: impl Into<String>,
        batch_number: impl Into<String>,
        strain_name: impl Into<String>,
    ) -> Result<Self> {
        let coa_id = coa_id.into();
        let batch_number = batch_number.into();
        let strain_name = strain_name.into();

        for (field, value) in [
            ("coa_id", &coa_id),
            ("batch_number", &batch_number),
            ("strain_name", &strain_name),
        ] {
            if value.trim().is_empty() {
                return Err(CdesError::InvalidCoaReference(format!(
                    "{field} must not be empty"
                )));
            }
        }

        Ok(Self {
            coa_id,
            batch_number,
            strain_name,
            lab_name: None,
            test_date: None,
            coa_url: None,
            thc_percentage: Decimal::ZERO,
            cbd_percentage: Decimal::ZERO,
            total_cannabinoids: Decimal::ZERO,
            passed_microbial: true,
            passed_pesticides: true,
            passed_heavy_metals: true,
            passed_residual_solvents: true,
            harvest_date: None,
            expiration_date: None,
        })
    }

    #[must_use]
    pub fn with_lab(mut self, lab_name: impl Into<String>, test_date: NaiveDate) -> Self {
        self.lab_name = Some(lab_name.into());
        self.test_date = Some(test_date);
        self
    }

    #[must_use]
    pub fn with_url(mut self, coa_url: impl Into<String>) -> Self {
        self.coa_url = Some(coa_url.into());
        self
    }

    /// Attach the headline potency figures printed on the certificate.
    #[must_use]
    pub fn with_potency(
        mut self,
        thc_percentage: Decimal,
        cbd_percentage: Decimal,
        total_cannabinoids: Decimal,
    ) -> Self {
        self.thc_percentage = thc_percentage;
        self.cbd_percentage = cbd_percentage;
        self.total_cannabinoids = total_cannabinoids;
        self
    }

    /// Record the safety panel results: microbial, pesticides, heavy metals,
    /// residual solvents (in that order).
    #[must_use]
    pub fn with_safety_results(
        mut self,
        microbial: bool,
        pesticides: bool,
        heavy_metals: bool,
        residual_solvents: bool,
    ) -> Self {
        self.passed_microbial = microbial;
        self.passed_pesticides = pesticides;
        self.passed_heavy_metals = heavy_metals;
        self.passed_residual_solvents = residual_solvents;
        self
    }

    #[must_use]
    pub fn with_dates(
        mut self,
        harvest_date: Option<NaiveDate>,
        expiration_date: Option<NaiveDate>,
    ) -> Self {
        self.harvest_date = harvest_date;
        self.expiration_date = expiration_date;
        self
    }

    /// True when every safety panel on the certificate passed
    #[must_use]
    pub fn passed_safety_testing(&self) -> bool {
        self.passed_microbial
            && self.passed_pesticides
            && self.passed_heavy_metals
            && self.passed_residual_solvents
    }

    /// Whether the batch is past its expiration date on `on`.
    ///
    /// A certificate without an expiration date never expires.
    #[must_use]
    pub fn is_expired(&self, on: NaiveDate) -> bool {
        self.expiration_date.is_some_and(|expires| on > expires)
    }
}
