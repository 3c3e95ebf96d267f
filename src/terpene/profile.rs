//! Terpene profile reported on a COA

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::pairing::{self, PairingPolicy};
use super::Terpene;
use crate::coa::CoaReference;
use crate::error::{CdesError, Result};

/// Unit the lab used for terpene concentrations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationUnit {
    #[default]
    Percent,
    MilligramsPerGram,
}

impl ConcentrationUnit {
    /// Convert a concentration in this unit to percent by mass (1 % = 10 mg/g).
    #[must_use]
    pub fn to_percent(self, value: Decimal) -> Decimal {
        match self {
            ConcentrationUnit::Percent => value,
            ConcentrationUnit::MilligramsPerGram => value / Decimal::TEN,
        }
    }
}

/// Terpene concentrations for a tested batch.
///
/// Keys are kept exactly as the lab reported them. Names that do not resolve
/// to a [`Terpene`] are retained for display but ignored by the pairing
/// engine unless a strict [`PairingPolicy`] is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerpeneProfile {
    coa_reference: Arc<CoaReference>,
    unit: ConcentrationUnit,
    concentrations: BTreeMap<String, Decimal>,
    primary_flavors: Vec<String>,
    aroma_notes: Vec<String>,
}

impl TerpeneProfile {
    /// Build a profile from `(terpene name, concentration)` pairs in percent.
    ///
    /// # Errors
    ///
    /// Returns `CdesError::InvalidProfile` if any concentration is negative.
    pub fn new<K, I>(coa_reference: Arc<CoaReference>, concentrations: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Decimal)>,
    {
        let profile = Self {
            coa_reference,
            unit: ConcentrationUnit::Percent,
            concentrations: concentrations
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
            primary_flavors: Vec::new(),
            aroma_notes: Vec::new(),
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check that every reported concentration is non-negative.
    ///
    /// Profiles that arrive through serde skip [`Self::new`], so the pairing
    /// engine calls this again before ranking.
    ///
    /// # Errors
    ///
    /// Returns `CdesError::InvalidProfile` naming the first negative entry.
    pub fn validate(&self) -> Result<()> {
        match self
            .concentrations
            .iter()
            .find(|(_, value)| **value < Decimal::ZERO)
        {
            Some((name, value)) => Err(CdesError::InvalidProfile(format!(
                "concentration for '{name}' is negative ({value})"
            ))),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: ConcentrationUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Attach descriptive flavor and aroma notes (e.g. "citrus", "pine").
    #[must_use]
    pub fn with_flavors<F, A>(mut self, primary_flavors: F, aroma_notes: A) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        self.primary_flavors = primary_flavors.into_iter().map(Into::into).collect();
        self.aroma_notes = aroma_notes.into_iter().map(Into::into).collect();
        self
    }

    pub fn coa_reference(&self) -> &Arc<CoaReference> {
        &self.coa_reference
    }

    pub fn unit(&self) -> ConcentrationUnit {
        self.unit
    }

    pub fn concentrations(&self) -> &BTreeMap<String, Decimal> {
        &self.concentrations
    }

    pub fn primary_flavors(&self) -> &[String] {
        &self.primary_flavors
    }

    pub fn aroma_notes(&self) -> &[String] {
        &self.aroma_notes
    }

    /// Concentration for a key exactly as reported
    pub fn concentration(&self, name: &str) -> Option<Decimal> {
        self.concentrations.get(name).copied()
    }

    /// Concentrations of recognized terpenes, in percent.
    ///
    /// Isomers reported separately (e.g. alpha- and beta-pinene) are summed
    /// into a single entry.
    ///
    /// # Errors
    ///
    /// Returns `CdesError::InvalidProfile` if an entry is negative or the
    /// summed isomers leave the decimal range.
    pub fn terpene_percentages(&self) -> Result<BTreeMap<Terpene, Decimal>> {
        self.validate()?;

        let mut totals: BTreeMap<Terpene, Decimal> = BTreeMap::new();
        for (name, value) in &self.concentrations {
            let Some(terpene) = Terpene::from_lab_name(name) else {
                continue;
            };
            let total = totals.entry(terpene).or_insert(Decimal::ZERO);
            *total = total
                .checked_add(self.unit.to_percent(*value))
                .ok_or_else(|| {
                    CdesError::InvalidProfile(format!(
                        "summed concentration for {terpene} is out of range"
                    ))
                })?;
        }
        Ok(totals)
    }

    /// Reported names that do not resolve to a known terpene
    pub fn unknown_terpenes(&self) -> impl Iterator<Item = &str> {
        self.concentrations
            .keys()
            .filter(|name| Terpene::from_lab_name(name).is_none())
            .map(String::as_str)
    }

    /// Terpenes that drive pairing under `policy`, strongest first.
    ///
    /// # Errors
    ///
    /// Returns `CdesError::UnknownTerpene` in strict mode when a reported name
    /// is not in the pairing table, and `CdesError::InvalidProfile` for
    /// negative or out-of-range concentrations.
    pub fn dominant_terpenes(&self, policy: &PairingPolicy) -> Result<Vec<(Terpene, Decimal)>> {
        pairing::rank_terpenes(self, policy)
    }

    /// Suggest food pairings using the default [`PairingPolicy`].
    ///
    /// # Errors
    ///
    /// Fails only on an invalid profile under the default policy; see
    /// [`Self::suggest_pairings_with`].
    pub fn suggest_pairings(&self) -> Result<Vec<String>> {
        self.suggest_pairings_with(&PairingPolicy::default())
    }

    /// Suggest food pairings under an explicit policy.
    ///
    /// # Errors
    ///
    /// Returns `CdesError::UnknownTerpene` when `policy.strict` is set and a
    /// reported name is not in the pairing table, and
    /// `CdesError::InvalidProfile` for negative or out-of-range concentrations.
    pub fn suggest_pairings_with(&self, policy: &PairingPolicy) -> Result<Vec<String>> {
        pairing::suggest_pairings(self, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coa() -> Arc<CoaReference> {
        Arc::new(CoaReference::new("COA-7", "B-7", "Super Lemon Haze").unwrap())
    }

    #[test]
    fn test_new_keeps_reported_names() {
        let profile = TerpeneProfile::new(
            coa(),
            [("d-Limonene", Decimal::new(8, 1)), ("bisabolol", Decimal::new(1, 1))],
        )
        .unwrap();

        assert_eq!(profile.concentration("d-Limonene"), Some(Decimal::new(8, 1)));
        assert_eq!(profile.concentration("limonene"), None);
        assert_eq!(profile.unknown_terpenes().collect::<Vec<_>>(), vec!["bisabolol"]);
        assert_eq!(profile.unit(), ConcentrationUnit::Percent);
        assert_eq!(profile.coa_reference().strain_name, "Super Lemon Haze");
    }

    #[test]
    fn test_negative_concentration_rejected() {
        let err = TerpeneProfile::new(coa(), [("myrcene", Decimal::new(-1, 2))]).unwrap_err();
        assert!(matches!(err, CdesError::InvalidProfile(_)));
    }

    #[test]
    fn test_zero_concentration_allowed() {
        let profile = TerpeneProfile::new(coa(), [("myrcene", Decimal::ZERO)]);
        assert!(profile.is_ok());
    }

    #[test]
    fn test_isomers_are_summed() {
        let profile = TerpeneProfile::new(
            coa(),
            [
                ("alpha-Pinene", Decimal::new(2, 1)),
                ("beta-Pinene", Decimal::new(15, 2)),
                ("linalool", Decimal::new(1, 1)),
            ],
        )
        .unwrap();

        let totals = profile.terpene_percentages().unwrap();
        assert_eq!(totals.get(&Terpene::Pinene), Some(&Decimal::new(35, 2)));
        assert_eq!(totals.get(&Terpene::Linalool), Some(&Decimal::new(1, 1)));
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn test_milligrams_per_gram_normalized() {
        let profile = TerpeneProfile::new(coa(), [("myrcene", Decimal::from(8))])
            .unwrap()
            .with_unit(ConcentrationUnit::MilligramsPerGram);

        assert_eq!(
            profile.terpene_percentages().unwrap().get(&Terpene::Myrcene),
            Some(&Decimal::new(8, 1))
        );
    }

    #[test]
    fn test_isomer_sum_out_of_range_is_rejected() {
        let profile = TerpeneProfile::new(
            coa(),
            [("alpha-pinene", Decimal::MAX), ("beta-pinene", Decimal::MAX)],
        )
        .unwrap();

        assert!(matches!(
            profile.terpene_percentages(),
            Err(CdesError::InvalidProfile(_))
        ));
        assert!(matches!(
            profile.suggest_pairings(),
            Err(CdesError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_deserialized_negative_concentration_rejected() {
        let valid = TerpeneProfile::new(
            coa(),
            [("alpha-pinene", Decimal::ONE), ("beta-pinene", Decimal::ONE)],
        )
        .unwrap();
        let mut json = serde_json::to_value(&valid).unwrap();
        json["concentrations"] = serde_json::json!({
            "alpha-pinene": "-0.5",
            "beta-pinene": "0.6",
        });
        let tampered: TerpeneProfile = serde_json::from_value(json).unwrap();

        assert!(matches!(tampered.validate(), Err(CdesError::InvalidProfile(_))));
        let err = tampered.suggest_pairings().unwrap_err();
        assert_eq!(
            err,
            CdesError::InvalidProfile(
                "concentration for 'alpha-pinene' is negative (-0.5)".to_string()
            )
        );
    }

    #[test]
    fn test_with_flavors() {
        let profile = TerpeneProfile::new(coa(), [("limonene", Decimal::ONE)])
            .unwrap()
            .with_flavors(["citrus", "sweet"], ["lemon zest"]);
        assert_eq!(profile.primary_flavors(), ["citrus", "sweet"]);
        assert_eq!(profile.aroma_notes(), ["lemon zest"]);
    }
}
