//! Terpene pairing engine
//!
//! Pairing suggestions come from [`PAIRING_TABLE`], a static mapping from
//! terpene to the foods its aroma is conventionally paired with. The table is
//! built once on first use and never mutated.
//!
//! ## Policy
//!
//! [`PairingPolicy`] makes the selection rules explicit:
//!
//! - **Significance**: a terpene contributes only if its concentration, in
//!   percent, is strictly greater than `min_concentration` (default `0`).
//! - **Dominance**: only the `top_n` strongest contributing terpenes are used
//!   (default `3`); `None` unions every significant terpene. Recognized
//!   terpenes with no pairings in the table never take a slot.
//! - **Strictness**: by default unknown terpene names are skipped; with
//!   `strict` set the first unknown name fails the call.
//!
//! Terpenes are ranked by descending concentration with ties broken by
//! terpene name, and suggestions are emitted in that order with duplicates
//! removed, so output is deterministic for a given profile.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::{Terpene, TerpeneProfile};
use crate::error::{CdesError, Result};

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Terpenes at or below this concentration (percent) are ignored
pub const DEFAULT_MIN_CONCENTRATION_PERCENT: Decimal = Decimal::ZERO;

/// Number of dominant terpenes that contribute suggestions by default
pub const DEFAULT_TOP_N: usize = 3;

const LIMONENE: &[&str] = &["citrus desserts", "seafood", "light salads"];
const MYRCENE: &[&str] = &["mangoes", "tropical fruits", "herbal dishes"];
const CARYOPHYLLENE: &[&str] = &["black pepper", "spicy foods", "dark chocolate"];
const PINENE: &[&str] = &["herbal dishes", "pine-forward cocktails", "rosemary", "pine nuts"];
const LINALOOL: &[&str] = &["lavender desserts", "floral teas", "honey"];
// Recognized on lab reports, no established pairings yet
const NONE: &[&str] = &[];

/// Terpene -> pairing suggestions, in presentation order.
pub static PAIRING_TABLE: Lazy<HashMap<Terpene, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        (Terpene::Limonene, LIMONENE),
        (Terpene::Myrcene, MYRCENE),
        (Terpene::Caryophyllene, CARYOPHYLLENE),
        (Terpene::Pinene, PINENE),
        (Terpene::Linalool, LINALOOL),
        (Terpene::Humulene, NONE),
        (Terpene::Terpinolene, NONE),
        (Terpene::Ocimene, NONE),
    ])
});

/// Suggestions for a single terpene; empty when the table has none
pub fn pairings_for(terpene: Terpene) -> &'static [&'static str] {
    PAIRING_TABLE.get(&terpene).copied().unwrap_or(NONE)
}

/// Selection rules for [`suggest_pairings`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingPolicy {
    /// Minimum concentration in percent; a terpene must exceed it to count
    pub min_concentration: Decimal,
    /// Maximum number of contributing terpenes; `None` means unlimited
    pub top_n: Option<usize>,
    /// Fail on terpene names missing from the pairing table
    pub strict: bool,
}

impl Default for PairingPolicy {
    fn default() -> Self {
        Self {
            min_concentration: DEFAULT_MIN_CONCENTRATION_PERCENT,
            top_n: Some(DEFAULT_TOP_N),
            strict: false,
        }
    }
}

impl PairingPolicy {
    /// Default policy with strict terpene lookup
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Union pairings from every significant terpene
    #[must_use]
    pub fn unlimited(mut self) -> Self {
        self.top_n = None;
        self
    }
}

/// Rank the contributing terpenes of `profile`, strongest first.
///
/// # Errors
///
/// Returns `CdesError::UnknownTerpene` when `policy.strict` is set and the
/// profile reports a name that is not in the pairing table, and
/// `CdesError::InvalidProfile` when a concentration is negative or the summed
/// isomers overflow.
pub fn rank_terpenes(
    profile: &TerpeneProfile,
    policy: &PairingPolicy,
) -> Result<Vec<(Terpene, Decimal)>> {
    let percentages = profile.terpene_percentages()?;

    for unknown in profile.unknown_terpenes() {
        if policy.strict {
            return Err(CdesError::UnknownTerpene(unknown.to_string()));
        }
        log::trace!("ignoring unrecognized terpene '{}'", unknown);
    }

    let mut ranked: Vec<(Terpene, Decimal)> = percentages
        .into_iter()
        .filter(|(_, percent)| *percent > policy.min_concentration)
        .filter(|(terpene, _)| !pairings_for(*terpene).is_empty())
        .collect();

    ranked.sort_by(|(a_terpene, a_percent), (b_terpene, b_percent)| {
        match b_percent.cmp(a_percent) {
            Ordering::Equal => a_terpene.as_str().cmp(b_terpene.as_str()),
            other => other,
        }
    });

    if let Some(top_n) = policy.top_n {
        ranked.truncate(top_n);
    }

    Ok(ranked)
}

/// Suggest food pairings for `profile` under `policy`.
///
/// # Errors
///
/// Returns `CdesError::UnknownTerpene` in strict mode for names missing from
/// the pairing table, and `CdesError::InvalidProfile` for a profile whose
/// concentrations are negative or out of range.
pub fn suggest_pairings(profile: &TerpeneProfile, policy: &PairingPolicy) -> Result<Vec<String>> {
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::suggest_pairings_span(&profile.coa_reference().coa_id).entered();

    #[cfg(feature = "metrics")]
    METRICS.record_pairing_request();

    let ranked = rank_terpenes(profile, policy)?;

    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();
    for (terpene, _) in &ranked {
        for suggestion in pairings_for(*terpene) {
            if seen.insert(*suggestion) {
                suggestions.push((*suggestion).to_string());
            }
        }
    }

    log::debug!(
        "{} pairing suggestion(s) from {} dominant terpene(s) for COA {}",
        suggestions.len(),
        ranked.len(),
        profile.coa_reference().coa_id
    );

    Ok(suggestions)
}
