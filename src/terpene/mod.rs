//! Terpene profiles and terpene-based food pairing.
//!
//! - [`Terpene`]: closed set of terpenes this crate knows pairings for
//! - [`TerpeneProfile`]: concentrations reported on a COA
//! - [`pairing`]: the static pairing table and the ranking policy

pub mod pairing;
pub mod profile;

pub use pairing::PairingPolicy;
pub use profile::{ConcentrationUnit, TerpeneProfile};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CdesError;

/// Terpenes recognized by the pairing table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terpene {
    Myrcene,
    Limonene,
    Caryophyllene,
    Pinene,
    Linalool,
    Humulene,
    Terpinolene,
    Ocimene,
}

impl Terpene {
    pub const ALL: [Terpene; 8] = [
        Terpene::Myrcene,
        Terpene::Limonene,
        Terpene::Caryophyllene,
        Terpene::Pinene,
        Terpene::Linalool,
        Terpene::Humulene,
        Terpene::Terpinolene,
        Terpene::Ocimene,
    ];

    /// Canonical lowercase name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Terpene::Myrcene => "myrcene",
            Terpene::Limonene => "limonene",
            Terpene::Caryophyllene => "caryophyllene",
            Terpene::Pinene => "pinene",
            Terpene::Linalool => "linalool",
            Terpene::Humulene => "humulene",
            Terpene::Terpinolene => "terpinolene",
            Terpene::Ocimene => "ocimene",
        }
    }

    /// Resolve a name as printed on a lab report.
    ///
    /// Matching ignores case and surrounding whitespace, and accepts the
    /// isomer prefixes labs commonly report (`beta-myrcene`, `d-limonene`,
    /// `alpha-pinene`, ...).
    #[must_use]
    pub fn from_lab_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let base = ["alpha-", "beta-", "d-", "(r)-", "a-", "b-", "β-", "α-"]
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix))
            .unwrap_or(&name);

        Terpene::ALL.into_iter().find(|t| t.as_str() == base)
    }
}

impl fmt::Display for Terpene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Terpene {
    type Err = CdesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Terpene::from_lab_name(s).ok_or_else(|| CdesError::UnknownTerpene(s.to_string()))
    }
}
