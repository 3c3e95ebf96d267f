//! Engine configuration.
//!
//! Exposes [`EngineConfig`] so applications can tune the dosage threshold and
//! the pairing policy from `config/config.toml` (section `[engine]`) or from
//! `CDES_FS__ENGINE__*` environment variables using `EngineConfig::load()`.

use config::{Config, ConfigError, Environment, File, FileFormat};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::recipe::dosage::{
    DosageCalculator, DEFAULT_BEGINNER_MAX_THC_MG, DEFAULT_HIGH_DOSE_THRESHOLD_MG,
};
use crate::terpene::pairing::{
    PairingPolicy, DEFAULT_MIN_CONCENTRATION_PERCENT, DEFAULT_TOP_N,
};

const CONFIG_FILE: &str = "config/config.toml";
const ENV_PREFIX: &str = "CDES_FS";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Per-serving THC (mg) above which a dosage carries a high-dose warning
    #[serde(default = "default_high_dose_threshold_mg")]
    pub high_dose_threshold_mg: Decimal,
    /// Per-serving THC (mg) at or below which a dosage is recommended for beginners
    #[serde(default = "default_beginner_max_thc_mg")]
    pub beginner_max_thc_mg: Decimal,
    /// Terpenes at or below this concentration (percent) never contribute pairings
    #[serde(default = "default_pairing_min_concentration")]
    pub pairing_min_concentration: Decimal,
    /// Number of dominant terpenes that contribute pairings; 0 means all
    #[serde(default = "default_pairing_top_n")]
    pub pairing_top_n: usize,
    #[serde(default)]
    pub strict_terpenes: bool,
}

fn default_high_dose_threshold_mg() -> Decimal {
    DEFAULT_HIGH_DOSE_THRESHOLD_MG
}

fn default_beginner_max_thc_mg() -> Decimal {
    DEFAULT_BEGINNER_MAX_THC_MG
}

fn default_pairing_min_concentration() -> Decimal {
    DEFAULT_MIN_CONCENTRATION_PERCENT
}

fn default_pairing_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            high_dose_threshold_mg: default_high_dose_threshold_mg(),
            beginner_max_thc_mg: default_beginner_max_thc_mg(),
            pairing_min_concentration: default_pairing_min_concentration(),
            pairing_top_n: default_pairing_top_n(),
            strict_terpenes: false,
        }
    }
}

impl EngineConfig {
    /// Load the engine configuration from `config/config.toml`, falling back to env vars.
    ///
    /// A missing `[engine]` section yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if std::path::Path::new(CONFIG_FILE).exists() {
                    log::warn!(
                        "failed to load {}, falling back to env: {}",
                        CONFIG_FILE,
                        err
                    );
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, \
                             then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        Self::from_settings(&settings)
    }

    /// Parse a TOML document containing an `[engine]` section.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::from_settings(&settings)
    }

    fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        match settings.get::<EngineConfig>("engine") {
            Ok(cfg) => Ok(cfg),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Engine configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }

    #[must_use]
    pub fn dosage_calculator(&self) -> DosageCalculator {
        DosageCalculator::with_threshold(self.high_dose_threshold_mg)
            .with_beginner_limit(self.beginner_max_thc_mg)
    }

    #[must_use]
    pub fn pairing_policy(&self) -> PairingPolicy {
        PairingPolicy {
            min_concentration: self.pairing_min_concentration,
            top_n: (self.pairing_top_n > 0).then_some(self.pairing_top_n),
            strict: self.strict_terpenes,
        }
    }
}
