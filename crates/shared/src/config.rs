//! Application configuration management.

use std::path::Path;

use serde::Deserialize;

use crate::types::Amount;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Settlement policy constants.
    #[serde(default)]
    pub settlement: SettlementPolicy,
    /// Report rendering configuration.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Policy constants for the settlement engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SettlementPolicy {
    /// Fixed surcharge total shared by the opted-in participants.
    #[serde(default = "default_surcharge_amount")]
    pub surcharge_amount: Amount,
    /// Minimum roster size for the surcharge to apply.
    #[serde(default = "default_surcharge_min_participants")]
    pub surcharge_min_participants: usize,
    /// Every owed item is rounded to a multiple of this unit.
    #[serde(default = "default_rounding_unit")]
    pub rounding_unit: Amount,
}

fn default_surcharge_amount() -> Amount {
    10_000
}

fn default_surcharge_min_participants() -> usize {
    6
}

fn default_rounding_unit() -> Amount {
    10
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            surcharge_amount: default_surcharge_amount(),
            surcharge_min_participants: default_surcharge_min_participants(),
            rounding_unit: default_rounding_unit(),
        }
    }
}

impl SettlementPolicy {
    /// Returns true if a roster of `roster_len` people may carry the surcharge.
    #[must_use]
    pub const fn surcharge_allowed(&self, roster_len: usize) -> bool {
        roster_len >= self.surcharge_min_participants
    }

    /// Checks the policy constants are usable by the engine.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first unusable constant.
    pub fn validate(&self) -> Result<(), String> {
        if self.surcharge_amount < 0 {
            return Err(format!(
                "surcharge_amount must not be negative, got {}",
                self.surcharge_amount
            ));
        }
        if self.rounding_unit <= 0 {
            return Err(format!(
                "rounding_unit must be positive, got {}",
                self.rounding_unit
            ));
        }
        if self.surcharge_min_participants == 0 {
            return Err("surcharge_min_participants must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Report rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Maximum number of validation issues listed before an ellipsis.
    #[serde(default = "default_max_listed_issues")]
    pub max_listed_issues: usize,
}

fn default_max_listed_issues() -> usize {
    10
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_listed_issues: default_max_listed_issues(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the settlement
    /// policy is unusable.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false));

        Self::finish(builder)
    }

    /// Loads configuration from an explicit file, still honouring environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// settlement policy is unusable.
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(config::File::from(path));

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix("DUTCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.settlement
            .validate()
            .map_err(config::ConfigError::Message)?;

        Ok(app)
    }
}
