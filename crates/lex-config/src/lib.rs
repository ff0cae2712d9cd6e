//! # lex-config
//!
//! Layered configuration loading for Lexa using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LEXA_*` prefix, `__` as separator)
//! 2. Project-level `.lexa/config.toml`
//! 3. User-level `~/.config/lexa/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LEXA_STORES__LAKE_PATH` -> `stores.lake_path`,
//! `LEXA_LIMITS__PHRASE_LIMIT` -> `limits.phrase_limit`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use lex_config::LexConfig;
//!
//! let config = LexConfig::load_with_dotenv().expect("config");
//! println!("lake: {}", config.stores.lake_path);
//! ```

mod error;
mod limits;
mod render;
mod stores;

pub use error::ConfigError;
pub use limits::LimitsConfig;
pub use render::RenderConfig;
pub use stores::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LexConfig {
    #[serde(default)]
    pub stores: StoreConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl LexConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if a limit is zero.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".lexa/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("LEXA_").split("__"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.phrase_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.phrase_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.limits.link_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.link_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lexa").join("config.toml"))
    }
}
