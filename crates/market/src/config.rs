//! Marketplace configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MARKET_DATA_DIR` - Directory for the file store (default: `.secondhand`)
//! - `MARKET_AVATAR_URL_TEMPLATE` - Default avatar URL; `{username}` is replaced
//!   with the new user's name
//! - `MARKET_ARGON2_MEMORY_KIB` - Argon2 memory cost in KiB (default: 19456)
//! - `MARKET_ARGON2_ITERATIONS` - Argon2 time cost (default: 2)
//! - `MARKET_ARGON2_PARALLELISM` - Argon2 lanes (default: 1)

use std::path::PathBuf;

use thiserror::Error;

/// Default avatar for new accounts.
pub const DEFAULT_AVATAR_URL_TEMPLATE: &str =
    "https://api.dicebear.com/7.x/initials/svg?seed={username}";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid password hashing parameters: {0}")]
    InvalidHashing(String),
}

/// Marketplace configuration.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Directory holding the file store
    pub data_dir: PathBuf,
    /// Avatar URL for new accounts, with a `{username}` placeholder
    pub avatar_url_template: String,
    /// Password hashing cost
    pub hashing: HashingConfig,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl HashingConfig {
    /// The cheapest parameters Argon2 accepts. For tests and demo data only.
    #[must_use]
    pub const fn minimal() -> Self {
        Self {
            memory_kib: argon2::Params::MIN_M_COST,
            iterations: argon2::Params::MIN_T_COST,
            parallelism: argon2::Params::MIN_P_COST,
        }
    }

    /// Build Argon2 parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHashing` if Argon2 rejects the values.
    pub fn params(&self) -> Result<argon2::Params, ConfigError> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| ConfigError::InvalidHashing(e.to_string()))
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".secondhand"),
            avatar_url_template: DEFAULT_AVATAR_URL_TEMPLATE.to_owned(),
            hashing: HashingConfig::default(),
        }
    }
}

impl MarketConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        let data_dir = get_optional_env("MARKET_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let avatar_url_template = get_optional_env("MARKET_AVATAR_URL_TEMPLATE")
            .unwrap_or(defaults.avatar_url_template);

        let hashing = HashingConfig {
            memory_kib: get_parsed_env("MARKET_ARGON2_MEMORY_KIB", defaults.hashing.memory_kib)?,
            iterations: get_parsed_env("MARKET_ARGON2_ITERATIONS", defaults.hashing.iterations)?,
            parallelism: get_parsed_env(
                "MARKET_ARGON2_PARALLELISM",
                defaults.hashing.parallelism,
            )?,
        };
        hashing.params()?;

        Ok(Self {
            data_dir,
            avatar_url_template,
            hashing,
        })
    }

    /// Configuration for tests: cheap hashing, default avatar.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            hashing: HashingConfig::minimal(),
            ..Self::default()
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get and parse an environment variable, falling back to `default` when unset.
fn get_parsed_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hashing_is_valid() {
        assert!(HashingConfig::default().params().is_ok());
        assert!(HashingConfig::minimal().params().is_ok());
    }

    #[test]
    fn test_invalid_hashing_rejected() {
        let hashing = HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(matches!(
            hashing.params(),
            Err(ConfigError::InvalidHashing(_))
        ));
    }

    #[test]
    fn test_get_parsed_env_unset_uses_default() {
        let value: u32 = get_parsed_env("MARKET_TEST_SURELY_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_for_tests_uses_minimal_hashing() {
        let config = MarketConfig::for_tests();
        assert_eq!(config.hashing, HashingConfig::minimal());
        assert_eq!(config.data_dir, PathBuf::from(".secondhand"));
    }
}
