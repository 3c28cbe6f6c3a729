//! Configuration management for the faucet claimer.

use crate::error::{ClaimerError, ClaimerResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Claim endpoint of the Humanity Protocol testnet faucet
pub const DEFAULT_ENDPOINT: &str = "https://faucet.testnet.humanity.org/api/claim";

/// Record file holding the stored address
pub const DEFAULT_ADDRESS_FILE: &str = "address.json";

/// Config file picked up automatically when present in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "faucet-claimer.toml";

const DEFAULT_INTERVAL_SECS: u64 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Prefix of environment variables read by [`ClaimerConfig::load`]
pub const ENV_PREFIX: &str = "CLAIMER";

/// Configuration for the faucet claimer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimerConfig {
    /// Faucet API configuration
    pub faucet: FaucetConfig,

    /// Local address record configuration
    pub storage: StorageConfig,

    /// Claim schedule configuration
    pub schedule: ScheduleConfig,
}

/// Faucet API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaucetConfig {
    /// URL the claim request is POSTed to
    pub endpoint: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Local address record configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON record holding the address
    pub address_file: PathBuf,
}

/// Claim schedule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds to wait between claims
    pub interval_secs: u64,
}

impl Default for ClaimerConfig {
    fn default() -> Self {
        Self {
            faucet: FaucetConfig {
                endpoint: DEFAULT_ENDPOINT.to_string(),
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            storage: StorageConfig {
                address_file: PathBuf::from(DEFAULT_ADDRESS_FILE),
            },
            schedule: ScheduleConfig {
                interval_secs: DEFAULT_INTERVAL_SECS,
            },
        }
    }
}

impl ClaimerConfig {
    /// Build the configuration from defaults, an optional TOML file and
    /// `CLAIMER_*` environment variables, in increasing precedence.
    ///
    /// Nested keys use `__` as separator, e.g. `CLAIMER_SCHEDULE__INTERVAL_SECS`.
    pub fn load(path: Option<&Path>) -> ClaimerResult<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    fn load_with_env_prefix(path: Option<&Path>, env_prefix: &str) -> ClaimerResult<Self> {
        let mut builder = config::Config::builder()
            .set_default("faucet.endpoint", DEFAULT_ENDPOINT)?
            .set_default(
                "faucet.request_timeout_secs",
                DEFAULT_REQUEST_TIMEOUT_SECS as i64,
            )?
            .set_default("storage.address_file", DEFAULT_ADDRESS_FILE)?
            .set_default("schedule.interval_secs", DEFAULT_INTERVAL_SECS as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path).format(config::FileFormat::Toml),
            );
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ClaimerResult<Self> {
        Self::load(Some(path.as_ref()))
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ClaimerResult<()> {
        let url = reqwest::Url::parse(&self.faucet.endpoint).map_err(|e| {
            ClaimerError::InvalidConfig(format!(
                "Faucet endpoint '{}' is not a valid URL: {}",
                self.faucet.endpoint, e
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClaimerError::InvalidConfig(format!(
                "Faucet endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.faucet.request_timeout_secs == 0 {
            return Err(ClaimerError::InvalidConfig(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.schedule.interval_secs == 0 {
            return Err(ClaimerError::InvalidConfig(
                "Claim interval must be greater than 0".to_string(),
            ));
        }

        if self.storage.address_file.as_os_str().is_empty() {
            return Err(ClaimerError::InvalidConfig(
                "Address file path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.schedule.interval_secs)
    }
}

impl FaucetConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
