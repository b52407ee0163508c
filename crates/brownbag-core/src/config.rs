//! Loader configuration.
//!
//! Configuration is layered: defaults, then a TOML file, then environment
//! overrides (`BROWNBAG_DELAY_MS`, `BROWNBAG_FAIL_ATTEMPTS`), then validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Default artificial latency applied before every terminal delivery.
pub const DEFAULT_DELAY_MS: u64 = 2_000;

/// Upper bound accepted by [`LoaderConfig::validate`].
pub const MAX_DELAY_MS: u64 = 60_000;

/// Environment variable overriding [`LoaderConfig::delay_ms`].
pub const ENV_DELAY_MS: &str = "BROWNBAG_DELAY_MS";

/// Environment variable overriding [`LoaderConfig::failure_schedule`].
pub const ENV_FAIL_ATTEMPTS: &str = "BROWNBAG_FAIL_ATTEMPTS";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file: {reason}")]
    Read {
        /// I/O error description
        reason: String,
    },
    /// The config file is not valid TOML for `LoaderConfig`
    #[error("Invalid TOML: {reason}")]
    Parse {
        /// Parser error description
        reason: String,
    },
    /// An environment override could not be parsed
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Variable name
        key: String,
        /// Raw value
        value: String,
    },
    /// `delay_ms` above [`MAX_DELAY_MS`]
    #[error("delay_ms {delay_ms} exceeds maximum of {max}ms")]
    DelayTooLong {
        /// Requested delay
        delay_ms: u64,
        /// Allowed maximum
        max: u64,
    },
    /// A failure schedule listed attempt 0
    #[error("failure schedule attempts are 1-based; 0 is not a valid attempt")]
    ZeroAttempt,
}

/// Which delivered attempts are forced to fail regardless of repository content.
///
/// Ordinals count only attempts that reached a terminal delivery through one
/// loader instance; cancelled attempts are not counted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureSchedule {
    /// Never inject a failure
    #[default]
    Never,
    /// Fail the first delivered attempt, succeed afterwards
    FirstAttempt,
    /// Fail exactly the listed 1-based attempt ordinals
    Attempts(BTreeSet<u64>),
}

impl FailureSchedule {
    /// Build a schedule failing the given 1-based ordinals.
    pub fn attempts(ordinals: impl IntoIterator<Item = u64>) -> Self {
        Self::Attempts(ordinals.into_iter().collect())
    }

    /// Whether the delivered attempt with this ordinal must fail.
    pub fn should_fail(&self, ordinal: u64) -> bool {
        match self {
            FailureSchedule::Never => false,
            FailureSchedule::FirstAttempt => ordinal == 1,
            FailureSchedule::Attempts(ordinals) => ordinals.contains(&ordinal),
        }
    }

    /// Parse the environment format: `never`, `first`, or `1,3,5`.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "never" => return Ok(FailureSchedule::Never),
            "first" => return Ok(FailureSchedule::FirstAttempt),
            _ => {}
        }

        let mut ordinals = BTreeSet::new();
        for part in trimmed.split(',') {
            let ordinal = part
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_FAIL_ATTEMPTS.to_string(),
                    value: value.to_string(),
                })?;
            ordinals.insert(ordinal);
        }
        Ok(FailureSchedule::Attempts(ordinals))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            FailureSchedule::Attempts(ordinals) if ordinals.contains(&0) => {
                Err(ConfigError::ZeroAttempt)
            }
            _ => Ok(()),
        }
    }
}

/// Content loader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Artificial latency before each terminal delivery
    pub delay_ms: u64,
    /// Failure-injection schedule owned by the loader instance
    pub failure_schedule: FailureSchedule,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            failure_schedule: FailureSchedule::Never,
        }
    }
}

impl LoaderConfig {
    /// Flaky-backend demo: the first attempt fails, later ones succeed.
    pub fn demo() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            failure_schedule: FailureSchedule::FirstAttempt,
        }
    }

    /// Zero-latency configuration for tests
    pub fn immediate() -> Self {
        Self {
            delay_ms: 0,
            failure_schedule: FailureSchedule::Never,
        }
    }

    /// Override the artificial delay
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Override the failure schedule
    pub fn with_failure_schedule(mut self, schedule: FailureSchedule) -> Self {
        self.failure_schedule = schedule;
        self
    }

    /// Parse a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LoaderConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Merge with process environment variables
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Merge with an explicit set of variables (same keys as the environment).
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                ENV_DELAY_MS => {
                    self.delay_ms =
                        value
                            .trim()
                            .parse()
                            .map_err(|_| ConfigError::InvalidValue {
                                key: key.to_string(),
                                value: value.to_string(),
                            })?;
                    tracing::debug!(delay_ms = self.delay_ms, "delay overridden from environment");
                }
                ENV_FAIL_ATTEMPTS => {
                    self.failure_schedule = FailureSchedule::parse(value)?;
                    tracing::debug!(schedule = ?self.failure_schedule, "failure schedule overridden from environment");
                }
                _ => {}
            }
        }
        self.validate()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::DelayTooLong {
                delay_ms: self.delay_ms,
                max: MAX_DELAY_MS,
            });
        }
        self.failure_schedule.validate()
    }
}
