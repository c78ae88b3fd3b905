//! Engine configuration and sample sizing policy.
//!
//! Handles loading configuration from TOML and environment variables. The
//! defaults reproduce the engine's reference constants exactly, so most
//! callers simply use [`EngineConfig::default`].
//!
//! # Examples
//!
//! ```rust
//! use parlay_core::types::RiskProfile;
//! use parlay_pricing::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     [sampling]
//!     balanced = 8000
//! "#).unwrap();
//!
//! assert_eq!(config.sampling.base_samples(RiskProfile::Balanced), 8000);
//! assert_eq!(config.sampling.samples_for(RiskProfile::Balanced, 2), 4000);
//! ```

use std::path::Path;
use std::str::FromStr;

use parlay_core::math::correlation::{JitterSchedule, DEFAULT_CORRELATION_BOUND};
use parlay_core::types::RiskProfile;
use serde::Deserialize;
use thiserror::Error;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "PARLAY_";

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A sample count is zero or the bounds are inverted.
    #[error("Invalid sample count for {name}: {value}")]
    InvalidSampleCount {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: usize,
    },

    /// A numeric parameter is outside its valid range.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the invalid value
        value: String,
    },

    /// Configuration file could not be read.
    #[error("Configuration file error: {0}")]
    FileError(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// An environment variable held an unparsable value.
    #[error("Environment variable error: {name}={value}")]
    EnvError {
        /// Variable name
        name: String,
        /// Raw value
        value: String,
    },
}

/// Sample-count sizing policy for correlated groups.
///
/// Base counts are selected by risk profile and scaled by group size:
///
/// | Group size | Samples |
/// |------------|---------|
/// | 2 | `max(base / 2, pair_floor)` |
/// | 3-4 | `base` |
/// | 5-8 | `1.5 x base` |
/// | 9+ | `2.0 x base` |
///
/// The result is clamped to `[min_samples, max_samples]`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SamplingPolicy {
    /// Base sample count for [`RiskProfile::Conservative`].
    pub conservative: usize,
    /// Base sample count for [`RiskProfile::Balanced`].
    pub balanced: usize,
    /// Base sample count for [`RiskProfile::Degen`].
    pub degen: usize,
    /// Minimum sample count for two-leg groups before clamping.
    pub pair_floor: usize,
    /// Overall lower bound.
    pub min_samples: usize,
    /// Overall upper bound.
    pub max_samples: usize,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            conservative: 40_000,
            balanced: 20_000,
            degen: 10_000,
            pair_floor: 2_000,
            min_samples: 500,
            max_samples: 50_000,
        }
    }
}

impl SamplingPolicy {
    /// Returns the base sample count for a risk profile.
    pub fn base_samples(&self, profile: RiskProfile) -> usize {
        match profile {
            RiskProfile::Conservative => self.conservative,
            RiskProfile::Balanced => self.balanced,
            RiskProfile::Degen => self.degen,
        }
    }

    /// Returns the number of simulation draws for a group of `group_size` legs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use parlay_core::types::RiskProfile;
    /// use parlay_pricing::config::SamplingPolicy;
    ///
    /// let policy = SamplingPolicy::default();
    /// assert_eq!(policy.samples_for(RiskProfile::Balanced, 2), 10_000);
    /// assert_eq!(policy.samples_for(RiskProfile::Balanced, 6), 30_000);
    /// assert_eq!(policy.samples_for(RiskProfile::Conservative, 12), 50_000);
    /// ```
    pub fn samples_for(&self, profile: RiskProfile, group_size: usize) -> usize {
        let base = self.base_samples(profile);
        let scaled = match group_size {
            0..=2 => (base / 2).max(self.pair_floor),
            3..=4 => base,
            5..=8 => base.saturating_add(base / 2),
            _ => base.saturating_mul(2),
        };
        scaled.clamp(self.min_samples, self.max_samples.max(self.min_samples))
    }

    /// Validates the policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("conservative", self.conservative),
            ("balanced", self.balanced),
            ("degen", self.degen),
            ("min_samples", self.min_samples),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidSampleCount { name, value });
            }
        }
        if self.max_samples < self.min_samples {
            return Err(ConfigError::InvalidSampleCount {
                name: "max_samples",
                value: self.max_samples,
            });
        }
        Ok(())
    }
}

/// Engine configuration.
///
/// # Fields
/// - `sampling`: Sample-count sizing policy
/// - `probability_epsilon`: Marginals are clamped to `[eps, 1 - eps]` before
///   the inverse normal CDF
/// - `correlation_bound`: Off-diagonal clamp applied by the sanitiser
/// - `jitter_initial`, `jitter_growth`, `max_factorisation_attempts`:
///   Cholesky jitter schedule
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample-count sizing policy.
    pub sampling: SamplingPolicy,
    /// Probability clamp before the quantile transform.
    pub probability_epsilon: f64,
    /// Off-diagonal correlation clamp.
    pub correlation_bound: f64,
    /// First diagonal jitter.
    pub jitter_initial: f64,
    /// Jitter multiplier per retry.
    pub jitter_growth: f64,
    /// Total factorisation attempts.
    pub max_factorisation_attempts: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let jitter = JitterSchedule::default();
        Self {
            sampling: SamplingPolicy::default(),
            probability_epsilon: 1e-6,
            correlation_bound: DEFAULT_CORRELATION_BOUND,
            jitter_initial: jitter.initial,
            jitter_growth: jitter.growth,
            max_factorisation_attempts: jitter.max_attempts,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Returns the Cholesky jitter schedule.
    pub fn jitter_schedule(&self) -> JitterSchedule {
        JitterSchedule {
            initial: self.jitter_initial,
            growth: self.jitter_growth,
            max_attempts: self.max_factorisation_attempts,
        }
    }

    /// Parses and validates a TOML document. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads defaults overridden by `PARLAY_*` environment variables.
    ///
    /// Recognised variables: `PARLAY_SAMPLES_CONSERVATIVE`,
    /// `PARLAY_SAMPLES_BALANCED`, `PARLAY_SAMPLES_DEGEN`,
    /// `PARLAY_SAMPLES_PAIR_FLOOR`, `PARLAY_SAMPLES_MIN`, `PARLAY_SAMPLES_MAX`,
    /// `PARLAY_PROBABILITY_EPSILON`, `PARLAY_CORRELATION_BOUND`,
    /// `PARLAY_JITTER_INITIAL`, `PARLAY_JITTER_GROWTH`,
    /// `PARLAY_MAX_FACTORISATION_ATTEMPTS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())?;
        Ok(config)
    }

    /// Applies overrides from a key lookup, then validates.
    ///
    /// Keys are the `PARLAY_*` variable names without the prefix.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_value(&lookup, "SAMPLES_CONSERVATIVE", &mut self.sampling.conservative)?;
        override_value(&lookup, "SAMPLES_BALANCED", &mut self.sampling.balanced)?;
        override_value(&lookup, "SAMPLES_DEGEN", &mut self.sampling.degen)?;
        override_value(&lookup, "SAMPLES_PAIR_FLOOR", &mut self.sampling.pair_floor)?;
        override_value(&lookup, "SAMPLES_MIN", &mut self.sampling.min_samples)?;
        override_value(&lookup, "SAMPLES_MAX", &mut self.sampling.max_samples)?;
        override_value(&lookup, "PROBABILITY_EPSILON", &mut self.probability_epsilon)?;
        override_value(&lookup, "CORRELATION_BOUND", &mut self.correlation_bound)?;
        override_value(&lookup, "JITTER_INITIAL", &mut self.jitter_initial)?;
        override_value(&lookup, "JITTER_GROWTH", &mut self.jitter_growth)?;
        override_value(
            &lookup,
            "MAX_FACTORISATION_ATTEMPTS",
            &mut self.max_factorisation_attempts,
        )?;
        self.validate()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sampling.validate()?;

        if !(self.probability_epsilon > 0.0 && self.probability_epsilon < 0.5) {
            return Err(ConfigError::InvalidParameter {
                name: "probability_epsilon",
                value: format!("{} must be in (0, 0.5)", self.probability_epsilon),
            });
        }
        if !(self.correlation_bound > 0.0 && self.correlation_bound < 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "correlation_bound",
                value: format!("{} must be in (0, 1)", self.correlation_bound),
            });
        }
        if !(self.jitter_initial > 0.0 && self.jitter_initial.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "jitter_initial",
                value: format!("{} must be positive", self.jitter_initial),
            });
        }
        if !(self.jitter_growth >= 1.0 && self.jitter_growth.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "jitter_growth",
                value: format!("{} must be at least 1", self.jitter_growth),
            });
        }
        if self.max_factorisation_attempts == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_factorisation_attempts",
                value: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn override_value<F, V>(lookup: &F, key: &str, target: &mut V) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    V: FromStr,
{
    if let Some(raw) = lookup(key) {
        *target = raw.trim().parse().map_err(|_| ConfigError::EnvError {
            name: format!("{ENV_PREFIX}{key}"),
            value: raw.clone(),
        })?;
    }
    Ok(())
}

/// Builder for [`EngineConfig`].
///
/// # Examples
///
/// ```rust
/// use parlay_core::types::RiskProfile;
/// use parlay_pricing::config::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .base_samples(RiskProfile::Degen, 4_000)
///     .max_samples(20_000)
///     .build()
///     .expect("valid config");
///
/// assert_eq!(config.sampling.samples_for(RiskProfile::Degen, 3), 4_000);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Sets the base sample count for one risk profile.
    pub fn base_samples(mut self, profile: RiskProfile, samples: usize) -> Self {
        match profile {
            RiskProfile::Conservative => self.config.sampling.conservative = samples,
            RiskProfile::Balanced => self.config.sampling.balanced = samples,
            RiskProfile::Degen => self.config.sampling.degen = samples,
        }
        self
    }

    /// Sets the two-leg group floor.
    pub fn pair_floor(mut self, samples: usize) -> Self {
        self.config.sampling.pair_floor = samples;
        self
    }

    /// Sets the overall lower sample bound.
    pub fn min_samples(mut self, samples: usize) -> Self {
        self.config.sampling.min_samples = samples;
        self
    }

    /// Sets the overall upper sample bound.
    pub fn max_samples(mut self, samples: usize) -> Self {
        self.config.sampling.max_samples = samples;
        self
    }

    /// Sets the probability clamp applied before the quantile transform.
    pub fn probability_epsilon(mut self, epsilon: f64) -> Self {
        self.config.probability_epsilon = epsilon;
        self
    }

    /// Sets the off-diagonal correlation clamp.
    pub fn correlation_bound(mut self, bound: f64) -> Self {
        self.config.correlation_bound = bound;
        self
    }

    /// Sets the Cholesky jitter schedule.
    pub fn jitter(mut self, schedule: JitterSchedule) -> Self {
        self.config.jitter_initial = schedule.initial;
        self.config.jitter_growth = schedule.growth;
        self.config.max_factorisation_attempts = schedule.max_attempts;
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
