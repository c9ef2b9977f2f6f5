//! Sampler configuration.
//!
//! Defaults match what the style page has always shown: three examples per
//! style, ordered by the legacy comparator shuffle. Both can be overridden
//! from the environment.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{SamplerError, SamplerResult};
use crate::mulberry32_seeded_sampler::ShuffleStrategy;

pub const MAX_EXAMPLES_ENV: &str = "MAX_EXAMPLES_PER_STYLE";
pub const SHUFFLE_STRATEGY_ENV: &str = "SAMPLER_SHUFFLE_STRATEGY";

pub const DEFAULT_MAX_EXAMPLES_PER_STYLE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Upper bound on example questions returned with a style.
    pub max_examples_per_style: usize,
    pub shuffle_strategy: ShuffleStrategy,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_examples_per_style: DEFAULT_MAX_EXAMPLES_PER_STYLE,
            shuffle_strategy: ShuffleStrategy::default(),
        }
    }
}

impl SamplerConfig {
    /// Defaults overlaid with environment overrides. Unparsable overrides are
    /// logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SamplerConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_EXAMPLES_ENV) {
            match parse_max_examples(&raw) {
                Ok(max) => config.max_examples_per_style = max,
                Err(err) => warn!(%err, "ignoring {}", MAX_EXAMPLES_ENV),
            }
        }

        if let Some(raw) = lookup(SHUFFLE_STRATEGY_ENV) {
            match raw.parse::<ShuffleStrategy>() {
                Ok(strategy) => config.shuffle_strategy = strategy,
                Err(err) => warn!(%err, "ignoring {}", SHUFFLE_STRATEGY_ENV),
            }
        }

        config
    }
}

fn parse_max_examples(raw: &str) -> SamplerResult<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| SamplerError::InvalidConfig {
            key: MAX_EXAMPLES_ENV,
            value: raw.to_string(),
        })
}
