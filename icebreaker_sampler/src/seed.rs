//! Seeds for reproducible sampling.
//!
//! A seed usually arrives as a URL/query parameter so that every viewer of a
//! link sees the same example set. Query parameters are numbers in the
//! JavaScript sense, so conversion follows the `ToUint32` rules: truncate
//! toward zero, then reduce modulo 2^32. Anything unusable falls back to a
//! fresh random seed; a bad seed is never fatal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{SamplerError, SamplerResult};

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Unsigned 32-bit seed. Not persisted; supplied per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(u32);

impl Seed {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Fresh, non-reproducible seed from the thread-local generator.
    pub fn random() -> Self {
        Self(rand::random())
    }

    /// `ToUint32` coercion of an arbitrary float. `None` for NaN/infinity.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // fmod on integral floats is exact, so this stays in [0, 2^32)
        let wrapped = value.trunc().rem_euclid(TWO_POW_32);
        Some(Self(wrapped as u32))
    }

    /// Like [`Seed::from_f64`], but values below 1 are read as a fraction of
    /// the 32-bit range (`0.5` becomes `2^31`). This is how the question feed
    /// turns a `Math.random()`-style seed into generator state.
    pub fn from_fraction(value: f64) -> Option<Self> {
        if value < 1.0 {
            Self::from_f64(value * TWO_POW_32)
        } else {
            Self::from_f64(value)
        }
    }

    /// Parses integer or float text.
    ///
    /// # Errors
    /// `SamplerError::InvalidSeed` when the text is not a finite number.
    pub fn parse(text: &str) -> SamplerResult<Self> {
        let trimmed = text.trim();
        if let Ok(value) = trimmed.parse::<u32>() {
            return Ok(Self(value));
        }
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(Self::from_f64)
            .ok_or_else(|| SamplerError::InvalidSeed(text.to_string()))
    }

    /// Seed for a request: the parsed parameter when usable, otherwise a
    /// random one.
    pub fn resolve(param: Option<&str>) -> Self {
        match param {
            None => {
                let seed = Self::random();
                debug!(seed = seed.0, "no seed supplied, using random seed");
                seed
            }
            Some(text) => match Self::parse(text) {
                Ok(seed) => seed,
                Err(err) => {
                    let seed = Self::random();
                    warn!(%err, seed = seed.0, "falling back to random seed");
                    seed
                }
            },
        }
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Seed {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
