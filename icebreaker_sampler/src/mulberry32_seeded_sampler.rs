//! Mulberry32 Seeded Sampler
//!
//! # Purpose
//! Deterministic selection utility behind every "random" pick the app makes:
//! the style of the day, a tone, the handful of example questions shown on a
//! style page, and the order of the question feed. Given the same seed and the
//! same candidate list, every operation here yields the same result on every
//! platform and every run.
//!
//! # Project Context
//! The query layer previously carried its own inline copy of this generator in
//! each handler. This module is the single shared implementation. It keeps the
//! generator state as a plain `Copy` value that is threaded through each call,
//! so there is no global generator and two callers can never interleave draws
//! on one sequence.
//!
//! # ⚠️ CRITICAL LIMITATIONS ⚠️
//! - **NOT cryptographically secure** - seeds travel in URLs and are public
//! - **32-bit state** - period is 2^32 draws
//! - **Legacy shuffle is biased** - see [`shuffle`]; prefer [`fisher_yates`]
//!   wherever matching previously displayed orderings does not matter
//!
//! # Algorithm: Mulberry32
//! ```text
//! state = state + 0x6D2B79F5            (mod 2^32)
//! t = (state ^ state >>> 15) * (state | 1)
//! t ^= t + (t ^ t >>> 7) * (t | 61)
//! out = (t ^ t >>> 14) / 2^32
//! ```
//! All multiplications and additions wrap mod 2^32, matching `Math.imul`
//! and 32-bit integer coercion.

use std::fmt;
use std::str::FromStr;

use rand_core::{impls, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{SamplerError, SamplerResult};
use crate::legacy_comparator_sort::sort_indices;
use crate::seed::Seed;

/// Weyl-sequence increment added to the state before every draw.
pub const MULBERRY32_INCREMENT: u32 = 0x6D2B_79F5;

/// 2^32 as a float, the normaliser turning a `u32` output into `[0, 1)`.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Internal 32-bit accumulator advanced on each draw.
///
/// Owned by exactly one caller at a time. It is `Copy`, so "sharing" it only
/// ever produces an independent replay of the same sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorState(u32);

impl GeneratorState {
    /// Raw accumulator value, mainly for logging and replay tests.
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Initializes generator state directly from the seed (no whitening).
pub fn create(seed: u32) -> GeneratorState {
    GeneratorState(seed)
}

/// Advances the state and returns the mixed 32-bit output.
pub fn next_u32(state: GeneratorState) -> (u32, GeneratorState) {
    let advanced = state.0.wrapping_add(MULBERRY32_INCREMENT);

    let mut t = advanced;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));

    (t ^ (t >> 14), GeneratorState(advanced))
}

/// Draws one float in `[0.0, 1.0)`.
///
/// The division by 2^32 is exact in `f64`, so outputs match the reference
/// implementation bit for bit.
pub fn next(state: GeneratorState) -> (f64, GeneratorState) {
    let (value, state) = next_u32(state);
    (f64::from(value) / TWO_POW_32, state)
}

/// Maps one draw onto an index in `[0, len)` as `floor(draw * len)`.
///
/// # Errors
/// `SamplerError::EmptyCandidates` when `len == 0`. No draw is consumed in
/// that case, so the returned error leaves the caller's state untouched.
pub fn pick_index(state: GeneratorState, len: usize) -> SamplerResult<(usize, GeneratorState)> {
    if len == 0 {
        return Err(SamplerError::EmptyCandidates { kind: "candidates" });
    }

    let (draw, state) = next(state);
    Ok((scale_draw(draw, len), state))
}

/// `floor(draw * len)`, clamped so float rounding on very large lengths can
/// never yield `len` itself.
fn scale_draw(draw: f64, len: usize) -> usize {
    ((draw * len as f64) as usize).min(len - 1)
}

/// Which shuffle a sampling operation should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShuffleStrategy {
    /// `sort(() => 0.5 - rng())` ordering, kept for parity with orderings
    /// users have already seen (style example sets keyed by URL seed).
    #[default]
    LegacyComparator,
    /// Unbiased Durstenfeld shuffle over the same generator.
    FisherYates,
}

impl ShuffleStrategy {
    /// Applies this strategy to `list`.
    pub fn apply<T: Clone>(self, state: GeneratorState, list: &[T]) -> (Vec<T>, GeneratorState) {
        match self {
            Self::LegacyComparator => shuffle(state, list),
            Self::FisherYates => fisher_yates(state, list),
        }
    }
}

impl fmt::Display for ShuffleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyComparator => f.write_str("legacy-comparator"),
            Self::FisherYates => f.write_str("fisher-yates"),
        }
    }
}

impl FromStr for ShuffleStrategy {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy-comparator" | "legacy" => Ok(Self::LegacyComparator),
            "fisher-yates" | "fisher_yates" => Ok(Self::FisherYates),
            _ => Err(SamplerError::InvalidConfig {
                key: "shuffle_strategy",
                value: s.to_string(),
            }),
        }
    }
}

/// Legacy comparator shuffle (biased, kept for compatibility).
///
/// # Behaviour
/// Reproduces the order produced by sorting with a comparator that ignores
/// its arguments and returns `0.5 - draw`, as executed by the V8 engine's
/// TimSort, for every list length. Lists shorter than 64 entries are one
/// binary-insertion run; longer lists are split into runs and merged with
/// the engine's galloping merge. Each comparator call consumes exactly one
/// draw, so the returned state also matches the engine.
///
/// # Known Defect
/// Not a uniform permutation: later entries are far more likely to stay
/// near the end. Use [`fisher_yates`] when parity is not required.
pub fn shuffle<T: Clone>(state: GeneratorState, list: &[T]) -> (Vec<T>, GeneratorState) {
    let (order, state) = sort_indices(list.len(), state);
    (order.into_iter().map(|i| list[i].clone()).collect(), state)
}

/// Unbiased Fisher-Yates (Durstenfeld) shuffle driven by the same generator.
///
/// Walks from the last index down to 1, swapping each slot with
/// `floor(draw * (i + 1))`. This is the ordering used by the question feed.
pub fn fisher_yates<T: Clone>(state: GeneratorState, list: &[T]) -> (Vec<T>, GeneratorState) {
    let mut work = list.to_vec();
    let mut state = state;

    for i in (1..work.len()).rev() {
        let (draw, next_state) = next(state);
        state = next_state;
        work.swap(i, scale_draw(draw, i + 1));
    }

    (work, state)
}

/// Shuffles with `strategy`, then keeps the first `n` entries.
///
/// `n >= list.len()` returns the whole shuffled list.
pub fn sample_n<T: Clone>(
    state: GeneratorState,
    list: &[T],
    n: usize,
    strategy: ShuffleStrategy,
) -> (Vec<T>, GeneratorState) {
    let (mut shuffled, state) = strategy.apply(state, list);
    shuffled.truncate(n);
    (shuffled, state)
}

/// Method-style wrapper owning one [`GeneratorState`].
///
/// Build one per request, draw from it, drop it. It also implements
/// [`RngCore`] and [`SeedableRng`] so it can drive `rand` APIs while keeping
/// the mulberry32 sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededSampler {
    state: GeneratorState,
}

impl SeededSampler {
    /// Sampler starting at `seed`.
    pub fn with_seed(seed: u32) -> Self {
        Self {
            state: create(seed),
        }
    }

    /// Current generator state.
    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Draws one float in `[0.0, 1.0)`.
    pub fn next_f64(&mut self) -> f64 {
        let (draw, state) = next(self.state);
        self.state = state;
        draw
    }

    /// See [`pick_index`].
    pub fn pick_index(&mut self, len: usize) -> SamplerResult<usize> {
        let (index, state) = pick_index(self.state, len)?;
        self.state = state;
        Ok(index)
    }

    /// Picks a reference to one candidate.
    ///
    /// # Errors
    /// `SamplerError::EmptyCandidates` naming `kind` when `candidates` is
    /// empty.
    pub fn pick<'a, T>(&mut self, candidates: &'a [T], kind: &'static str) -> SamplerResult<&'a T> {
        let index = self
            .pick_index(candidates.len())
            .map_err(|_| SamplerError::EmptyCandidates { kind })?;
        Ok(&candidates[index])
    }

    /// See [`shuffle`].
    pub fn shuffle<T: Clone>(&mut self, list: &[T]) -> Vec<T> {
        let (shuffled, state) = shuffle(self.state, list);
        self.state = state;
        shuffled
    }

    /// See [`fisher_yates`].
    pub fn fisher_yates<T: Clone>(&mut self, list: &[T]) -> Vec<T> {
        let (shuffled, state) = fisher_yates(self.state, list);
        self.state = state;
        shuffled
    }

    /// See [`sample_n`].
    pub fn sample_n<T: Clone>(&mut self, list: &[T], n: usize, strategy: ShuffleStrategy) -> Vec<T> {
        let (sampled, state) = sample_n(self.state, list, n, strategy);
        self.state = state;
        sampled
    }
}

impl From<Seed> for SeededSampler {
    fn from(seed: Seed) -> Self {
        Self::with_seed(seed.value())
    }
}

impl RngCore for SeededSampler {
    fn next_u32(&mut self) -> u32 {
        let (value, state) = next_u32(self.state);
        self.state = state;
        value
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededSampler {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::with_seed(u32::from_le_bytes(seed))
    }
}

// ============================================================================
// TESTING
// ============================================================================
