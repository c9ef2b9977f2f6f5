//! Deterministic seeded sampling for the icebreaker question service.
//!
//! The generator lives in [`mulberry32_seeded_sampler`]; [`seed`] turns
//! request parameters into seeds; [`selection`] holds the handler-facing
//! helpers built on both.

pub mod config;
pub mod error;
mod legacy_comparator_sort;
pub mod mulberry32_seeded_sampler;
pub mod seed;
pub mod selection;

pub use config::SamplerConfig;
pub use error::{SamplerError, SamplerResult};
pub use mulberry32_seeded_sampler::{
    create, fisher_yates, next, next_u32, pick_index, sample_n, shuffle, GeneratorState,
    SeededSampler, ShuffleStrategy,
};
pub use seed::Seed;
pub use selection::{order_feed, pick_by_fraction, pick_one, pick_visible, sample_examples};
