//! Selection helpers used by the style, tone and question handlers.
//!
//! Each helper takes an already-fetched candidate list and a seed, and returns
//! what the handler sends back. None of them know where candidates come from.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::debug;

use crate::config::SamplerConfig;
use crate::error::{SamplerError, SamplerResult};
use crate::mulberry32_seeded_sampler::{self as sampler, SeededSampler};
use crate::seed::Seed;

/// One random candidate, e.g. the "random style" on the home page.
///
/// # Errors
/// `SamplerError::EmptyCandidates` naming `kind` when there is nothing to
/// choose from.
pub fn pick_one<'a, T>(candidates: &'a [T], seed: Seed, kind: &'static str) -> SamplerResult<&'a T> {
    let picked = SeededSampler::from(seed).pick(candidates, kind)?;
    debug!(%seed, kind, candidates = candidates.len(), "picked one");
    Ok(picked)
}

/// Drops candidates whose key is in `hidden`, then picks one of the rest.
///
/// Used for per-user picks where a user has hidden some styles or tones.
pub fn pick_visible<'a, T, K, F>(
    candidates: &'a [T],
    hidden: &HashSet<K>,
    key: F,
    seed: Seed,
    kind: &'static str,
) -> SamplerResult<&'a T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let visible: Vec<&T> = candidates.iter().filter(|c| !hidden.contains(&key(*c))).collect();
    if visible.is_empty() {
        return Err(SamplerError::EmptyCandidates { kind });
    }
    Ok(*pick_one(&visible, seed, kind)?)
}

/// Up to `config.max_examples_per_style` examples for a style page.
///
/// `None` when the style has no examples at all, so the caller can omit the
/// field instead of sending an empty list.
pub fn sample_examples<T: Clone>(examples: &[T], seed: Seed, config: &SamplerConfig) -> Option<Vec<T>> {
    if examples.is_empty() {
        return None;
    }
    let (sampled, _) = sampler::sample_n(
        sampler::create(seed.value()),
        examples,
        config.max_examples_per_style,
        config.shuffle_strategy,
    );
    Some(sampled)
}

/// Picks by the fractional part of `fraction`: `floor(frac * len)`.
///
/// Newsletter selection uses this with a `Math.random()`-style value instead
/// of a generator. A non-finite value is replaced by a random fraction.
pub fn pick_by_fraction<T>(candidates: &[T], fraction: f64) -> Option<&T> {
    if candidates.is_empty() {
        return None;
    }
    let fraction = if fraction.is_finite() {
        fraction
    } else {
        debug!(fraction, "non-finite fraction, drawing a random one");
        rand::random::<f64>()
    };
    let normalized = fraction - fraction.floor();
    let index = ((normalized * candidates.len() as f64) as usize).min(candidates.len() - 1);
    candidates.get(index)
}

/// Orders a question feed with the unbiased shuffle and keeps `count`.
///
/// `seed` is read with [`Seed::from_fraction`]; an unusable value falls back
/// to a random seed.
pub fn order_feed<T: Clone>(candidates: &[T], seed: f64, count: usize) -> Vec<T> {
    let seed = Seed::from_fraction(seed).unwrap_or_else(|| {
        let fallback = Seed::random();
        debug!(%fallback, "unusable feed seed, using random seed");
        fallback
    });
    let (mut ordered, _) = sampler::fisher_yates(sampler::create(seed.value()), candidates);
    ordered.truncate(count);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mulberry32_seeded_sampler::ShuffleStrategy;

    #[derive(Debug, Clone, PartialEq)]
    struct Style {
        id: u32,
        name: &'static str,
    }

    fn styles() -> Vec<Style> {
        vec![
            Style { id: 1, name: "icebreaker" },
            Style { id: 2, name: "deep" },
            Style { id: 3, name: "silly" },
        ]
    }

    // ===========================================
    // Test: pick_one
    // ===========================================
    #[test]
    fn test_pick_one_reproducible() {
        let styles = styles();
        let a = pick_one(&styles, Seed::new(7), "styles").unwrap();
        let b = pick_one(&styles, Seed::new(7), "styles").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.name, "icebreaker");
    }

    #[test]
    fn test_pick_one_empty() {
        let none: Vec<Style> = Vec::new();
        let err = pick_one(&none, Seed::new(7), "styles").unwrap_err();
        assert_eq!(err.to_string(), "SAMPLER empty collection: no styles available");
    }

    // ===========================================
    // Test: pick_visible
    // ===========================================
    #[test]
    fn test_pick_visible_never_returns_hidden() {
        let styles = styles();
        let hidden: HashSet<u32> = [2].into_iter().collect();

        for seed in 0..500 {
            let picked = pick_visible(&styles, &hidden, |s| s.id, Seed::new(seed), "styles").unwrap();
            assert_ne!(picked.id, 2, "hidden style returned for seed {}", seed);
        }
    }

    #[test]
    fn test_pick_visible_all_hidden() {
        let styles = styles();
        let hidden: HashSet<u32> = [1, 2, 3].into_iter().collect();
        let err = pick_visible(&styles, &hidden, |s| s.id, Seed::new(1), "styles").unwrap_err();
        assert_eq!(err, SamplerError::EmptyCandidates { kind: "styles" });
    }

    // ===========================================
    // Test: sample_examples
    // ===========================================
    #[test]
    fn test_sample_examples_default_config() {
        let examples = ["a", "b", "c", "d", "e"];
        let sampled = sample_examples(&examples, Seed::new(42), &SamplerConfig::default());
        assert_eq!(sampled, Some(vec!["c", "b", "d"]));
    }

    #[test]
    fn test_sample_examples_respects_config() {
        let examples = ["a", "b", "c", "d", "e"];
        let config = SamplerConfig {
            max_examples_per_style: 10,
            shuffle_strategy: ShuffleStrategy::FisherYates,
        };
        let sampled = sample_examples(&examples, Seed::new(42), &config);
        assert_eq!(sampled, Some(vec!["a", "e", "c", "b", "d"]));
    }

    #[test]
    fn test_sample_examples_empty_is_none() {
        let examples: [&str; 0] = [];
        assert_eq!(sample_examples(&examples, Seed::new(1), &SamplerConfig::default()), None);
    }

    #[test]
    fn test_sample_examples_large_style_golden() {
        // 80 examples takes the merging path of the legacy shuffle
        let examples: Vec<String> = (0..80).map(|i| format!("q{}", i)).collect();
        let sampled = sample_examples(&examples, Seed::new(42), &SamplerConfig::default());
        assert_eq!(sampled.unwrap(), vec!["q71", "q2", "q1"]);
    }

    // ===========================================
    // Test: pick_by_fraction / order_feed
    // ===========================================
    #[test]
    fn test_pick_by_fraction_uses_fractional_part() {
        let items = [10, 20, 30, 40];
        assert_eq!(pick_by_fraction(&items, 0.0), Some(&10));
        assert_eq!(pick_by_fraction(&items, 3.75), Some(&40));
        assert_eq!(pick_by_fraction(&items, 0.5), Some(&30));
        assert_eq!(pick_by_fraction(&items, -0.25), Some(&40));
    }

    #[test]
    fn test_pick_by_fraction_edges() {
        let empty: [u8; 0] = [];
        assert_eq!(pick_by_fraction(&empty, 0.3), None);
        assert!(pick_by_fraction(&[1, 2, 3], f64::NAN).is_some());
    }

    #[test]
    fn test_order_feed_fraction_seed() {
        let questions = [1, 2, 3, 4, 5, 6];
        assert_eq!(order_feed(&questions, 0.5, 4), vec![1, 6, 2, 4]);
        assert_eq!(order_feed(&questions, 42.0, 10), vec![2, 1, 5, 6, 3, 4]);
    }

    #[test]
    fn test_order_feed_bad_seed_still_permutes() {
        let questions = [1, 2, 3, 4, 5, 6];
        let mut ordered = order_feed(&questions, f64::NAN, 6);
        ordered.sort_unstable();
        assert_eq!(ordered, questions);
    }
}
