//! Property tests for the seeded sampler.
//!
//! Verifies determinism, draw range, permutation preservation and the
//! single-candidate boundary over arbitrary seeds and candidate lists.

use icebreaker_sampler::{
    create, fisher_yates, next, pick_index, sample_n, shuffle, SamplerError, Seed, ShuffleStrategy,
};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_strategy() -> impl Strategy<Value = ShuffleStrategy> {
    prop_oneof![
        Just(ShuffleStrategy::LegacyComparator),
        Just(ShuffleStrategy::FisherYates),
    ]
}

fn arb_candidates() -> impl Strategy<Value = Vec<u16>> {
    prop::collection::vec(any::<u16>(), 0..100)
}

fn sorted(mut items: Vec<u16>) -> Vec<u16> {
    items.sort_unstable();
    items
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Same seed and length always give the same index sequence.
    #[test]
    fn pick_index_is_deterministic(seed in any::<u32>(), len in 1usize..1000) {
        let mut a = create(seed);
        let mut b = create(seed);
        for _ in 0..16 {
            let (ia, na) = pick_index(a, len).unwrap();
            let (ib, nb) = pick_index(b, len).unwrap();
            prop_assert_eq!(ia, ib);
            prop_assert!(ia < len);
            a = na;
            b = nb;
        }
    }

    /// Every draw lies in [0, 1).
    #[test]
    fn draws_are_in_unit_interval(seed in any::<u32>()) {
        let mut state = create(seed);
        for _ in 0..64 {
            let (draw, next_state) = next(state);
            prop_assert!((0.0..1.0).contains(&draw));
            state = next_state;
        }
    }

    /// A single candidate is always index 0.
    #[test]
    fn single_candidate_is_index_zero(seed in any::<u32>()) {
        let (index, _) = pick_index(create(seed), 1).unwrap();
        prop_assert_eq!(index, 0);
    }

    /// Empty lists are rejected for any seed.
    #[test]
    fn empty_pick_is_error(seed in any::<u32>()) {
        prop_assert_eq!(
            pick_index(create(seed), 0),
            Err(SamplerError::EmptyCandidates { kind: "candidates" })
        );
    }

    /// Both shuffles keep exactly the original multiset.
    #[test]
    fn shuffles_preserve_elements(seed in any::<u32>(), items in arb_candidates()) {
        let (legacy, _) = shuffle(create(seed), &items);
        let (unbiased, _) = fisher_yates(create(seed), &items);
        prop_assert_eq!(sorted(legacy), sorted(items.clone()));
        prop_assert_eq!(sorted(unbiased), sorted(items));
    }

    /// Shuffles are reproducible for a fixed seed.
    #[test]
    fn shuffles_are_reproducible(seed in any::<u32>(), items in arb_candidates(), strategy in arb_strategy()) {
        let (first, state_a) = strategy.apply(create(seed), &items);
        let (second, state_b) = strategy.apply(create(seed), &items);
        prop_assert_eq!(first, second);
        prop_assert_eq!(state_a, state_b);
    }

    /// sample_n is a prefix of the full shuffle, capped at the list length.
    #[test]
    fn sample_n_is_shuffle_prefix(
        seed in any::<u32>(),
        items in arb_candidates(),
        n in 0usize..150,
        strategy in arb_strategy(),
    ) {
        let (full, _) = strategy.apply(create(seed), &items);
        let (sample, _) = sample_n(create(seed), &items, n, strategy);
        prop_assert_eq!(sample.len(), n.min(items.len()));
        prop_assert_eq!(&sample[..], &full[..sample.len()]);
    }

    /// Integral seeds survive a text round trip through the query parameter path.
    #[test]
    fn seed_text_round_trip(value in any::<u32>()) {
        prop_assert_eq!(Seed::resolve(Some(&value.to_string())), Seed::new(value));
    }
}
