//! Property checks for palindrome search, generation, damage and amiability.
//!
//! Run with: PROPTEST_CASES=20000 cargo test --release palindrome_properties

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use longedrome_game::palindrome::{brute_force, manacher};
use longedrome_game::{
    Color, EnemyStats, calculate_damage, find_longest_palindrome, generate_sequence, is_palindrome,
    keywords_for_round, score_response,
};

fn color() -> impl Strategy<Value = Color> {
    prop::sample::select(Color::ALL.to_vec())
}

/// Words that match no keyword in any round.
const FILLER: [&str; 6] = ["the", "we", "sky", "river", "stone", "bring"];

/// Response built from sampled keywords of one round plus filler words.
fn keyword_response() -> impl Strategy<Value = (u32, String)> {
    (0u32..10).prop_flat_map(|round| {
        let keywords = keywords_for_round(round);
        (
            Just(round),
            prop::sample::subsequence(keywords.positive.to_vec(), 0..=2),
            prop::sample::subsequence(keywords.negative.to_vec(), 0..=2),
            prop::collection::vec(prop::sample::select(FILLER.to_vec()), 0..6),
        )
            .prop_map(|(round, positive, negative, filler)| {
                let words: Vec<&str> = filler
                    .iter()
                    .chain(positive.iter())
                    .chain(filler.iter().rev())
                    .chain(negative.iter())
                    .copied()
                    .collect();
                (round, words.join(" "))
            })
    })
}

fn small_alphabet() -> impl Strategy<Value = Vec<Color>> {
    // Three colours make long palindromes common.
    prop::collection::vec(
        prop::sample::select(vec![Color::Red, Color::Blue, Color::Green]),
        0..40,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn manacher_length_matches_brute_force(seq in prop::collection::vec(color(), 0..60)) {
        let (_, expected) = brute_force(&seq);
        let (start, length) = manacher(&seq).unwrap();
        prop_assert_eq!(length, expected);
        prop_assert!(is_palindrome(&seq[start..start + length]));
    }

    #[test]
    fn span_is_always_a_valid_palindrome(seq in small_alphabet()) {
        let span = find_longest_palindrome(&seq);
        if seq.is_empty() {
            prop_assert!(span.is_empty());
        } else {
            prop_assert!(span.length >= 1);
            prop_assert_eq!(&seq[span.indices()], span.tokens.as_slice());
            prop_assert!(is_palindrome(&span.tokens));
            prop_assert_eq!(span.length, brute_force(&seq).1);
        }
    }

    #[test]
    fn reversal_preserves_longest_length(seq in small_alphabet()) {
        let mut reversed = seq.clone();
        reversed.reverse();
        prop_assert_eq!(
            find_longest_palindrome(&seq).length,
            find_longest_palindrome(&reversed).length
        );
    }

    #[test]
    fn search_is_deterministic(seq in small_alphabet()) {
        let first = find_longest_palindrome(&seq);
        let second = find_longest_palindrome(&seq);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn generated_sequences_hold_five_token_palindromes(
        seed in any::<u64>(),
        round in 0u32..60,
        min in 1usize..12,
        extra in 0usize..10,
    ) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let seq = generate_sequence(min, min + extra, round, &mut rng).unwrap();
        prop_assert!(seq.len() >= 5);
        prop_assert!(find_longest_palindrome(&seq).length >= 5);
    }

    #[test]
    fn damage_is_monotone(enemy in 0usize..30, user in 0usize..30, turn in 0u32..40) {
        let damage = calculate_damage(enemy, user, turn);
        if user >= enemy {
            prop_assert_eq!(damage, 0);
        } else {
            prop_assert!(damage <= calculate_damage(enemy + 1, user, turn));
            prop_assert!(damage <= calculate_damage(enemy, user, turn + 1));
        }
    }

    #[test]
    fn amiability_stays_in_bounds(start in 0i32..=100, deltas in prop::collection::vec(any::<i32>(), 1..20)) {
        let mut enemy = EnemyStats { amiability: start, ..EnemyStats::default() };
        for delta in deltas {
            enemy.adjust_amiability(delta);
            prop_assert!((0..=100).contains(&enemy.amiability));
        }
    }

    #[test]
    fn scoring_respects_sign_guarantees(seed in any::<u64>(), (round, text) in keyword_response()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let keywords = keywords_for_round(round);
        let has_negative = keywords.negative.iter().any(|k| text.contains(k));
        let has_positive = keywords.positive.iter().any(|k| text.contains(k));
        let delta = score_response(&text, round, &mut rng);
        if has_negative {
            prop_assert!(delta <= -5, "{text:?} => {delta}");
        } else if has_positive {
            prop_assert!(delta >= 5, "{text:?} => {delta}");
        } else {
            prop_assert!((-2..=2).contains(&delta), "{text:?} => {delta}");
        }
    }
}
