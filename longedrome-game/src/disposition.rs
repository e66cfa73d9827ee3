//! Free-text responses scored against per-round keyword sets.
use rand::Rng;

use crate::constants::{
    MIXED_MESSAGE_PENALTY, NEGATIVE_CEILING, NEGATIVE_CORRECTION_FLOOR, NEGATIVE_KEYWORD_WEIGHT,
    NEUTRAL_DRIFT, POSITIVE_CORRECTION_CEILING, POSITIVE_FLOOR, POSITIVE_KEYWORD_WEIGHT,
    SCORE_JITTER,
};
use crate::stats::EnemyStats;

/// Words that sway the Guardian during one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundKeywords {
    pub positive: &'static [&'static str],
    pub negative: &'static [&'static str],
}

const ROUND_KEYWORDS: [RoundKeywords; 6] = [
    RoundKeywords {
        positive: &["wisdom", "harmony", "balance", "respect"],
        negative: &["power", "demand", "force", "control"],
    },
    RoundKeywords {
        positive: &["patience", "learn", "symmetry", "listen"],
        negative: &["strength", "take", "quick", "shortcut"],
    },
    RoundKeywords {
        positive: &["balance", "patience", "harmony", "respect"],
        negative: &["power", "mastery", "control", "dominate"],
    },
    RoundKeywords {
        positive: &["learn", "understand", "harmony", "balance"],
        negative: &["conquer", "defeat", "force", "demand"],
    },
    RoundKeywords {
        positive: &["together", "understand", "learn", "respect"],
        negative: &["power", "challenge", "defeat", "overcome"],
    },
    RoundKeywords {
        positive: &["harmony", "balance", "respect", "wisdom"],
        negative: &["power", "control", "dominate", "force"],
    },
];

/// Keyword set for `round`; rounds past the table reuse the last entry.
#[must_use]
pub fn keywords_for_round(round: u32) -> &'static RoundKeywords {
    let index = usize::try_from(round)
        .unwrap_or(usize::MAX)
        .min(ROUND_KEYWORDS.len() - 1);
    &ROUND_KEYWORDS[index]
}

/// Keyword hits found in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeywordMatches {
    pub positive: u32,
    pub negative: u32,
}

#[must_use]
pub fn count_matches(text: &str, round: u32) -> KeywordMatches {
    let lowered = text.to_lowercase();
    let keywords = keywords_for_round(round);
    let hits = |words: &[&str]| {
        u32::try_from(words.iter().filter(|word| lowered.contains(*word)).count())
            .unwrap_or(u32::MAX)
    };
    KeywordMatches {
        positive: hits(keywords.positive),
        negative: hits(keywords.negative),
    }
}

/// Amiability delta for a player response during `round`.
///
/// Raw keyword sum, then jitter, then sign correction: any negative hit lands
/// at or below −5 and positive-only responses land at or above +5.
pub fn score_response<R: Rng + ?Sized>(text: &str, round: u32, rng: &mut R) -> i32 {
    let matches = count_matches(text, round);
    let positive = i32::try_from(matches.positive).unwrap_or(i32::MAX);
    let negative = i32::try_from(matches.negative).unwrap_or(i32::MAX);

    let mut delta = if positive == 0 && negative == 0 {
        rng.gen_range(-NEUTRAL_DRIFT..=NEUTRAL_DRIFT)
    } else {
        let mut raw = positive
            .saturating_mul(POSITIVE_KEYWORD_WEIGHT)
            .saturating_sub(negative.saturating_mul(NEGATIVE_KEYWORD_WEIGHT));
        if positive > 0 && negative > 0 {
            raw -= MIXED_MESSAGE_PENALTY;
        }
        raw + rng.gen_range(-SCORE_JITTER..=SCORE_JITTER)
    };

    if negative > 0 && delta > NEGATIVE_CEILING {
        delta = rng.gen_range(NEGATIVE_CORRECTION_FLOOR..=NEGATIVE_CEILING);
    } else if positive > 0 && negative == 0 && delta < POSITIVE_FLOOR {
        delta = rng.gen_range(POSITIVE_FLOOR..=POSITIVE_CORRECTION_CEILING);
    }

    log::debug!(
        "scored response for round {round}: +{} -{} => {delta}",
        matches.positive,
        matches.negative
    );
    delta
}

/// Apply a delta to the Guardian, returning the clamped change.
pub fn apply_amiability(enemy: &mut EnemyStats, delta: i32) -> i32 {
    enemy.adjust_amiability(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn table_falls_back_to_last_round() {
        assert_eq!(keywords_for_round(0).positive[0], "wisdom");
        assert_eq!(keywords_for_round(1).negative[3], "shortcut");
        assert_eq!(keywords_for_round(5), keywords_for_round(99));
        assert_eq!(keywords_for_round(u32::MAX), &ROUND_KEYWORDS[5]);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let hits = count_matches("I RESPECT the Harmony of unbalanced things", 0);
        assert_eq!(hits, KeywordMatches { positive: 3, negative: 0 });
        let hits = count_matches("Powerful demands", 0);
        assert_eq!(hits, KeywordMatches { positive: 0, negative: 2 });
    }

    #[test]
    fn positive_response_stays_positive() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        for _ in 0..200 {
            let delta = score_response("I respect your wisdom", 0, &mut rng);
            assert!((15..=17).contains(&delta), "{delta}");
        }
    }

    #[test]
    fn single_positive_keyword_scores_near_eight() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        for _ in 0..200 {
            let delta = score_response("I respect you", 0, &mut rng);
            assert!((7..=9).contains(&delta), "{delta}");
        }
    }

    #[test]
    fn negative_response_is_at_most_minus_five() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for round in 0..8 {
            for text in ["I demand power", "control", "POWER and wisdom"] {
                let delta = score_response(text, round, &mut rng);
                if count_matches(text, round).negative > 0 {
                    assert!(delta <= -5, "{text} round {round}: {delta}");
                }
            }
        }
    }

    #[test]
    fn each_round_zero_negative_keyword_scores_at_most_minus_five() {
        let mut rng = ChaCha20Rng::seed_from_u64(70);
        for keyword in keywords_for_round(0).negative {
            let text = format!("I bring {keyword} to this temple");
            for trial in 0..100 {
                let delta = score_response(&text, 0, &mut rng);
                assert!(delta <= -5, "{keyword} trial {trial}: {delta}");
            }
        }
    }

    #[test]
    fn mixed_message_applies_penalty_before_correction() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        for _ in 0..200 {
            let delta = score_response("wisdom and power", 0, &mut rng);
            // 8 - 12 - 5 = -9, jitter keeps it within [-10, -8].
            assert!((-10..=-8).contains(&delta), "{delta}");
        }
    }

    #[test]
    fn neutral_response_drifts_within_two() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        for _ in 0..200 {
            let delta = score_response("hello there", 2, &mut rng);
            assert!((-2..=2).contains(&delta), "{delta}");
        }
    }

    #[test]
    fn apply_amiability_clamps() {
        let mut enemy = EnemyStats {
            amiability: 95,
            ..EnemyStats::default()
        };
        assert_eq!(apply_amiability(&mut enemy, 17), 5);
        assert_eq!(enemy.amiability, 100);
        assert_eq!(apply_amiability(&mut enemy, -250), -100);
        assert_eq!(enemy.amiability, 0);
    }
}
