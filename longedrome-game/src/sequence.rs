//! Random colour sequences with a guaranteed palindrome.
use rand::Rng;
use thiserror::Error;

use crate::constants::{
    DIFFICULTY_CAP, DIFFICULTY_ROUNDS_PER_STEP, MAX_SEQUENCE_LENGTH, NOISE_DIFFICULTY_THRESHOLD,
    PLANTED_PALINDROME_MAX, PLANTED_PALINDROME_MIN, SEQUENCE_LENGTH_FLOOR,
};
use crate::token::Color;

/// Generator preconditions that were violated.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    #[error("sequence minimum length must be at least 1")]
    ZeroMinLength,
    #[error("sequence minimum {min} exceeds maximum {max}")]
    InvertedBounds { min: usize, max: usize },
    #[error("sequence maximum {max} exceeds the supported limit of {limit}")]
    TooLong { max: usize, limit: usize },
}

/// Difficulty factor for a round: one step every three rounds, capped at five.
#[must_use]
pub fn difficulty_factor(round: u32) -> u32 {
    (round / DIFFICULTY_ROUNDS_PER_STEP).min(DIFFICULTY_CAP)
}

/// Effective `(min, max)` length bounds after difficulty scaling.
#[must_use]
pub fn effective_bounds(min_length: usize, max_length: usize, round: u32) -> (usize, usize) {
    let bump = difficulty_factor(round) as usize;
    let min = SEQUENCE_LENGTH_FLOOR.max(min_length.saturating_add(bump));
    let max = min.max(max_length.saturating_add(bump));
    (min, max)
}

/// Length of the palindrome planted into a sequence of `length` tokens.
#[must_use]
pub fn planted_length(length: usize) -> usize {
    (length / 2).clamp(PLANTED_PALINDROME_MIN, PLANTED_PALINDROME_MAX)
}

/// Generate a sequence for `round` that contains at least one palindrome of
/// length five or more.
///
/// # Errors
///
/// Returns [`SequenceError`] when `min_length` is zero, exceeds `max_length`,
/// or `max_length` is above [`MAX_SEQUENCE_LENGTH`].
pub fn generate_sequence<R: Rng + ?Sized>(
    min_length: usize,
    max_length: usize,
    round: u32,
    rng: &mut R,
) -> Result<Vec<Color>, SequenceError> {
    if min_length == 0 {
        return Err(SequenceError::ZeroMinLength);
    }
    if min_length > max_length {
        return Err(SequenceError::InvertedBounds {
            min: min_length,
            max: max_length,
        });
    }
    if max_length > MAX_SEQUENCE_LENGTH {
        return Err(SequenceError::TooLong {
            max: max_length,
            limit: MAX_SEQUENCE_LENGTH,
        });
    }

    let difficulty = difficulty_factor(round);
    let (min, max) = effective_bounds(min_length, max_length, round);
    let length = rng.gen_range(min..=max);
    let mut colors: Vec<Color> = (0..length).map(|_| Color::random(rng)).collect();

    let plen = planted_length(length);
    let start = rng.gen_range(0..=length - plen);
    let end = start + plen - 1;
    for offset in 0..plen / 2 {
        let color = Color::random(rng);
        colors[start + offset] = color;
        colors[end - offset] = color;
    }

    if difficulty > NOISE_DIFFICULTY_THRESHOLD {
        for _ in 0..difficulty {
            let target = rng.gen_range(0..length);
            let source = colors[rng.gen_range(0..length)];
            if target == start || target == end {
                continue;
            }
            colors[target] = source;
            if (start..=end).contains(&target) {
                colors[start + end - target] = source;
            }
        }
    }

    log::debug!(
        "generated sequence of {length} tokens for round {round} (planted {plen} at {start})"
    );
    Ok(colors)
}
