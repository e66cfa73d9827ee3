//! Palindrome detection over token sequences.
//!
//! The primary search is Manacher's algorithm. Its result is always re-checked
//! with [`is_palindrome`]; a fault or a failed check falls back to an O(n³)
//! brute-force scan and then to a plain longest-first window scan, so callers
//! always receive a valid span for non-empty input.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contiguous palindromic run inside a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalindromeSpan<T> {
    pub start: usize,
    pub length: usize,
    pub tokens: Vec<T>,
}

impl<T> PalindromeSpan<T> {
    /// Span used for an empty sequence.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            start: 0,
            length: 0,
            tokens: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Exclusive end index in the source sequence.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// Source indices covered by the span, ascending.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }
}

impl<T> Default for PalindromeSpan<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Which stage of the search produced a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMethod {
    Manacher,
    BruteForce,
    LinearScan,
}

/// Internal faults of the linear-time search.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PalindromeError {
    #[error("mirror of position {index} around center {center} is out of range")]
    MirrorOutOfRange { index: usize, center: usize },
    #[error("radius {radius} exceeds center {center}")]
    RadiusOutOfRange { center: usize, radius: usize },
    #[error("span {start}+{length} exceeds sequence length {len}")]
    SpanOutOfBounds {
        start: usize,
        length: usize,
        len: usize,
    },
}

/// True when `tokens` reads the same forwards and backwards.
#[must_use]
pub fn is_palindrome<T: PartialEq>(tokens: &[T]) -> bool {
    let n = tokens.len();
    (0..n / 2).all(|i| tokens[i] == tokens[n - 1 - i])
}

/// Manacher's algorithm, returning `(start, length)` of the first longest palindrome.
///
/// # Errors
///
/// Returns a [`PalindromeError`] when an intermediate index falls outside the
/// transformed or original sequence.
pub fn manacher<T: PartialEq>(tokens: &[T]) -> Result<(usize, usize), PalindromeError> {
    let n = tokens.len();
    if n <= 1 {
        return Ok((0, n));
    }

    // `None` is the separator: it never equals a token.
    let mut transformed: Vec<Option<&T>> = Vec::with_capacity(2 * n + 1);
    transformed.push(None);
    for token in tokens {
        transformed.push(Some(token));
        transformed.push(None);
    }
    let len = transformed.len();

    let mut radii = vec![0_usize; len];
    let mut center = 0_usize;
    let mut right = 0_usize;

    for i in 1..len - 1 {
        if right > i {
            let mirror = (2 * center)
                .checked_sub(i)
                .ok_or(PalindromeError::MirrorOutOfRange { index: i, center })?;
            let mirrored = *radii
                .get(mirror)
                .ok_or(PalindromeError::MirrorOutOfRange { index: i, center })?;
            radii[i] = (right - i).min(mirrored);
        }

        loop {
            let reach = radii[i] + 1;
            if reach > i || i + reach >= len {
                break;
            }
            if transformed[i + reach] != transformed[i - reach] {
                break;
            }
            radii[i] = reach;
        }

        if i + radii[i] > right {
            center = i;
            right = i + radii[i];
        }
    }

    let mut best_center = 0;
    let mut best_radius = 0;
    for (i, &radius) in radii.iter().enumerate().take(len - 1).skip(1) {
        if radius > best_radius {
            best_radius = radius;
            best_center = i;
        }
    }

    let start = best_center
        .checked_sub(best_radius)
        .ok_or(PalindromeError::RadiusOutOfRange {
            center: best_center,
            radius: best_radius,
        })?
        / 2;
    if start + best_radius > n {
        return Err(PalindromeError::SpanOutOfBounds {
            start,
            length: best_radius,
            len: n,
        });
    }
    Ok((start, best_radius))
}

/// Check every substring; the first longest palindrome wins.
#[must_use]
pub fn brute_force<T: PartialEq>(tokens: &[T]) -> (usize, usize) {
    let n = tokens.len();
    if n <= 1 {
        return (0, n);
    }
    let mut best = (0, 1);
    for i in 0..n {
        for j in i..n {
            let length = j - i + 1;
            if length > best.1 && is_palindrome(&tokens[i..=j]) {
                best = (i, length);
            }
        }
    }
    best
}

/// Longest-first window scan, returning the first palindromic window.
#[must_use]
pub fn linear_scan<T: PartialEq>(tokens: &[T]) -> (usize, usize) {
    let n = tokens.len();
    for length in (1..=n).rev() {
        for start in 0..=n - length {
            if is_palindrome(&tokens[start..start + length]) {
                return (start, length);
            }
        }
    }
    (0, n.min(1))
}

/// Find the longest palindromic span in `tokens`.
///
/// Deterministic for a fixed input: ties resolve to the leftmost center found
/// by the linear-time search.
#[must_use]
pub fn find_longest_palindrome<T: PartialEq + Clone>(tokens: &[T]) -> PalindromeSpan<T> {
    search_with(tokens, manacher).0
}

/// Run the fallback chain with a caller-provided primary search.
pub(crate) fn search_with<T, F>(tokens: &[T], primary: F) -> (PalindromeSpan<T>, SearchMethod)
where
    T: PartialEq + Clone,
    F: FnOnce(&[T]) -> Result<(usize, usize), PalindromeError>,
{
    if tokens.is_empty() {
        return (PalindromeSpan::empty(), SearchMethod::Manacher);
    }

    match primary(tokens) {
        Ok((start, length)) => {
            if let Some(span) = validated_span(tokens, start, length) {
                return (span, SearchMethod::Manacher);
            }
            log::warn!("linear search returned a non-palindrome at {start}+{length}; using brute force");
        }
        Err(err) => log::warn!("linear search failed: {err}; using brute force"),
    }

    let (start, length) = brute_force(tokens);
    if let Some(span) = validated_span(tokens, start, length) {
        return (span, SearchMethod::BruteForce);
    }
    log::warn!("brute force returned a non-palindrome at {start}+{length}; scanning");

    let (start, length) = linear_scan(tokens);
    let span = validated_span(tokens, start, length).unwrap_or_else(|| PalindromeSpan {
        start: 0,
        length: 1,
        tokens: vec![tokens[0].clone()],
    });
    (span, SearchMethod::LinearScan)
}

fn validated_span<T: PartialEq + Clone>(
    tokens: &[T],
    start: usize,
    length: usize,
) -> Option<PalindromeSpan<T>> {
    if length == 0 {
        return None;
    }
    let window = tokens.get(start..start.checked_add(length)?)?;
    is_palindrome(window).then(|| PalindromeSpan {
        start,
        length,
        tokens: window.to_vec(),
    })
}
