use anyhow::{Result, bail};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Seed metadata used for logic runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    /// Phrase the seed was hashed from, when it was not numeric.
    pub phrase: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, phrase: None }
    }

    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        Self {
            seed: phrase_seed(phrase),
            phrase: Some(phrase.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match &self.phrase {
            Some(phrase) => format!("{phrase} ({})", self.seed),
            None => self.seed.to_string(),
        }
    }
}

/// First eight bytes of the phrase's SHA-256 digest, big-endian.
fn phrase_seed(phrase: &str) -> u64 {
    let digest = Sha256::digest(phrase.trim().to_lowercase().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Resolve CLI seed arguments into canonical seed metadata.
///
/// Accepts decimal integers (negative values use their magnitude), `0x` hex
/// literals, `range:START..END` sweeps, and free-form phrases hashed to a seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }

        if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            match u64::from_str_radix(hex, 16) {
                Ok(value) => pending.push(SeedInfo::from_numeric(value)),
                Err(_) => bail!("Invalid hex seed: {token}"),
            }
            continue;
        }

        if let Some(range) = token.strip_prefix("range:") {
            pending.extend(parse_range(range)?);
            continue;
        }

        pending.push(SeedInfo::from_phrase(token));
    }

    let mut seen = HashSet::new();
    let mut deduped: Vec<SeedInfo> = pending
        .into_iter()
        .filter(|info| seen.insert(info.seed))
        .collect();

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1337));
    }

    Ok(deduped)
}

fn parse_range(bounds: &str) -> Result<Vec<SeedInfo>> {
    let Some((start, end)) = bounds.split_once("..") else {
        bail!("Seed range must look like START..END: {bounds}");
    };
    let (Ok(start), Ok(end)) = (start.trim().parse::<u64>(), end.trim().parse::<u64>()) else {
        bail!("Seed range bounds must be integers: {bounds}");
    };
    if end <= start {
        bail!("Seed range is empty: {bounds}");
    }
    Ok((start..end).map(SeedInfo::from_numeric).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn resolves_numeric_hex_and_phrases() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "0xff", "temple"])).unwrap();
        assert_eq!(seeds[0], SeedInfo::from_numeric(42));
        assert_eq!(seeds[1], SeedInfo::from_numeric(7));
        assert_eq!(seeds[2], SeedInfo::from_numeric(255));
        assert_eq!(seeds[3].phrase.as_deref(), Some("temple"));
        assert_eq!(seeds[3].seed, SeedInfo::from_phrase("Temple").seed);
    }

    #[test]
    fn expands_ranges_and_dedupes() {
        let seeds = resolve_seed_inputs(&tokens(&["range:3..6", "4"])).unwrap();
        let values: Vec<u64> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, vec![3, 4, 5]);
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(resolve_seed_inputs(&tokens(&["range:9..2"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["range:a..b"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0xzz"])).is_err());
    }

    #[test]
    fn empty_input_falls_back_to_default_seed() {
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(1337)]);
    }
}
