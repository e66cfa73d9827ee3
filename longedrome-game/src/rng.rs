//! Seeded RNG streams segregated by concern.
use hmac::{Hmac, Mac};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

const SEQUENCE_DOMAIN: &[u8] = b"sequence";
const DIALOGUE_DOMAIN: &[u8] = b"dialogue";

/// Independent streams for sequence generation and dialogue scoring, so a
/// conversation never shifts the sequences a seed produces.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    sequence: CountingRng<ChaCha20Rng>,
    dialogue: CountingRng<ChaCha20Rng>,
}

impl RngBundle {
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            sequence: CountingRng::new(derive_stream_seed(seed, SEQUENCE_DOMAIN)),
            dialogue: CountingRng::new(derive_stream_seed(seed, DIALOGUE_DOMAIN)),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub fn sequence(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.sequence
    }

    pub fn dialogue(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.dialogue
    }
}

/// Counting wrapper reporting how many draws a stream has served.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

pub(crate) fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
