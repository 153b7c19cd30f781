//! Random sources for uniform index draws.
//!
//! The roulette is cosmetic, so a weak source is acceptable as a fallback,
//! but the OS generator is always tried first.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng, TryRngCore};
use tracing::warn;

/// A source of uniform indices in `[0, len)`.
pub trait RandomSource {
    /// Draw an index in `[0, len)`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn index(&mut self, len: usize) -> usize {
        (**self).index(len)
    }
}

/// Draws from the operating system's CSPRNG, switching permanently to a
/// time-seeded [`StdRng`] if the OS source ever fails.
#[derive(Debug, Default)]
pub struct SecureRandom {
    fallback: Option<StdRng>,
}

impl SecureRandom {
    /// Create a source backed by the OS generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether draws still come from the OS generator.
    pub fn is_secure(&self) -> bool {
        self.fallback.is_none()
    }

    fn next_u64(&mut self) -> u64 {
        if let Some(rng) = &mut self.fallback {
            return rng.next_u64();
        }
        match OsRng.try_next_u64() {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "OS random source unavailable, falling back to a seeded generator");
                let mut rng = StdRng::seed_from_u64(time_seed());
                let value = rng.next_u64();
                self.fallback = Some(rng);
                value
            }
        }
    }
}

impl RandomSource for SecureRandom {
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        scale(self.next_u64(), len)
    }
}

/// Deterministic draws from a seeded [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a source from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Map a uniform 64-bit value onto `[0, len)` by multiply-shift. The bias is
/// at most `len / 2^64`.
fn scale(value: u64, len: usize) -> usize {
    ((u128::from(value) * len as u128) >> 64) as usize
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
