use blake3::Hasher;
use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::formula::RollRange;

#[derive(Clone)]
pub struct DetRng {
    rng: Xoshiro256PlusPlus,
    draws: u32,
}

impl DetRng {
    /// Same `(seed, stream)` always replays the same rolls.
    pub fn from_seed(seed: u64, stream: u32) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(b"pharmacy_rng_v1");
        hasher.update(&seed.to_le_bytes());
        hasher.update(&stream.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(hash.as_bytes());
        Self {
            rng: Xoshiro256PlusPlus::from_seed(bytes),
            draws: 0,
        }
    }

    pub fn u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    /// Uniform draw from `range`, both ends included. Rejection sampling keeps
    /// every value equally likely.
    pub fn roll(&mut self, range: RollRange) -> i64 {
        let span = range.span();
        let accept_below = (u64::MAX / span) * span;
        loop {
            let draw = self.u64();
            if draw < accept_below {
                let offset = (draw % span) as i64;
                return range.min().saturating_add(offset);
            }
        }
    }

    pub fn cursor(&self) -> u32 {
        self.draws
    }
}
