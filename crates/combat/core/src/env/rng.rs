//! RNG oracle for seedable, reproducible dice rolls.
//!
//! The engine never touches an ambient generator. Every random event derives
//! its own seed from the session seed, a roll nonce, the rolling side, and a
//! context value, then asks the injected [`RngOracle`] for a value. Replaying
//! a session with the same seed and the same inputs reproduces every roll.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        (self.next_u32(seed) % sides.max(1)) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Uses the PCG-XSH-RR variant: 64-bit state, 32-bit output, a single
/// multiply plus xorshift and rotate per value.
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// `state' = (state * multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Identifies what a roll is for, so two rolls sharing a nonce still get
/// independent seeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RollContext {
    Initiative = 0,
    AbilityChoice = 1,
    Damage = 2,
    Healing = 3,
}

/// Compute a deterministic seed for a single random event.
///
/// # Arguments
///
/// * `session_seed` - Seed chosen when the session was created
/// * `nonce` - Roll sequence number (increments on every draw)
/// * `actor` - Side performing the roll (0 = player, 1 = boss)
/// * `context` - What the roll is for
pub fn compute_seed(session_seed: u64, nonce: u64, actor: u32, context: RollContext) -> u64 {
    // SplitMix64 / FxHash style mixing
    let mut hash = session_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(1234), rng.next_u32(1234));
        assert_ne!(rng.next_u32(1234), rng.next_u32(1235));
    }

    #[test]
    fn roll_die_covers_full_range() {
        let rng = PcgRng;
        let mut seen = [false; 6];
        for nonce in 0..500 {
            let face = rng.roll_die(compute_seed(99, nonce, 0, RollContext::Damage), 6);
            assert!((1..=6).contains(&face));
            seen[(face - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn contexts_produce_distinct_seeds() {
        let a = compute_seed(7, 3, 0, RollContext::Damage);
        let b = compute_seed(7, 3, 0, RollContext::Healing);
        let c = compute_seed(7, 3, 1, RollContext::Damage);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
