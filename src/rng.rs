//! Pseudorandom source for the sampling generators, based on PCG32.
//!
//! The samplers never own a random source: the caller creates one and lends it to each
//! call with `&mut`, so seeded runs are reproducible and two calls can never draw from
//! the same source concurrently.
//!
//! # PCG32 Algorithm
//!
//! PCG (Permuted Congruential Generator) is a family of simple fast space-efficient
//! statistically good algorithms for random number generation. PCG32 specifically:
//! - Has 64 bits of state, producing 32-bit output
//! - Period of 2^64
//! - Passes TestU01 statistical tests
//!
//! Reference: <https://www.pcg-random.org/>
//!
//! # Usage
//!
//! ```rust
//! use intvec::rng::{Pcg32, Rng, SeedableRng};
//!
//! let mut rng = Pcg32::seed_from_u64(12345);
//! let value = rng.gen_range(0..100);
//! assert!(value < 100);
//! ```

use crate::{
    report_violation,
    telemetry::{ViolationKind, ViolationSeverity},
};

/// PCG32 random number generator.
///
/// A minimal implementation of the PCG-XSH-RR variant with 64-bit state.
/// NOT cryptographically secure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

/// Default increment for single-stream PCG32.
const PCG_DEFAULT_INCREMENT: u64 = 1442695040888963407;

/// Multiplier constant for the LCG step.
const PCG_MULTIPLIER: u64 = 6364136223846793005;

impl Pcg32 {
    /// Creates a new PCG32 generator with the given state and stream.
    ///
    /// The stream selects one of 2^63 independent sequences.
    #[must_use]
    pub const fn new(state: u64, stream: u64) -> Self {
        // The increment must be odd
        let inc = (stream << 1) | 1;
        let mut pcg = Self { state: 0, inc };
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg.state = pcg.state.wrapping_add(state);
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg
    }

    /// Generates the next 32-bit random value.
    #[inline]
    #[must_use]
    pub fn next_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state
            .wrapping_mul(PCG_MULTIPLIER)
            .wrapping_add(self.inc);
        // XSH-RR output permutation
        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Generates the next 64-bit random value by combining two 32-bit values.
    #[inline]
    #[must_use]
    pub fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }
}

/// Trait for seeding random number generators.
pub trait SeedableRng: Sized {
    /// Creates a new RNG seeded from a 64-bit value.
    ///
    /// Different seeds produce different (statistically independent) sequences.
    #[must_use]
    fn seed_from_u64(seed: u64) -> Self;

    /// Creates a new RNG with a seed derived from the wall clock and thread identity.
    ///
    /// Use [`seed_from_u64`](Self::seed_from_u64) whenever a run must be reproducible.
    #[must_use]
    fn from_entropy() -> Self;
}

impl SeedableRng for Pcg32 {
    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed, PCG_DEFAULT_INCREMENT)
    }

    fn from_entropy() -> Self {
        Self::seed_from_u64(timing_entropy_seed())
    }
}

/// Trait for random sources accepted by the sampling generators.
///
/// Only [`next_u32`](Rng::next_u32) and [`next_u64`](Rng::next_u64) are required; the
/// bounded draws and the shuffle are derived from them.
pub trait Rng {
    /// Returns the next 32-bit random value.
    fn next_u32(&mut self) -> u32;

    /// Returns the next 64-bit random value.
    fn next_u64(&mut self) -> u64;

    /// Generates a uniform `u32` value in `[low, high)`.
    ///
    /// # Empty Range Behavior
    /// If `range.is_empty()`, reports a violation via telemetry and returns `range.start`.
    fn gen_range(&mut self, range: std::ops::Range<u32>) -> u32 {
        let span = range.end.wrapping_sub(range.start);
        if range.is_empty() {
            report_violation!(
                ViolationSeverity::Warning,
                ViolationKind::Random,
                "gen_range called with empty range [{}..{})",
                range.start,
                range.end
            );
            return range.start;
        }

        // Rejection sampling removes the modulo bias
        let threshold = span.wrapping_neg() % span;
        loop {
            let random_value = self.next_u32();
            if random_value >= threshold {
                return range.start.wrapping_add(random_value % span);
            }
        }
    }

    /// Generates a uniform `usize` value in `[low, high)`.
    ///
    /// # Empty Range Behavior
    /// If `range.is_empty()`, reports a violation via telemetry and returns `range.start`.
    fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        let span = range.end.wrapping_sub(range.start);
        if range.is_empty() {
            report_violation!(
                ViolationSeverity::Warning,
                ViolationKind::Random,
                "gen_range_usize called with empty range [{}..{})",
                range.start,
                range.end
            );
            return range.start;
        }

        if span <= u32::MAX as usize {
            let threshold = (span as u32).wrapping_neg() % (span as u32);
            loop {
                let random_value = self.next_u32();
                if random_value >= threshold {
                    return range
                        .start
                        .wrapping_add((random_value % span as u32) as usize);
                }
            }
        } else {
            let span64 = span as u64;
            let threshold = span64.wrapping_neg() % span64;
            loop {
                let random_value = self.next_u64();
                if random_value >= threshold {
                    return range.start.wrapping_add((random_value % span64) as usize);
                }
            }
        }
    }

    /// Shuffles `slice` in place with the Fisher–Yates algorithm.
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.gen_range_usize(0..i + 1);
            slice.swap(i, j);
        }
    }
}

impl Rng for Pcg32 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        Self::next_u32(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        Self::next_u64(self)
    }
}

impl<R: Rng + ?Sized> Rng for &mut R {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }
}

/// Gets a timing-based seed for RNG initialization.
///
/// Mixes the sub-second clock with the current thread's identity through the
/// SplitMix64 finalizer. Non-deterministic by construction.
fn timing_entropy_seed() -> u64 {
    use web_time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64);

    // ThreadId has no stable integer accessor; its Debug form is unique per thread
    let thread_id = format!("{:?}", std::thread::current().id());
    let thread_mix = thread_id
        .bytes()
        .fold(0x9e37_79b9_7f4a_7c15_u64, |acc, byte| {
            (acc ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        });

    splitmix64(nanos ^ thread_mix)
}

const fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn test_pcg32_deterministic() {
        let mut rng1 = Pcg32::seed_from_u64(12345);
        let mut rng2 = Pcg32::seed_from_u64(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_pcg32_different_seeds() {
        let mut rng1 = Pcg32::seed_from_u64(12345);
        let mut rng2 = Pcg32::seed_from_u64(54321);

        let mut same_count = 0;
        for _ in 0..100 {
            if rng1.next_u32() == rng2.next_u32() {
                same_count += 1;
            }
        }
        assert!(same_count < 10);
    }

    #[test]
    fn test_pcg32_distribution() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut buckets = [0u32; 16];

        for _ in 0..16000 {
            let val = rng.next_u32();
            buckets[(val >> 28) as usize] += 1;
        }

        for &count in &buckets {
            assert!(count > 500, "Bucket too low: {count}");
            assert!(count < 1500, "Bucket too high: {count}");
        }
    }

    #[test]
    fn test_gen_range() {
        let mut rng = Pcg32::seed_from_u64(42);

        for _ in 0..1000 {
            let val = rng.gen_range(10..20);
            assert!((10..20).contains(&val));
        }
    }

    #[test]
    fn test_gen_range_single_value() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(rng.gen_range(42..43), 42);
        }
    }

    #[test]
    fn test_gen_range_full_u32_span() {
        let mut rng = Pcg32::seed_from_u64(7);
        // span of u32::MAX, threshold computation must not divide by zero
        for _ in 0..100 {
            let val = rng.gen_range(0..u32::MAX);
            assert!(val < u32::MAX);
        }
    }

    #[test]
    fn test_gen_range_empty_returns_start() {
        let mut rng = Pcg32::seed_from_u64(42);
        assert_eq!(rng.gen_range(100..100), 100);
        assert_eq!(rng.gen_range_usize(500..500), 500);
    }

    #[test]
    fn test_gen_range_usize_large() {
        let mut rng = Pcg32::seed_from_u64(42);

        let large_start: usize = (u32::MAX as usize) + 1000;
        let large_end: usize = large_start + 1000;

        for _ in 0..100 {
            let val = rng.gen_range_usize(large_start..large_end);
            assert!(val >= large_start);
            assert!(val < large_end);
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut values: Vec<i64> = (0..100).collect();
        rng.shuffle(&mut values);
        assert_ne!(values, (0..100).collect::<Vec<_>>());
        values.sort_unstable();
        assert_eq!(values, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_trivial_slices() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut empty: [u8; 0] = [];
        rng.shuffle(&mut empty);
        let mut one = [9];
        rng.shuffle(&mut one);
        assert_eq!(one, [9]);
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut a = Pcg32::seed_from_u64(11);
        let mut b = Pcg32::seed_from_u64(11);
        let mut by_ref = &mut b;
        assert_eq!(a.next_u64(), Rng::next_u64(&mut by_ref));
    }

    #[test]
    fn test_seedable_from_entropy() {
        let _rng = Pcg32::from_entropy();
    }

    // Regression guard against accidental algorithm changes
    #[test]
    fn test_pcg32_golden() {
        let mut rng = Pcg32::seed_from_u64(0);

        let expected = [
            0x348a463f_u32,
            0x4f205a1b_u32,
            0x2946c488_u32,
            0x805e36de_u32,
            0x79f994a9_u32,
        ];

        for &exp in &expected {
            assert_eq!(rng.next_u32(), exp, "Golden test failed");
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod property_tests {
    use super::{Pcg32, Rng, SeedableRng};
    use proptest::prelude::*;

    proptest! {
        /// Same seed always produces identical sequence.
        #[test]
        fn prop_determinism_same_seed_same_sequence(seed in any::<u64>()) {
            let mut rng1 = Pcg32::seed_from_u64(seed);
            let mut rng2 = Pcg32::seed_from_u64(seed);

            for _ in 0..100 {
                prop_assert_eq!(rng1.next_u32(), rng2.next_u32());
            }
        }

        #[test]
        fn prop_gen_range_within_bounds(
            seed in any::<u64>(),
            start in 0u32..1000,
            span in 1u32..1000,
        ) {
            let end = start + span;
            let mut rng = Pcg32::seed_from_u64(seed);

            for _ in 0..100 {
                let val = rng.gen_range(start..end);
                prop_assert!(val >= start, "gen_range output {} below start {}", val, start);
                prop_assert!(val < end, "gen_range output {} >= end {}", val, end);
            }
        }

        #[test]
        fn prop_shuffle_preserves_elements(seed in any::<u64>(), len in 0usize..200) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut values: Vec<usize> = (0..len).collect();
            rng.shuffle(&mut values);
            values.sort_unstable();
            prop_assert_eq!(values, (0..len).collect::<Vec<_>>());
        }
    }
}
