//! Deterministic simulation RNG wrapper.
//!
//! Every stochastic decision (growth intervals, placement attempts, candidate
//! tile picks) goes through a [`SimRng`] owned by the component making it, so
//! a run is reproducible from its seed.  Independent owners get independent
//! streams via [`SimRng::child`].

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded RNG owned by one simulation component (the world's placement
/// attempts, the growth generator's interval draws).
///
/// `Clone` so a test can replay a stream; never shared between owners.
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Split off an independent stream.  `offset` names the stream, so two
    /// owners built from the same root seed with different offsets never
    /// draw the same sequence.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let drawn: u64 = self.0.r#gen();
        Self::new(drawn ^ offset.wrapping_mul(MIXING_CONSTANT))
    }

    /// Uniform draw from `range` (`a..b` or `a..=b`).
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// A uniformly chosen element, or `None` for an empty slice.
    #[inline]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }
}
