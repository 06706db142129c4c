// Deterministic, portable pseudo-random number generator for word synthesis.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) seeded through SplitMix64,
// with no external RNG dependency so that a given seed yields the same
// sample vocabulary on every platform.
//
// On top of the raw generator this crate provides the two selection helpers
// the random-word generator in `soundshift_lexicon` needs:
// - `pick_weighted`: index selection proportional to integer weights
// - `pick_scaled`: "scaled-random" selection where each successive item of an
//   ordered inventory is `falloff` times as likely as the one before it
//
// Both return `Option` instead of panicking when there is nothing to pick
// from, so callers decide their own fallback.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG used for all random word generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WordRng {
    s: [u64; 4],
}

impl WordRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Two generators created with the same seed produce identical streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform `f64` in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a uniform random integer in `[low, high)`.
    ///
    /// Uses rejection sampling to avoid modulo bias.
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        let threshold = range.wrapping_neg() % range;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Return `true` with probability `p`.
    pub fn random_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick an index with probability proportional to `weights[i]`.
    ///
    /// Returns `None` if the slice is empty or every weight is zero.
    pub fn pick_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }
        let mut roll = self.range_u64(0, total);
        for (i, &w) in weights.iter().enumerate() {
            let w = u64::from(w);
            if roll < w {
                return Some(i);
            }
            roll -= w;
        }
        None
    }

    /// Scaled-random pick from an inventory ordered most-common first.
    ///
    /// Item `i` has relative weight `falloff^i`, so `falloff = 1.0` is a
    /// uniform pick and smaller values concentrate on the head of the list.
    /// Returns `None` for an empty inventory or a `falloff` that is not a
    /// positive finite number.
    pub fn pick_scaled<'a, T>(&mut self, items: &'a [T], falloff: f64) -> Option<&'a T> {
        if items.is_empty() || !falloff.is_finite() || falloff <= 0.0 {
            return None;
        }
        let mut weight = 1.0;
        let mut total = 0.0;
        for _ in items {
            total += weight;
            weight *= falloff;
        }

        let mut roll = self.next_f64() * total;
        let mut weight = 1.0;
        for item in items {
            if roll < weight {
                return Some(item);
            }
            roll -= weight;
            weight *= falloff;
        }
        // Float rounding can leave a sliver past the last bucket.
        items.last()
    }
}

/// SplitMix64, used only to expand a `u64` seed into xoshiro state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
