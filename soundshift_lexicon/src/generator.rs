// Random ancestral word generator.
//
// Builds Old Daric words syllable by syllable from the inventories in
// `phonotactics.rs`, each slot filled with `WordRng::pick_scaled` so common
// segments dominate. The syllable count is drawn with `pick_weighted` over
// `SYLLABLE_WEIGHTS`, so two-syllable words are the most common. Output is
// in external notation and goes straight into `Language::evolve`. Takes
// `&mut WordRng`, so a given seed always yields the same words.

use crate::phonotactics::{
    CODAS, CONSONANT_FALLOFF, NUCLEI, ONSETS, SYLLABLE_WEIGHTS, VOWEL_FALLOFF,
};
use soundshift_prng::WordRng;

/// Shape parameters for generated words.
#[derive(Debug, Clone, Copy)]
pub struct WordShape {
    pub min_syllables: usize,
    pub max_syllables: usize,
    /// Probability that a non-final syllable gets a coda.
    pub medial_coda: f64,
}

impl Default for WordShape {
    fn default() -> Self {
        WordShape {
            min_syllables: 1,
            max_syllables: 4,
            medial_coda: 0.3,
        }
    }
}

/// Generate one word. Returns `None` if the shape allows no syllables.
pub fn generate_word(rng: &mut WordRng, shape: &WordShape) -> Option<String> {
    if shape.max_syllables == 0 || shape.min_syllables > shape.max_syllables {
        return None;
    }
    let count = syllable_count(rng, shape)?;
    let mut word = String::new();
    for i in 0..count {
        let onset: &str = rng.pick_scaled(ONSETS, CONSONANT_FALLOFF)?;
        // Two vowels in a row read as one long vowel; force an onset.
        let onset = if onset.is_empty() && i > 0 { "h" } else { onset };
        word.push_str(onset);
        word.push_str(rng.pick_scaled(NUCLEI, VOWEL_FALLOFF)?);
        let last = i + 1 == count;
        if last || rng.random_bool(shape.medial_coda) {
            word.push_str(rng.pick_scaled(CODAS, CONSONANT_FALLOFF)?);
        }
    }
    Some(word)
}

/// Weighted syllable count within the shape's range.
fn syllable_count(rng: &mut WordRng, shape: &WordShape) -> Option<usize> {
    let min = shape.min_syllables.max(1);
    let weights: Vec<u32> = (min..=shape.max_syllables)
        .map(|n| SYLLABLE_WEIGHTS.get(n - 1).copied().unwrap_or(1))
        .collect();
    Some(min + rng.pick_weighted(&weights)?)
}

/// Generate `count` words, skipping duplicates. May return fewer than
/// `count` if the shape is too narrow to produce that many distinct words.
pub fn sample_vocabulary(rng: &mut WordRng, shape: &WordShape, count: usize) -> Vec<String> {
    let mut words: Vec<String> = Vec::with_capacity(count);
    let mut attempts = 0;
    while words.len() < count && attempts < count * 20 {
        attempts += 1;
        let Some(word) = generate_word(rng, shape) else {
            break;
        };
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words
}
