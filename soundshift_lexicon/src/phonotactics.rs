// Old Daric syllable inventories for random word generation.
//
// Each list is in external notation and ordered most-common first, which is
// what `WordRng::pick_scaled` expects: with falloff f, the n-th entry is
// f^n times as likely as the first. Empty strings are legal entries (an
// onsetless or open syllable).
//
// Clusters are limited to what the ancestral lexicon attests; anything the
// generator builds across a syllable boundary is left to the sandhi rules.

/// Syllable onsets. `""` gives a vowel-initial syllable.
pub const ONSETS: &[&str] = &[
    "t", "k", "m", "n", "s", "r", "p", "l", "d", "", "b", "g", "h", "th", "kh", "&scaron;",
    "&ccaron;", "w", "j", "f", "v", "z", "&eth;", "&jcaron;", "'", "tr", "kr", "pl", "st",
];

/// Syllable nuclei: short vowels first, long vowels after.
pub const NUCLEI: &[&str] = &[
    "a", "i", "u", "e", "o", "&amacr;", "&imacr;", "&umacr;", "&emacr;", "&omacr;",
];

/// Syllable codas. `""` gives an open syllable.
pub const CODAS: &[&str] = &["", "n", "r", "s", "l", "m", "k", "t", "&eng;", "'", "h"];

/// Relative weight of a word having 1, 2, 3, ... syllables. Lengths past
/// the end of the table weigh 1.
pub const SYLLABLE_WEIGHTS: &[u32] = &[4, 9, 6, 2];

/// Default falloff for onsets and codas.
pub const CONSONANT_FALLOFF: f64 = 0.88;

/// Default falloff for nuclei.
pub const VOWEL_FALLOFF: f64 = 0.75;
