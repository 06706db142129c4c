// Ancestral lexicon and the tools built on the sound-change engine.
//
// The engine (`soundshift_engine`) turns one ancestral word into its
// descendant form. This crate supplies the words and the bulk callers:
//
// - `types.rs`: `LexEntry`, `PartOfSpeech`, `DerivedEntry`
// - `phonotactics.rs`: onset/nucleus/coda inventories for generated words
// - `generator.rs`: random ancestral words via scaled-random selection
// - `export.rs`: parallel whole-lexicon evolution with per-word failures
// - `sweep.rs`: synthetic consonant clusters run through the sandhi group
// - `lib.rs` (this file): `Lexicon`, loaded from JSON
// - `main.rs`: the `soundshift` CLI
//
// The lexicon is loaded from `data/ancestral_lexicon.json` via
// `Lexicon::from_json()`; `default_lexicon()` embeds that file with
// `include_str!`. All randomness goes through `soundshift_prng::WordRng`.

pub mod export;
pub mod generator;
pub mod phonotactics;
pub mod sweep;
pub mod types;

pub use types::{DerivedEntry, LexEntry, PartOfSpeech};

/// The top-level JSON structure for the lexicon file.
#[derive(Debug, serde::Deserialize)]
struct LexiconFile {
    words: Vec<LexEntry>,
}

/// A loaded ancestral lexicon, in file order.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<LexEntry>,
}

impl Lexicon {
    /// Parse a lexicon from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: LexiconFile = serde_json::from_str(json)?;
        Ok(Lexicon {
            entries: file.words,
        })
    }

    /// Wrap entries built in code.
    pub fn from_entries(entries: Vec<LexEntry>) -> Self {
        Lexicon { entries }
    }

    /// All entries in the lexicon, in file order.
    pub fn all(&self) -> &[LexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Filter entries by part of speech.
    pub fn by_pos(&self, pos: PartOfSpeech) -> Vec<&LexEntry> {
        self.entries.iter().filter(|e| e.pos == pos).collect()
    }
}

/// Load the default lexicon embedded at compile time.
///
/// Panics if the embedded JSON is malformed, which the tests rule out.
pub fn default_lexicon() -> Lexicon {
    let json = include_str!("../../data/ancestral_lexicon.json");
    Lexicon::from_json(json).expect("embedded ancestral_lexicon.json is malformed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_from_json_preserves_order() {
        let json = r#"{"words": [
            {"form": "marin", "gloss": "sea", "pos": "noun"},
            {"form": "pakiru", "gloss": "carry", "pos": "verb", "note": "transitive"}
        ]}"#;
        let lexicon = Lexicon::from_json(json).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.all()[0].form, "marin");
        assert_eq!(lexicon.all()[1].note.as_deref(), Some("transitive"));
    }

    #[test]
    fn test_lexicon_by_pos() {
        let json = r#"{"words": [
            {"form": "marin", "gloss": "sea", "pos": "noun"},
            {"form": "pakiru", "gloss": "carry", "pos": "verb"},
            {"form": "ta'", "gloss": "not", "pos": "particle"}
        ]}"#;
        let lexicon = Lexicon::from_json(json).unwrap();
        assert_eq!(lexicon.by_pos(PartOfSpeech::Noun).len(), 1);
        assert_eq!(lexicon.by_pos(PartOfSpeech::Particle).len(), 1);
        assert!(lexicon.by_pos(PartOfSpeech::Adjective).is_empty());
    }

    #[test]
    fn test_default_lexicon_loads() {
        let lexicon = default_lexicon();
        assert!(lexicon.len() >= 40, "expected >= 40 words, got {}", lexicon.len());
        for pos in [
            PartOfSpeech::Noun,
            PartOfSpeech::Verb,
            PartOfSpeech::Adjective,
            PartOfSpeech::Particle,
        ] {
            assert!(!lexicon.by_pos(pos).is_empty(), "no {pos:?} entries");
        }
    }
}
