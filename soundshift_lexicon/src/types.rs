// Lexicon entry types.
//
// - `PartOfSpeech`: noun, verb, adjective, particle
// - `LexEntry`: one ancestral headword as stored in JSON, in external
//   notation (entity spellings such as `&amacr;`)
// - `DerivedEntry`: a headword with its descendant form and, optionally,
//   the full derivation, as written by the exporter
//
// Everything here preserves file order; nothing uses HashMap.

use serde::{Deserialize, Serialize};

/// Part of speech for a lexical entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Particle,
}

/// A JSON-loadable ancestral headword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexEntry {
    /// The ancestral form, in external notation.
    pub form: String,
    /// English meaning.
    pub gloss: String,
    pub pos: PartOfSpeech,
    /// Free-form editorial note, carried through to the export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One exported word: ancestral form, descendant form, and how it got there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedEntry {
    pub ancestral: String,
    pub descendant: String,
    pub gloss: String,
    pub pos: PartOfSpeech,
    /// Every distinct intermediate form, input first. Empty unless the export
    /// asked for derivations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derivation: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_serde() {
        let json = serde_json::to_string(&PartOfSpeech::Adjective).unwrap();
        assert_eq!(json, "\"adjective\"");
        let parsed: PartOfSpeech = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PartOfSpeech::Adjective);
    }

    #[test]
    fn test_lex_entry_note_defaults_to_none() {
        let json = r#"{"form": "k&amacr;ra", "gloss": "stone", "pos": "noun"}"#;
        let entry: LexEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.form, "k&amacr;ra");
        assert!(entry.note.is_none());
    }

    #[test]
    fn test_derived_entry_omits_empty_derivation() {
        let entry = DerivedEntry {
            ancestral: "marin".to_string(),
            descendant: "m&ecirc;rin".to_string(),
            gloss: "sea".to_string(),
            pos: PartOfSpeech::Noun,
            derivation: vec![],
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("derivation"));
        let back: DerivedEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
