// Symbol codec: external entity notation <-> single internal symbols.
//
// Ancestor words are written with HTML-entity-like sequences (`&amacr;`),
// ASCII digraphs (`th`), and `'` for the glottal stop. Rules are far easier
// to state over one code point per segment, so every word is encoded before
// the pipeline runs and decoded after each visible change.
//
// Encoding applies the alias list first (typographic variants such as `’`),
// then each table entry in declared order. Decoding strips bookkeeping
// markers (unless in debug mode) and applies the table in reverse order.
// Internal symbols are required to be non-ASCII, so a decoded external
// sequence can never be re-matched by a later reverse substitution; that is
// what makes `decode(encode(x)) == x` hold for every table symbol.
//
// See also: `config.rs` for `SymbolDef`/`AliasDef`, `lib.rs` for the
// per-call `EncodedWord`.

use crate::config::{AliasDef, SymbolDef};
use crate::error::ConfigError;

/// Stress bookkeeping marker, placed right after the stressed vowel.
pub const STRESS_MARK: char = '1';
/// Geminate bookkeeping marker, placed right after a geminate consonant.
pub const GEMINATE_MARK: char = '2';

/// True for the digit markers the pipeline uses internally.
pub fn is_marker(c: char) -> bool {
    c == STRESS_MARK || c == GEMINATE_MARK
}

/// Bidirectional mapping between external notation and internal symbols.
#[derive(Debug, Clone)]
pub struct Codec {
    entries: Vec<(String, char)>,
    aliases: Vec<(String, String)>,
    debug: bool,
}

impl Codec {
    /// Build a codec from its table, validating it.
    pub fn new(
        symbols: &[SymbolDef],
        aliases: &[AliasDef],
        debug: bool,
    ) -> Result<Self, ConfigError> {
        let mut entries: Vec<(String, char)> = Vec::with_capacity(symbols.len());
        for sym in symbols {
            if sym.external.is_empty() {
                return Err(ConfigError::Codec(format!(
                    "empty external sequence for '{}'",
                    sym.internal
                )));
            }
            if sym.internal.is_ascii() {
                return Err(ConfigError::Codec(format!(
                    "internal symbol '{}' for '{}' must be non-ASCII",
                    sym.internal, sym.external
                )));
            }
            if let Some((other, _)) = entries.iter().find(|(_, c)| *c == sym.internal) {
                return Err(ConfigError::Codec(format!(
                    "internal symbol '{}' assigned to both '{}' and '{}'",
                    sym.internal, other, sym.external
                )));
            }
            entries.push((sym.external.clone(), sym.internal));
        }
        let aliases = aliases
            .iter()
            .filter(|a| !a.from.is_empty())
            .map(|a| (a.from.clone(), a.to.clone()))
            .collect();
        Ok(Codec {
            entries,
            aliases,
            debug,
        })
    }

    /// Translate external notation into internal symbols. Unknown text
    /// passes through unchanged.
    pub fn encode(&self, external: &str) -> String {
        let mut text = external.to_string();
        for (from, to) in &self.aliases {
            if text.contains(from.as_str()) {
                text = text.replace(from.as_str(), to);
            }
        }
        for (ext, int) in &self.entries {
            if text.contains(ext.as_str()) {
                text = text.replace(ext.as_str(), int.encode_utf8(&mut [0; 4]));
            }
        }
        text
    }

    /// Translate internal symbols back into external notation.
    pub fn decode(&self, internal: &str) -> String {
        let mut text: String = if self.debug {
            internal.to_string()
        } else {
            internal.chars().filter(|&c| !is_marker(c)).collect()
        };
        for (ext, int) in self.entries.iter().rev() {
            if text.contains(*int) {
                text = text.replace(*int, ext);
            }
        }
        text
    }

    /// The external sequences in table order.
    pub fn externals(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(ext, _)| ext.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(external: &str, internal: char) -> SymbolDef {
        SymbolDef {
            external: external.to_string(),
            internal,
        }
    }

    fn small_codec(debug: bool) -> Codec {
        Codec::new(
            &[sym("&amacr;", 'ā'), sym("&eth;", 'ð'), sym("th", 'θ'), sym("'", 'ʔ')],
            &[AliasDef {
                from: "’".to_string(),
                to: "'".to_string(),
            }],
            debug,
        )
        .unwrap()
    }

    #[test]
    fn test_encode_replaces_in_table_order() {
        let codec = small_codec(false);
        // `&eth;` is consumed before the `th` digraph can see its letters.
        assert_eq!(codec.encode("&eth;ath"), "ðaθ");
        assert_eq!(codec.encode("k&amacr;'"), "kāʔ");
    }

    #[test]
    fn test_unknown_text_passes_through() {
        let codec = small_codec(false);
        assert_eq!(codec.encode("xyz&foo;"), "xyz&foo;");
        assert_eq!(codec.decode("xyz&foo;"), "xyz&foo;");
    }

    #[test]
    fn test_alias_normalised_before_encoding() {
        let codec = small_codec(false);
        assert_eq!(codec.encode("ta’"), "taʔ");
        assert_eq!(codec.decode(&codec.encode("ta’")), "ta'");
    }

    #[test]
    fn test_round_trip_each_symbol() {
        let codec = small_codec(false);
        for ext in codec.externals() {
            assert_eq!(codec.decode(&codec.encode(ext)), ext);
        }
    }

    #[test]
    fn test_markers_stripped_unless_debug() {
        assert_eq!(small_codec(false).decode("ka1t2θa"), "katha");
        assert_eq!(small_codec(true).decode("ka1t2θa"), "ka1t2tha");
    }

    #[test]
    fn test_rejects_ascii_internal() {
        let err = Codec::new(&[sym("sh", 'S')], &[], false).unwrap_err();
        assert!(matches!(err, ConfigError::Codec(_)));
    }

    #[test]
    fn test_rejects_duplicate_internal() {
        let err = Codec::new(&[sym("sh", 'ʃ'), sym("&scaron;", 'ʃ')], &[], false).unwrap_err();
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn test_rejects_empty_external() {
        assert!(Codec::new(&[sym("", 'ʃ')], &[], false).is_err());
    }
}
