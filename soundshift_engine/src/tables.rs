// Lookup tables and the pure transforms that read them.
//
// Context-sensitive replacements (voicing assimilation, nasal place
// assimilation, stressed-vowel glyphs) are not closures over hidden state:
// each `Transform` is a plain function of the matched text plus an explicit
// `SoundTables` value that the language definition owns. A symbol the table
// does not cover is reported back as an error string, which the rule layer
// wraps into `EvolveError::RuleApplication` with the rule name and input.
//
// All maps are `BTreeMap` so serialisation order and iteration are stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Place of articulation, used for nasal assimilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Place {
    Labial,
    Dental,
    Alveolar,
    Postalveolar,
    Velar,
    Glottal,
}

/// Read-only tables consulted by computed replacements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundTables {
    /// Place of articulation per consonant.
    #[serde(default)]
    pub place: BTreeMap<char, Place>,
    /// The nasal produced at each place.
    #[serde(default)]
    pub nasal_by_place: BTreeMap<Place, char>,
    /// Voiceless obstruent -> voiced counterpart.
    #[serde(default)]
    pub voicing: BTreeMap<char, char>,
    /// Short vowel -> long counterpart.
    #[serde(default)]
    pub length: BTreeMap<char, char>,
    /// Vowel -> stressed spelling.
    #[serde(default)]
    pub accent: BTreeMap<char, char>,
}

/// A named pure function usable as a computed replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Voiceless -> voiced, via `voicing`.
    Voice,
    /// Voiced -> voiceless, via `voicing` read backwards.
    Devoice,
    /// Nasal -> nasal at the place of the first symbol of the next group.
    NasalPlace,
    /// Short vowel -> long, via `length`.
    Lengthen,
    /// Long vowel -> short, via `length` read backwards.
    Shorten,
    /// Vowel -> stressed glyph, via `accent`.
    Accent,
}

impl Transform {
    /// Transform every symbol of `target`. `following` is the text of the
    /// capture group after the target (empty if there is none).
    pub fn apply(
        self,
        target: &str,
        following: &str,
        tables: &SoundTables,
    ) -> Result<String, String> {
        match self {
            Transform::Voice => map_each(target, |c| tables.voicing.get(&c).copied(), "voicing"),
            Transform::Devoice => {
                map_each(target, |c| reverse_lookup(&tables.voicing, c), "voicing")
            }
            Transform::Lengthen => map_each(target, |c| tables.length.get(&c).copied(), "length"),
            Transform::Shorten => map_each(target, |c| reverse_lookup(&tables.length, c), "length"),
            Transform::Accent => map_each(target, |c| tables.accent.get(&c).copied(), "accent"),
            Transform::NasalPlace => {
                let Some(next) = following.chars().next() else {
                    return Err("nasal_place needs a following group".to_string());
                };
                let place = tables
                    .place
                    .get(&next)
                    .ok_or_else(|| format!("no place of articulation for '{next}'"))?;
                let nasal = tables
                    .nasal_by_place
                    .get(place)
                    .ok_or_else(|| format!("no nasal for place {place:?}"))?;
                Ok(target.chars().map(|_| *nasal).collect())
            }
        }
    }
}

fn map_each(
    target: &str,
    lookup: impl Fn(char) -> Option<char>,
    table: &str,
) -> Result<String, String> {
    target
        .chars()
        .map(|c| lookup(c).ok_or_else(|| format!("no entry for '{c}' in {table} table")))
        .collect()
}

fn reverse_lookup(map: &BTreeMap<char, char>, value: char) -> Option<char> {
    map.iter().find(|&(_, &v)| v == value).map(|(&k, _)| k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> SoundTables {
        SoundTables {
            place: [('p', Place::Labial), ('t', Place::Alveolar), ('k', Place::Velar)]
                .into_iter()
                .collect(),
            nasal_by_place: [(Place::Labial, 'm'), (Place::Alveolar, 'n'), (Place::Velar, 'ŋ')]
                .into_iter()
                .collect(),
            voicing: [('p', 'b'), ('t', 'd'), ('k', 'g')].into_iter().collect(),
            length: [('a', 'ā')].into_iter().collect(),
            accent: [('a', 'á'), ('ā', 'â')].into_iter().collect(),
        }
    }

    #[test]
    fn test_voice_and_devoice() {
        let t = tables();
        assert_eq!(Transform::Voice.apply("t", "", &t).unwrap(), "d");
        assert_eq!(Transform::Devoice.apply("g", "", &t).unwrap(), "k");
    }

    #[test]
    fn test_missing_entry_is_error() {
        let t = tables();
        let err = Transform::Voice.apply("s", "", &t).unwrap_err();
        assert!(err.contains("'s'"), "{err}");
        assert!(err.contains("voicing"), "{err}");
    }

    #[test]
    fn test_nasal_place() {
        let t = tables();
        assert_eq!(Transform::NasalPlace.apply("n", "p", &t).unwrap(), "m");
        assert_eq!(Transform::NasalPlace.apply("m", "k", &t).unwrap(), "ŋ");
        assert!(Transform::NasalPlace.apply("n", "q", &t).is_err());
        assert!(Transform::NasalPlace.apply("n", "", &t).is_err());
    }

    #[test]
    fn test_length_and_accent() {
        let t = tables();
        assert_eq!(Transform::Lengthen.apply("a", "", &t).unwrap(), "ā");
        assert_eq!(Transform::Shorten.apply("ā", "", &t).unwrap(), "a");
        assert_eq!(Transform::Accent.apply("ā", "", &t).unwrap(), "â");
    }

    #[test]
    fn test_tables_json_roundtrip() {
        let json = serde_json::to_string(&tables()).unwrap();
        assert!(json.contains("\"labial\""));
        let back: SoundTables = serde_json::from_str(&json).unwrap();
        assert_eq!(back.nasal_by_place.get(&Place::Velar), Some(&'ŋ'));
        assert_eq!(back.voicing.len(), 3);
    }
}
