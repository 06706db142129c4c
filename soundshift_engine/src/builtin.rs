// The built-in language: Old Daric -> Daric.
//
// Old Daric is written with entity notation for long vowels (`&amacr;`),
// carons for the postalveolars (`&scaron;`, `&ccaron;`), `&eng;` for the
// velar nasal, `th`/`kh` digraphs and `'` for the glottal stop. Internally
// every segment is one non-ASCII or lowercase code point.
//
// Rule order, main steps:
//   1. housekeeping: stray markers, morpheme boundaries, ll/rr -> long liquids
//   2. pre-stress: initial h loss, intervocalic voicing, syncope of the
//      second vowel, a-umlaut, long-vowel chain shift (ō > ū, ā > ō), apocope
//   3. stress (fixpoint group)
//   4. post-stress: stressed open-syllable lengthening, unstressed shortening
//   5. sandhi (fixpoint group, on consonant clusters)
//   6. final devoicing, degemination, long-liquid absorption
// Cleanup: stressed vowel -> accented vowel, markers dropped, long liquids
// spelled `ll`/`rr`.
//
// No rule after the stress group inserts or deletes a vowel, so the stress
// marker count entering cleanup still matches the syllable count.

use crate::config::{
    AliasDef, ClassDef, DEFAULT_MAX_PASSES, GroupDef, LanguageDef, RuleDef, SandhiDef, StepDef,
    SymbolDef,
};
use crate::rule::Replacement;
use crate::tables::{Place, SoundTables, Transform};

/// External notation, in encoding order: entities, then digraphs, then `'`.
const SYMBOLS: &[(&str, char)] = &[
    ("&amacr;", 'ā'),
    ("&emacr;", 'ē'),
    ("&imacr;", 'ī'),
    ("&omacr;", 'ō'),
    ("&umacr;", 'ū'),
    ("&aacute;", 'á'),
    ("&eacute;", 'é'),
    ("&iacute;", 'í'),
    ("&oacute;", 'ó'),
    ("&uacute;", 'ú'),
    ("&acirc;", 'â'),
    ("&ecirc;", 'ê'),
    ("&icirc;", 'î'),
    ("&ocirc;", 'ô'),
    ("&ucirc;", 'û'),
    ("&eng;", 'ŋ'),
    ("&scaron;", 'ʃ'),
    ("&zcaron;", 'ʒ'),
    ("&ccaron;", 'ʧ'),
    ("&jcaron;", 'ʤ'),
    ("&eth;", 'ð'),
    ("&lstrok;", 'ł'),
    ("&rcaron;", 'ř'),
    ("th", 'θ'),
    ("kh", 'χ'),
    ("'", 'ʔ'),
];

const CLASSES: &[(char, &str)] = &[
    ('V', "aeiouāēīōū"),
    ('S', "aeiou"),
    ('L', "āēīōū"),
    ('C', "ptkbdgʔmnŋfvszʃʒθðχhʧʤlrłřwj"),
    // Simple consonants: everything but the long liquids.
    ('B', "ptkbdgʔmnŋfvszʃʒθðχhʧʤlrwj"),
    ('P', "ptkbdg"),
    ('T', "ptk"),
    ('D', "bdg"),
    ('N', "mnŋ"),
    // Voiceless obstruents.
    ('O', "ptkfsʃθχʧ"),
];

const PLACES: &[(char, Place)] = &[
    ('p', Place::Labial),
    ('b', Place::Labial),
    ('m', Place::Labial),
    ('f', Place::Labial),
    ('v', Place::Labial),
    ('θ', Place::Dental),
    ('ð', Place::Dental),
    ('t', Place::Alveolar),
    ('d', Place::Alveolar),
    ('n', Place::Alveolar),
    ('s', Place::Alveolar),
    ('z', Place::Alveolar),
    ('l', Place::Alveolar),
    ('r', Place::Alveolar),
    ('ʃ', Place::Postalveolar),
    ('ʒ', Place::Postalveolar),
    ('ʧ', Place::Postalveolar),
    ('ʤ', Place::Postalveolar),
    ('k', Place::Velar),
    ('g', Place::Velar),
    ('ŋ', Place::Velar),
    ('χ', Place::Velar),
    ('h', Place::Glottal),
    ('ʔ', Place::Glottal),
];

const NASALS: &[(Place, char)] = &[
    (Place::Labial, 'm'),
    (Place::Dental, 'n'),
    (Place::Alveolar, 'n'),
    (Place::Postalveolar, 'n'),
    (Place::Velar, 'ŋ'),
];

const VOICING: &[(char, char)] = &[
    ('p', 'b'),
    ('t', 'd'),
    ('k', 'g'),
    ('f', 'v'),
    ('s', 'z'),
    ('ʃ', 'ʒ'),
    ('θ', 'ð'),
    ('ʧ', 'ʤ'),
];

const LENGTH: &[(char, char)] = &[('a', 'ā'), ('e', 'ē'), ('i', 'ī'), ('o', 'ō'), ('u', 'ū')];

const ACCENT: &[(char, char)] = &[
    ('a', 'á'),
    ('e', 'é'),
    ('i', 'í'),
    ('o', 'ó'),
    ('u', 'ú'),
    ('ā', 'â'),
    ('ē', 'ê'),
    ('ī', 'î'),
    ('ō', 'ô'),
    ('ū', 'û'),
];

/// Stress moves left onto a preceding syllable closed by a geminate, a long
/// liquid, or a two-consonant coda+onset.
const RETRACT: &str = "(V)(C2[^V]*|[łř][^V]*|CC[^V]*)(V)1";

fn lit(name: &str, pattern: &str, replacement: &str) -> RuleDef {
    RuleDef {
        name: name.to_string(),
        pattern: pattern.to_string(),
        replacement: Replacement::Literal(replacement.to_string()),
    }
}

fn computed(name: &str, pattern: &str, transform: Transform, target: usize) -> RuleDef {
    RuleDef {
        name: name.to_string(),
        pattern: pattern.to_string(),
        replacement: Replacement::Computed { transform, target },
    }
}

fn step(rule: RuleDef) -> StepDef {
    StepDef::Rule(rule)
}

fn stress_group() -> GroupDef {
    GroupDef {
        once: vec![
            lit("mark-geminates", r"(C)\1", "${1}2"),
            lit(
                "antepenult-stress",
                "^(.*V[^V]*)(V)([^V]*V[^V]*V[^V]*)$",
                "${1}${2}1${3}",
            ),
            lit("penult-stress", "^(?!.*1)(.*?)(V)([^V]*V[^V]*)$", "${1}${2}1${3}"),
            lit("retract-to-closed", RETRACT, "${1}1${2}${3}"),
        ],
        repeat: vec![
            lit("shift-left-if-closed", RETRACT, "${1}1${2}${3}"),
            lit("degeminate-after-stress", "(V1)(C)2", "${1}${2}"),
        ],
    }
}

fn sandhi_group() -> SandhiDef {
    SandhiDef {
        cluster: "(?:C2?){2,}".to_string(),
        once: vec![],
        repeat: vec![
            lit("h-deletion", "h2?", ""),
            computed("nasal-assimilation", "(N)(P)", Transform::NasalPlace, 1),
            // Each of these takes a whole run of like segments in one match.
            computed("plosive-devoicing", "(D+)(?=O)", Transform::Devoice, 1),
            computed("plosive-voicing", "(T+)(?=D)", Transform::Voice, 1),
            lit("affricate-reduction-voiceless", "ʧ(?=C)", "ʃ"),
            lit("affricate-reduction-voiced", "ʤ(?=C)", "ʒ"),
            lit("sibilant-reduction", "[sz]+([ʃʒ])", "$1"),
            lit("dental-fricative-loss", "[θð]+(?=[sz])", ""),
            lit(
                "stop-fricative-merger",
                "(?:[td]2?)+(?=[θð])|(?:[kg]2?)+(?=χ)",
                "",
            ),
            lit("nasal-liquid-merger", "[nr]l", "ł"),
            lit("nr-epenthesis", "nr", "ndr"),
            lit("ml-epenthesis", "ml", "mbl"),
        ],
    }
}

fn main_rules() -> Vec<StepDef> {
    vec![
        step(lit("strip-stray-markers", "[12]", "")),
        step(lit("erase-boundaries", "-", "")),
        step(lit("long-l", "ll", "ł")),
        step(lit("long-r", "rr", "ř")),
        step(lit("initial-h-loss", "^h(?=V)", "")),
        step(computed("intervocalic-voicing", "(V)(T)(?=V)", Transform::Voice, 2)),
        step(lit("syncope", "^([^V]*V)(C)S(C)(?=V)", "${1}${2}${3}")),
        step(lit("a-umlaut", "a(?=Ci)", "e")),
        step(lit("raise-long-o", "ō", "ū")),
        step(lit("raise-long-a", "ā", "ō")),
        step(lit("apocope", "(V[^V]*C)e$", "$1")),
        StepDef::Stress,
        step(computed("open-syllable-lengthening", "(S)(1)(?=BV|V)", Transform::Lengthen, 1)),
        step(computed("unstressed-shortening", "(L)(?!1)", Transform::Shorten, 1)),
        StepDef::Sandhi,
        step(computed("final-devoicing", "(D)(2?)$", Transform::Devoice, 1)),
        step(lit("degemination", r"(C)\1+", "$1")),
        step(lit("absorb-long-l", "[lł2]*ł[lł2]*", "ł")),
        step(lit("absorb-long-r", "[rř2]*ř[rř2]*", "ř")),
    ]
}

fn cleanup_rules() -> Vec<RuleDef> {
    vec![
        computed("mark-stress", "(V)1", Transform::Accent, 1),
        lit("drop-stress-marker", "1", ""),
        lit("drop-geminate-flags", r"(C)(?:2|\1)+", "$1"),
        lit("spell-long-l", "ł", "ll"),
        lit("spell-long-r", "ř", "rr"),
    ]
}

fn tables() -> SoundTables {
    SoundTables {
        place: PLACES.iter().copied().collect(),
        nasal_by_place: NASALS.iter().copied().collect(),
        voicing: VOICING.iter().copied().collect(),
        length: LENGTH.iter().copied().collect(),
        accent: ACCENT.iter().copied().collect(),
    }
}

/// The complete Old Daric -> Daric definition.
pub fn ancestral_def() -> LanguageDef {
    LanguageDef {
        name: "Old Daric > Daric".to_string(),
        symbols: SYMBOLS
            .iter()
            .map(|&(external, internal)| SymbolDef {
                external: external.to_string(),
                internal,
            })
            .collect(),
        aliases: vec![AliasDef {
            from: "’".to_string(),
            to: "'".to_string(),
        }],
        classes: CLASSES
            .iter()
            .map(|&(name, members)| ClassDef {
                name,
                members: members.to_string(),
            })
            .collect(),
        tables: tables(),
        stress: stress_group(),
        sandhi: sandhi_group(),
        rules: main_rules(),
        cleanup: cleanup_rules(),
        max_passes: DEFAULT_MAX_PASSES,
    }
}
