// Structural invariants of the built-in language.
//
// Checked over a fixed word sample rather than golden outputs: whatever the
// exact descendant forms are, every final form must be free of doubled
// consonants (other than the `ll`/`rr` spellings of long liquids), every
// form entering cleanup must carry exactly one stress marker per
// polysyllable, and the sandhi group must settle on every short cluster and
// on long clusters in a pass count that does not grow with their length.

use soundshift_engine::codec::STRESS_MARK;
use soundshift_engine::{EngineOptions, GroupKind, Language};

const SAMPLE: &[&str] = &[
    "kamatana",
    "t&amacr;ne",
    "pakiru",
    "marin",
    "kalla",
    "malakuti",
    "attta",
    "sappara",
    "hanrelo",
    "ka&ccaron;tha",
    "amlu",
    "tadbe",
    "i&scaron;&scaron;a",
    "korrimanu",
    "habde",
    "&omacr;ra&eng;ku",
    "ne&eth;sa",
    "ulla&lstrok;i",
    "bikhkha",
    "a'a",
    "tan-paro",
    "dinhla",
    "kestu&jcaron;ga",
    "o",
    "ma",
];

fn daric() -> Language {
    Language::builtin(EngineOptions::default())
}

fn vowel_count(lang: &Language, internal: &str) -> usize {
    internal
        .chars()
        .filter(|&c| lang.classes().contains('V', c))
        .count()
}

#[test]
fn test_evolve_is_deterministic() {
    let lang = daric();
    for word in SAMPLE {
        let first = lang.evolve(word).unwrap();
        let second = lang.evolve(word).unwrap();
        assert_eq!(first, second, "{word}");
        assert_eq!(first.first().map(String::as_str), Some(*word));
    }
}

#[test]
fn test_no_doubled_consonants_in_final_forms() {
    let lang = daric();
    for word in SAMPLE {
        let last = lang.evolve_final(word).unwrap();
        let internal: Vec<char> = lang.codec().encode(&last).chars().collect();
        for pair in internal.windows(2) {
            let doubled = pair[0] == pair[1] && lang.classes().contains('C', pair[0]);
            assert!(
                !doubled || pair[0] == 'l' || pair[0] == 'r',
                "{word} -> {last} keeps a doubled {}",
                pair[0]
            );
        }
        // Long liquids are written with exactly two letters.
        assert!(!last.contains("lll") && !last.contains("rrr"), "{word} -> {last}");
    }
}

#[test]
fn test_one_stress_marker_per_polysyllable() {
    let lang = daric();
    for word in SAMPLE {
        let uncleaned = lang.evolve_uncleaned(word).unwrap();
        let marks = uncleaned.chars().filter(|&c| c == STRESS_MARK).count();
        let expected = usize::from(vowel_count(&lang, &uncleaned) >= 2);
        assert_eq!(marks, expected, "{word} -> {uncleaned}");
    }
}

#[test]
fn test_stress_marker_follows_a_vowel() {
    let lang = daric();
    for word in SAMPLE {
        let uncleaned: Vec<char> = lang.evolve_uncleaned(word).unwrap().chars().collect();
        for (i, &c) in uncleaned.iter().enumerate() {
            if c == STRESS_MARK {
                assert!(i > 0 && lang.classes().contains('V', uncleaned[i - 1]), "{word}");
            }
        }
    }
}

#[test]
fn test_sandhi_settles_on_every_short_cluster() {
    let lang = daric();
    let consonants: Vec<char> = lang.classes().members('C').unwrap().chars().collect();
    let bound = lang.pipeline().group(GroupKind::Sandhi).max_passes();
    let mut clusters = Vec::new();
    for &a in &consonants {
        for &b in &consonants {
            clusters.push(format!("{a}{b}"));
            for &c in &consonants {
                clusters.push(format!("{a}{b}{c}"));
            }
        }
    }
    for cluster in clusters {
        let word = lang.codec().decode(&format!("a{cluster}a"));
        let result = lang
            .run_group(GroupKind::Sandhi, &word)
            .unwrap_or_else(|e| panic!("{word}: {e}"));
        assert!(result.passes <= bound, "{word} took {}", result.passes);
    }
}

#[test]
fn test_long_voicing_run_settles_in_two_passes() {
    let lang = daric();
    let word = format!("a{}da", "ptk".repeat(12));
    let result = lang.run_group(GroupKind::Sandhi, &word).unwrap();
    assert_eq!(result.form, format!("a{}da", "bdg".repeat(12)));
    assert_eq!(result.passes, 2);
    let last = lang.evolve_final(&word).unwrap();
    assert_eq!(last, format!("&aacute;{}da", "bdg".repeat(12)));
}

#[test]
fn test_long_runs_reduce_in_two_passes() {
    let lang = daric();
    let cases = [
        (format!("a{}&scaron;a", "s".repeat(20)), "a&scaron;a".to_string()),
        (format!("a{}sa", "th".repeat(20)), "asa".to_string()),
        (format!("a{}tha", "t".repeat(20)), "atha".to_string()),
        (format!("a{}ta", "bdg".repeat(12)), format!("a{}ta", "ptk".repeat(12))),
    ];
    for (word, expected) in &cases {
        let result = lang.run_group(GroupKind::Sandhi, word).unwrap();
        assert_eq!(&result.form, expected, "{word}");
        assert_eq!(result.passes, 2, "{word}");
    }
}

#[test]
fn test_cycled_consonant_class_settles() {
    let lang = daric();
    let consonants: Vec<char> = lang.classes().members('C').unwrap().chars().collect();
    for start in 0..consonants.len() {
        let cluster: String = consonants.iter().cycle().skip(start).take(60).collect();
        let word = lang.codec().decode(&format!("a{cluster}a"));
        let result = lang
            .run_group(GroupKind::Sandhi, &word)
            .unwrap_or_else(|e| panic!("{word}: {e}"));
        assert!(result.passes <= 4, "{word} took {}", result.passes);
        assert!(lang.evolve(&word).is_ok(), "{word}");
    }
}

#[test]
fn test_two_consonant_words_evolve_without_error() {
    let lang = daric();
    let consonants: Vec<char> = lang.classes().members('C').unwrap().chars().collect();
    for &a in &consonants {
        for &b in &consonants {
            let word = lang.codec().decode(&format!("a{a}{b}a"));
            assert!(lang.evolve(&word).is_ok(), "{word}");
        }
    }
}
