// Synthetic consonant-cluster sweep for the sandhi group.
//
// Builds `a` + cluster + `a` words over the language's `C` class and runs
// the sandhi group on each in isolation. Two families are swept: every
// cluster of a short length range, and long clusters made by cycling the
// whole class from each starting member. The report records how many passes
// each word needed, so a rule change that makes the group slow to settle
// (or never settle) shows up before it reaches the lexicon.

use soundshift_engine::{EvolveError, GroupKind, Language};
use std::collections::BTreeMap;

/// Class whose members make up the swept clusters.
pub const CONSONANT_CLASS: char = 'C';

/// A word the sandhi group did not settle on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepFailure {
    pub word: String,
    pub error: EvolveError,
}

/// Aggregated sweep results.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub words: usize,
    /// Number of words that settled after each pass count.
    pub passes: BTreeMap<usize, usize>,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    /// Largest pass count any settled word needed.
    pub fn max_passes(&self) -> usize {
        self.passes.keys().next_back().copied().unwrap_or(0)
    }
}

/// Every cluster of `min_len..=max_len` consonants, as internal text.
///
/// Returns `None` if the language has no consonant class.
pub fn short_clusters(language: &Language, min_len: usize, max_len: usize) -> Option<Vec<String>> {
    let consonants: Vec<char> = language.classes().members(CONSONANT_CLASS)?.chars().collect();
    let mut words = Vec::new();
    let mut layer: Vec<String> = vec![String::new()];
    for len in 1..=max_len {
        layer = layer
            .iter()
            .flat_map(|prefix| {
                consonants.iter().map(move |&c| {
                    let mut next = prefix.clone();
                    next.push(c);
                    next
                })
            })
            .collect();
        if len >= min_len {
            words.extend(layer.iter().map(|cluster| format!("a{cluster}a")));
        }
    }
    Some(words)
}

/// Clusters of exactly `len` consonants: the class cycled from each of its
/// members, then each member repeated `len` times.
pub fn long_clusters(language: &Language, len: usize) -> Option<Vec<String>> {
    let consonants: Vec<char> = language.classes().members(CONSONANT_CLASS)?.chars().collect();
    let cycled = (0..consonants.len()).map(|start| {
        consonants
            .iter()
            .cycle()
            .skip(start)
            .take(len)
            .collect::<String>()
    });
    let repeated = consonants.iter().map(|c| c.to_string().repeat(len));
    Some(cycled.chain(repeated).map(|cluster| format!("a{cluster}a")).collect())
}

/// Run the sandhi group on each internal-form word.
pub fn sweep_sandhi(language: &Language, words: Vec<String>) -> SweepReport {
    let mut report = SweepReport {
        words: words.len(),
        ..Default::default()
    };
    for internal in words {
        let word = language.codec().decode(&internal);
        match language.run_group(GroupKind::Sandhi, &word) {
            Ok(converged) => *report.passes.entry(converged.passes).or_insert(0) += 1,
            Err(error) => {
                tracing::warn!(%word, %error, "sandhi did not settle");
                report.failures.push(SweepFailure { word, error });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundshift_engine::EngineOptions;

    fn daric() -> Language {
        Language::builtin(EngineOptions::default())
    }

    #[test]
    fn test_short_cluster_count() {
        let lang = daric();
        let n = lang.classes().members('C').unwrap().chars().count();
        let words = short_clusters(&lang, 2, 2).unwrap();
        assert_eq!(words.len(), n * n);
        let words = short_clusters(&lang, 1, 2).unwrap();
        assert_eq!(words.len(), n + n * n);
        assert!(words.iter().all(|w| w.starts_with('a') && w.ends_with('a')));
    }

    #[test]
    fn test_two_consonant_clusters_settle() {
        let lang = daric();
        let report = sweep_sandhi(&lang, short_clusters(&lang, 2, 2).unwrap());
        assert!(report.failures.is_empty(), "{:?}", report.failures);
        assert_eq!(report.passes.values().sum::<usize>(), report.words);
        assert!(report.max_passes() <= lang.pipeline().group(GroupKind::Sandhi).max_passes());
        // Plenty of clusters are rewritten, so some word needs a second pass.
        assert!(report.max_passes() >= 2);
    }

    #[test]
    fn test_long_clusters_settle_quickly() {
        let lang = daric();
        let n = lang.classes().members('C').unwrap().chars().count();
        let words = long_clusters(&lang, 40).unwrap();
        assert_eq!(words.len(), 2 * n);
        assert!(words.iter().all(|w| w.chars().count() == 42));
        let report = sweep_sandhi(&lang, words);
        assert!(report.failures.is_empty(), "{:?}", report.failures);
        // Pass counts do not grow with cluster length.
        assert!(report.max_passes() <= 4, "{:?}", report.passes);
    }
}
