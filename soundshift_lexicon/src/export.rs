// Bulk lexicon exporter.
//
// Evolves every headword of a lexicon through a `Language` in parallel
// (rayon; `Language` is `Sync` and each evolve call owns its state). A word
// that fails to evolve is recorded in `ExportReport::failures` and logged;
// the rest of the lexicon is unaffected. Output order follows the lexicon.

use crate::types::{DerivedEntry, LexEntry};
use crate::Lexicon;
use rayon::prelude::*;
use serde::Serialize;
use soundshift_engine::{EvolveError, Language};
use std::io::Write;

/// A headword that could not be evolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub form: String,
    pub gloss: String,
    pub error: EvolveError,
}

/// Result of exporting a lexicon.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub entries: Vec<DerivedEntry>,
    pub failures: Vec<ExportFailure>,
}

#[derive(Serialize)]
struct WordListFile<'a> {
    language: &'a str,
    words: &'a [DerivedEntry],
}

impl ExportReport {
    /// Write the successful entries as a JSON word list.
    pub fn write_json(&self, language: &str, writer: impl Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(
            writer,
            &WordListFile {
                language,
                words: &self.entries,
            },
        )
    }
}

fn derive_entry(
    language: &Language,
    entry: &LexEntry,
    with_derivation: bool,
) -> Result<DerivedEntry, EvolveError> {
    let forms = language.evolve(&entry.form)?;
    let descendant = forms.last().cloned().unwrap_or_default();
    Ok(DerivedEntry {
        ancestral: entry.form.clone(),
        descendant,
        gloss: entry.gloss.clone(),
        pos: entry.pos,
        derivation: if with_derivation { forms } else { Vec::new() },
    })
}

/// Evolve every entry of `lexicon`.
pub fn export_lexicon(
    language: &Language,
    lexicon: &Lexicon,
    with_derivation: bool,
) -> ExportReport {
    let results: Vec<(&LexEntry, Result<DerivedEntry, EvolveError>)> = lexicon
        .all()
        .par_iter()
        .map(|entry| (entry, derive_entry(language, entry, with_derivation)))
        .collect();

    let mut report = ExportReport::default();
    for (entry, result) in results {
        match result {
            Ok(derived) => report.entries.push(derived),
            Err(error) => {
                tracing::warn!(form = %entry.form, gloss = %entry.gloss, %error, "skipping word");
                report.failures.push(ExportFailure {
                    form: entry.form.clone(),
                    gloss: entry.gloss.clone(),
                    error,
                });
            }
        }
    }
    tracing::info!(
        language = language.name(),
        exported = report.entries.len(),
        failed = report.failures.len(),
        "lexicon export finished"
    );
    report
}
