//! Error types for building a language and evolving words.
//!
//! Construction problems (`ConfigError`) surface once, from
//! `Language::from_def`/`from_json`. Per-word problems (`EvolveError`) come
//! out of `evolve()` for that word only; bulk callers record them and move on.

use thiserror::Error;

/// A language definition that cannot be turned into a working pipeline.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The definition JSON did not parse.
    #[error("language definition JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The symbol table is unusable (duplicate, empty, or ASCII internal symbol).
    #[error("symbol table: {0}")]
    Codec(String),

    /// A rule pattern names a class placeholder that is not registered.
    #[error("rule '{rule}' references undefined class '{class}'")]
    UndefinedClass { rule: String, class: char },

    /// A class member would change the meaning of an expanded pattern.
    #[error("class '{class}' contains regex metacharacter '{member}'")]
    InvalidClassMember { class: char, member: char },

    /// The expanded pattern is not a valid regex.
    #[error("rule '{rule}' has invalid pattern: {error}")]
    InvalidPattern {
        rule: String,
        #[source]
        error: Box<fancy_regex::Error>,
    },

    /// The pattern can match zero characters, which would insert text
    /// between segments.
    #[error("rule '{rule}' pattern can match zero characters")]
    EmptyMatch { rule: String },

    /// A computed replacement targets a capture group the pattern lacks.
    #[error("rule '{rule}' targets group {target} but the pattern has {groups} groups")]
    TargetOutOfRange {
        rule: String,
        target: usize,
        groups: usize,
    },

    /// A fixpoint group has no rules to iterate.
    #[error("fixpoint group '{group}' has no repeat rules")]
    EmptyGroup { group: &'static str },
}

/// A single word that could not be evolved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvolveError {
    /// A rule could not produce a replacement for one of its matches.
    #[error("rule '{rule}' failed on '{input}': {detail}")]
    RuleApplication {
        rule: String,
        input: String,
        detail: String,
    },

    /// A fixpoint sub-engine hit its pass bound without stabilising.
    #[error("{group} did not converge; stalled at '{form}'")]
    NonConvergence { group: &'static str, form: String },
}
