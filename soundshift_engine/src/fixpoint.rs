// Fixpoint sub-engines: stress assignment and sandhi (cluster) simplification.
//
// Most rules run exactly once, in pipeline order. These two groups instead
// run until the word stops changing:
//
//   once:   each rule a single time, in order
//   repeat: full passes over every rule, in order, until one pass changes
//           nothing
//
// The stress group works on the whole token. The sandhi group works on each
// consonant cluster found by its cluster pattern, iterating on the cluster
// substring alone and splicing the result back.
//
// Every invocation is bounded by `max_passes`. `iterate` reports hitting
// the bound as `FixpointOutcome::Exhausted` rather than looping; `run`
// turns that into `EvolveError::NonConvergence`.

use crate::error::{ConfigError, EvolveError};
use crate::rule::Rule;
use crate::tables::SoundTables;
use fancy_regex::Regex;

/// Which of the two sub-engines a group is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Stress,
    Sandhi,
}

impl GroupKind {
    pub fn label(self) -> &'static str {
        match self {
            GroupKind::Stress => "stress",
            GroupKind::Sandhi => "sandhi",
        }
    }
}

/// What part of a token the group iterates on.
#[derive(Debug, Clone)]
pub enum Scope {
    /// The whole token.
    Token,
    /// Each non-overlapping match of the pattern, independently.
    Matches(Regex),
}

/// Result of iterating a group on one unit of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixpointOutcome {
    /// A full pass left the text unchanged. `passes` counts that final pass.
    Converged { form: String, passes: usize },
    /// The pass bound was reached while the text was still changing.
    Exhausted { form: String },
}

/// A converged token and the most passes any unit in it needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergence {
    pub form: String,
    pub passes: usize,
}

/// A compiled fixpoint group.
#[derive(Debug, Clone)]
pub struct FixpointGroup {
    kind: GroupKind,
    scope: Scope,
    once: Vec<Rule>,
    repeat: Vec<Rule>,
    max_passes: usize,
}

impl FixpointGroup {
    pub fn new(
        kind: GroupKind,
        scope: Scope,
        once: Vec<Rule>,
        repeat: Vec<Rule>,
        max_passes: usize,
    ) -> Result<Self, ConfigError> {
        if repeat.is_empty() {
            return Err(ConfigError::EmptyGroup { group: kind.label() });
        }
        Ok(FixpointGroup {
            kind,
            scope,
            once,
            repeat,
            max_passes: max_passes.max(1),
        })
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Iterate the group on one unit (a token, or a cluster) to a fixpoint.
    pub fn iterate(
        &self,
        unit: &str,
        tables: &SoundTables,
    ) -> Result<FixpointOutcome, EvolveError> {
        let mut form = unit.to_string();
        for rule in &self.once {
            form = rule.apply_token(&form, tables)?;
        }

        for pass in 1..=self.max_passes {
            let mut next = form.clone();
            for rule in &self.repeat {
                next = rule.apply_token(&next, tables)?;
            }
            if next == form {
                return Ok(FixpointOutcome::Converged { form, passes: pass });
            }
            tracing::trace!(
                group = self.kind.label(),
                pass,
                from = %form,
                to = %next,
                "fixpoint pass"
            );
            form = next;
        }
        Ok(FixpointOutcome::Exhausted { form })
    }

    /// Run the group over one token, honouring its scope.
    pub fn run(&self, token: &str, tables: &SoundTables) -> Result<Convergence, EvolveError> {
        match &self.scope {
            Scope::Token => self.converge(token, tables),
            Scope::Matches(pattern) => {
                let mut out = String::with_capacity(token.len());
                let mut last = 0;
                let mut passes = 0;
                for found in pattern.find_iter(token) {
                    let found = found.map_err(|e| EvolveError::RuleApplication {
                        rule: format!("{} cluster", self.kind.label()),
                        input: token.to_string(),
                        detail: e.to_string(),
                    })?;
                    out.push_str(&token[last..found.start()]);
                    let cluster = self.converge(found.as_str(), tables)?;
                    out.push_str(&cluster.form);
                    passes = passes.max(cluster.passes);
                    last = found.end();
                }
                out.push_str(&token[last..]);
                Ok(Convergence { form: out, passes })
            }
        }
    }

    fn converge(&self, unit: &str, tables: &SoundTables) -> Result<Convergence, EvolveError> {
        match self.iterate(unit, tables)? {
            FixpointOutcome::Converged { form, passes } => Ok(Convergence { form, passes }),
            FixpointOutcome::Exhausted { form } => Err(EvolveError::NonConvergence {
                group: self.kind.label(),
                form,
            }),
        }
    }
}
