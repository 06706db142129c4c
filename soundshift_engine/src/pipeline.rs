// The ordered rule pipeline.
//
// A pipeline is the language definition's rule list compiled into steps:
// ordinary rules, plus the stress and sandhi fixpoint groups at the
// positions the definition places them. Cleanup rules (which spell out
// bookkeeping markers and reserved codes) are appended after the main steps;
// `cleanup_start` records where they begin so callers can stop short of them.
//
// The pipeline has no per-word state. `apply_step` is a pure function of
// the step index and the current internal text.

use crate::classes::ClassRegistry;
use crate::config::{LanguageDef, RuleDef, StepDef};
use crate::error::{ConfigError, EvolveError};
use crate::fixpoint::{FixpointGroup, GroupKind, Scope};
use crate::rule::{Rule, map_tokens, reject_empty_matches};
use crate::tables::SoundTables;
use fancy_regex::Regex;

/// One compiled pipeline position.
#[derive(Debug, Clone)]
enum Step {
    Rule(Rule),
    Group(GroupKind),
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Vec<Step>,
    cleanup_start: usize,
    stress: FixpointGroup,
    sandhi: FixpointGroup,
}

impl Pipeline {
    /// Compile every rule in the definition against `classes`.
    pub fn build(def: &LanguageDef, classes: &ClassRegistry) -> Result<Self, ConfigError> {
        let compile_all = |defs: &[RuleDef]| -> Result<Vec<Rule>, ConfigError> {
            defs.iter().map(|d| Rule::compile(d, classes)).collect()
        };

        let stress = FixpointGroup::new(
            GroupKind::Stress,
            Scope::Token,
            compile_all(&def.stress.once)?,
            compile_all(&def.stress.repeat)?,
            def.max_passes,
        )?;

        let cluster_name = "sandhi cluster";
        let cluster_source = classes.expand(cluster_name, &def.sandhi.cluster)?;
        let cluster = Regex::new(&cluster_source).map_err(|error| ConfigError::InvalidPattern {
            rule: cluster_name.to_string(),
            error: Box::new(error),
        })?;
        reject_empty_matches(cluster_name, &cluster, classes)?;
        let sandhi = FixpointGroup::new(
            GroupKind::Sandhi,
            Scope::Matches(cluster),
            compile_all(&def.sandhi.once)?,
            compile_all(&def.sandhi.repeat)?,
            def.max_passes,
        )?;

        let mut steps = Vec::with_capacity(def.rules.len() + def.cleanup.len());
        for step in &def.rules {
            steps.push(match step {
                StepDef::Rule(rule) => Step::Rule(Rule::compile(rule, classes)?),
                StepDef::Stress => Step::Group(GroupKind::Stress),
                StepDef::Sandhi => Step::Group(GroupKind::Sandhi),
            });
        }
        let cleanup_start = steps.len();
        for rule in &def.cleanup {
            steps.push(Step::Rule(Rule::compile(rule, classes)?));
        }

        Ok(Pipeline {
            steps,
            cleanup_start,
            stress,
            sandhi,
        })
    }

    /// Number of steps, cleanup included.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the first cleanup step (equal to `len()` if there are none).
    pub fn cleanup_start(&self) -> usize {
        self.cleanup_start
    }

    /// Display name of a step.
    pub fn step_name(&self, index: usize) -> &str {
        match self.steps.get(index) {
            Some(Step::Rule(rule)) => rule.name(),
            Some(Step::Group(kind)) => kind.label(),
            None => "",
        }
    }

    pub fn group(&self, kind: GroupKind) -> &FixpointGroup {
        match kind {
            GroupKind::Stress => &self.stress,
            GroupKind::Sandhi => &self.sandhi,
        }
    }

    /// Apply step `index` to a (possibly multi-token) internal form.
    pub fn apply_step(
        &self,
        index: usize,
        text: &str,
        tables: &SoundTables,
    ) -> Result<String, EvolveError> {
        match self.steps.get(index) {
            Some(Step::Rule(rule)) => rule.apply_phrase(text, tables),
            Some(Step::Group(kind)) => {
                let group = self.group(*kind);
                map_tokens(text, |token| group.run(token, tables).map(|c| c.form))
            }
            None => Ok(text.to_string()),
        }
    }

    /// Apply steps `range` in order.
    pub fn apply_range(
        &self,
        range: std::ops::Range<usize>,
        text: &str,
        tables: &SoundTables,
    ) -> Result<String, EvolveError> {
        let mut form = text.to_string();
        for index in range {
            form = self.apply_step(index, &form, tables)?;
        }
        Ok(form)
    }
}
