// Soundshift sound-change engine.
//
// Derives a descendant-language form from an ancestor-language word by
// running a strictly ordered battery of rewrite rules. The engine is pure:
// a `Language` is built once from a definition and is then immutable and
// shareable across threads; each `evolve()` call owns its own working state.
//
// Architecture (leaves first):
// - `codec.rs`: external entity notation <-> single internal symbols
// - `classes.rs`: placeholder letters (`C`, `V`, ...) expanded in patterns
// - `tables.rs`: lookup tables and the pure transforms computed rules use
// - `rule.rs`: compiled (pattern, replacement) pairs, per-token application
// - `fixpoint.rs`: bounded stress and sandhi sub-engines
// - `pipeline.rs`: ordered steps, including the two group invocations
// - `config.rs`: serialisable `LanguageDef`
// - `builtin.rs`: the built-in Old Daric -> Daric definition
// - `lib.rs` (this file): `Language` driver, `EncodedWord`, `Derivation`
//
// Errors: construction problems are `ConfigError` and surface once, from
// `Language::from_def`. Per-word problems are `EvolveError`.

pub mod builtin;
pub mod classes;
pub mod codec;
pub mod config;
pub mod error;
pub mod fixpoint;
pub mod pipeline;
pub mod rule;
pub mod tables;

pub use codec::Codec;
pub use config::LanguageDef;
pub use error::{ConfigError, EvolveError};
pub use fixpoint::{Convergence, GroupKind};

use classes::ClassRegistry;
use pipeline::Pipeline;
use tables::SoundTables;

/// Options that do not change the rules themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Keep stress/geminate markers when decoding intermediate forms.
    pub debug: bool,
}

/// A word being evolved: its original text and current internal form.
///
/// Created fresh by every `derive()` call and never shared.
#[derive(Debug)]
pub struct EncodedWord<'a> {
    external: String,
    internal: String,
    codec: &'a Codec,
}

impl<'a> EncodedWord<'a> {
    pub fn new(codec: &'a Codec, external: &str) -> Self {
        EncodedWord {
            external: external.to_string(),
            internal: codec.encode(external),
            codec,
        }
    }

    /// The text the word was created from.
    pub fn external(&self) -> &str {
        &self.external
    }

    pub fn internal(&self) -> &str {
        &self.internal
    }

    /// Replace the internal form. Returns whether it changed.
    pub fn update(&mut self, internal: String) -> bool {
        if internal == self.internal {
            return false;
        }
        self.internal = internal;
        true
    }

    /// The current form in external notation.
    pub fn decoded(&self) -> String {
        self.codec.decode(&self.internal)
    }
}

/// One visible form in a derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Pipeline step that produced this form; `None` for the input.
    pub step: Option<usize>,
    /// Name of that step (`"input"` for the input).
    pub rule: String,
    pub form: String,
}

/// The distinct forms a word passed through, input first, final form last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    stages: Vec<Stage>,
}

impl Derivation {
    fn new(input: &str) -> Self {
        Derivation {
            stages: vec![Stage {
                step: None,
                rule: "input".to_string(),
                form: input.to_string(),
            }],
        }
    }

    /// Append a form unless it matches the last visible one.
    fn record(&mut self, step: usize, rule: &str, form: String) -> bool {
        if self.final_form() == form {
            return false;
        }
        self.stages.push(Stage {
            step: Some(step),
            rule: rule.to_string(),
            form,
        });
        true
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn final_form(&self) -> &str {
        // Never empty: `new` always pushes the input stage.
        self.stages.last().map_or("", |s| s.form.as_str())
    }

    pub fn forms(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.form.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// A compiled language: codec, classes, tables and pipeline.
#[derive(Debug, Clone)]
pub struct Language {
    name: String,
    codec: Codec,
    classes: ClassRegistry,
    tables: SoundTables,
    pipeline: Pipeline,
}

impl Language {
    /// Compile a definition. Every configuration problem is reported here.
    pub fn from_def(def: &LanguageDef, options: EngineOptions) -> Result<Self, ConfigError> {
        let codec = Codec::new(&def.symbols, &def.aliases, options.debug)?;
        let classes = ClassRegistry::new(&def.classes)?;
        let pipeline = Pipeline::build(def, &classes)?;
        tracing::debug!(
            language = %def.name,
            steps = pipeline.len(),
            max_passes = def.max_passes,
            "compiled language"
        );
        Ok(Language {
            name: def.name.clone(),
            codec,
            classes,
            tables: def.tables.clone(),
            pipeline,
        })
    }

    /// Parse and compile a JSON definition.
    pub fn from_json(json: &str, options: EngineOptions) -> Result<Self, ConfigError> {
        let def = LanguageDef::from_json(json)?;
        Self::from_def(&def, options)
    }

    /// The built-in Old Daric -> Daric language.
    ///
    /// Panics only if the built-in tables are broken, which the test suite
    /// rules out.
    pub fn builtin(options: EngineOptions) -> Self {
        Self::from_def(&builtin::ancestral_def(), options)
            .expect("built-in language definition failed to compile")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn tables(&self) -> &SoundTables {
        &self.tables
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Run the full pipeline, recording every distinct visible form.
    pub fn derive(&self, external: &str) -> Result<Derivation, EvolveError> {
        let mut word = EncodedWord::new(&self.codec, external);
        let mut derivation = Derivation::new(word.external());

        for index in 0..self.pipeline.len() {
            let next = self.pipeline.apply_step(index, word.internal(), &self.tables)?;
            if !word.update(next) {
                continue;
            }
            let rule = self.pipeline.step_name(index);
            let visible = word.decoded();
            if derivation.record(index, rule, visible) {
                tracing::debug!(
                    word = external,
                    step = index,
                    rule,
                    form = derivation.final_form(),
                    "stage"
                );
            }
        }
        Ok(derivation)
    }

    /// The distinct forms `external` passes through, ending with the result.
    pub fn evolve(&self, external: &str) -> Result<Vec<String>, EvolveError> {
        Ok(self.derive(external)?.forms())
    }

    /// Just the final evolved form.
    pub fn evolve_final(&self, external: &str) -> Result<String, EvolveError> {
        let word = EncodedWord::new(&self.codec, external);
        let internal = self
            .pipeline
            .apply_range(0..self.pipeline.len(), word.internal(), &self.tables)?;
        if internal == word.internal() {
            return Ok(external.to_string());
        }
        Ok(self.codec.decode(&internal))
    }

    /// The internal form as it enters the cleanup steps, markers included.
    pub fn evolve_uncleaned(&self, external: &str) -> Result<String, EvolveError> {
        let word = EncodedWord::new(&self.codec, external);
        self.pipeline
            .apply_range(0..self.pipeline.cleanup_start(), word.internal(), &self.tables)
    }

    /// Run one fixpoint group alone on every token of `external`.
    ///
    /// The returned form is in external notation; `passes` is the largest
    /// pass count any token or cluster needed.
    pub fn run_group(&self, kind: GroupKind, external: &str) -> Result<Convergence, EvolveError> {
        let group = self.pipeline.group(kind);
        let internal = self.codec.encode(external);
        let mut passes = 0;
        let mut tokens = Vec::new();
        for token in internal.split_whitespace() {
            let converged = group.run(token, &self.tables)?;
            passes = passes.max(converged.passes);
            tokens.push(converged.form);
        }
        Ok(Convergence {
            form: self.codec.decode(&tokens.join(" ")),
            passes,
        })
    }
}
