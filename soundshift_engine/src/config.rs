// Data-driven language definition.
//
// A `LanguageDef` is the complete, serialisable description of one
// ancestor -> descendant sound change: symbol table, character classes,
// lookup tables, the two fixpoint groups, the ordered rule list, and the
// cleanup rules that turn bookkeeping markers into spelling. The built-in
// language (`builtin.rs`) is a `LanguageDef` written in Rust; the same shape
// loads from JSON so a rule table can be iterated on without recompiling.
//
// Nothing here is validated; `Language::from_def` compiles and checks it.

use crate::rule::Replacement;
use crate::tables::SoundTables;
use serde::{Deserialize, Serialize};

/// Default bound on passes per fixpoint invocation.
pub const DEFAULT_MAX_PASSES: usize = 32;

/// One external sequence and the internal symbol it encodes to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDef {
    pub external: String,
    pub internal: char,
}

/// An alternative external spelling normalised before encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasDef {
    pub from: String,
    pub to: String,
}

/// A character class: placeholder letter and member symbols.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: char,
    pub members: String,
}

/// An uncompiled rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDef {
    pub name: String,
    pub pattern: String,
    pub replacement: Replacement,
}

/// Rules for a fixpoint group: `once` runs a single time in order, then
/// `repeat` runs in full passes until nothing changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupDef {
    #[serde(default)]
    pub once: Vec<RuleDef>,
    pub repeat: Vec<RuleDef>,
}

/// The sandhi group plus the pattern that finds the clusters it runs on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandhiDef {
    pub cluster: String,
    #[serde(default)]
    pub once: Vec<RuleDef>,
    pub repeat: Vec<RuleDef>,
}

/// One position in the ordered pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepDef {
    Rule(RuleDef),
    Stress,
    Sandhi,
}

/// Complete definition of one language's sound changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDef {
    pub name: String,
    pub symbols: Vec<SymbolDef>,
    #[serde(default)]
    pub aliases: Vec<AliasDef>,
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub tables: SoundTables,
    pub stress: GroupDef,
    pub sandhi: SandhiDef,
    pub rules: Vec<StepDef>,
    #[serde(default)]
    pub cleanup: Vec<RuleDef>,
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,
}

fn default_max_passes() -> usize {
    DEFAULT_MAX_PASSES
}

impl LanguageDef {
    /// Parse a definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialise the definition as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::Transform;

    #[test]
    fn test_step_def_json_shape() {
        let json = r#"[
            {"step": "rule", "name": "h-loss", "pattern": "^h", "replacement": {"literal": ""}},
            {"step": "stress"},
            {"step": "sandhi"},
            {"step": "rule", "name": "voice", "pattern": "(V)(T)",
             "replacement": {"computed": {"transform": "voice", "target": 2}}}
        ]"#;
        let steps: Vec<StepDef> = serde_json::from_str(json).unwrap();
        assert_eq!(steps.len(), 4);
        assert!(matches!(&steps[0], StepDef::Rule(r) if r.name == "h-loss"));
        assert!(matches!(steps[1], StepDef::Stress));
        assert!(matches!(steps[2], StepDef::Sandhi));
        match &steps[3] {
            StepDef::Rule(r) => assert_eq!(
                r.replacement,
                Replacement::Computed {
                    transform: Transform::Voice,
                    target: 2
                }
            ),
            other => panic!("expected rule, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_applied() {
        let json = r#"{
            "name": "tiny",
            "symbols": [],
            "classes": [],
            "stress": {"repeat": []},
            "sandhi": {"cluster": "xx", "repeat": []},
            "rules": []
        }"#;
        let def = LanguageDef::from_json(json).unwrap();
        assert_eq!(def.max_passes, DEFAULT_MAX_PASSES);
        assert!(def.aliases.is_empty());
        assert!(def.cleanup.is_empty());
        assert!(def.stress.once.is_empty());
    }
}
