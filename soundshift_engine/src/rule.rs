// A single compiled rewrite rule.
//
// A rule is an immutable (pattern, replacement) pair. Application is plain
// global substitution: leftmost, non-overlapping matches found in one
// left-to-right scan; once a span is consumed the scan resumes after it and
// replaced text is never re-examined in the same application.
//
// Rules operate on one whitespace-free token at a time (`apply_token`).
// `apply_phrase` is the explicit split / map / rejoin wrapper for
// multi-word input, so a pattern can never reach across a word boundary.

use crate::classes::ClassRegistry;
use crate::config::RuleDef;
use crate::error::{ConfigError, EvolveError};
use crate::tables::{SoundTables, Transform};
use fancy_regex::Regex;
use serde::{Deserialize, Serialize};

/// How a match is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Replacement {
    /// Template with `$n` / `${n}` backreferences and `$$` for a literal `$`.
    Literal(String),
    /// The whole match with the span of group `target` replaced by
    /// `transform` of itself. Text outside that group, grouped or not, is
    /// kept as matched. The transform also sees group `target + 1` as its
    /// following context. A target group that did not participate leaves
    /// the match unchanged.
    Computed { transform: Transform, target: usize },
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    pattern: Regex,
    replacement: Replacement,
}

impl Rule {
    /// Expand class placeholders and compile the pattern.
    pub fn compile(def: &RuleDef, classes: &ClassRegistry) -> Result<Self, ConfigError> {
        let source = classes.expand(&def.name, &def.pattern)?;
        let pattern = Regex::new(&source).map_err(|error| ConfigError::InvalidPattern {
            rule: def.name.clone(),
            error: Box::new(error),
        })?;
        reject_empty_matches(&def.name, &pattern, classes)?;
        if let Replacement::Computed { target, .. } = def.replacement {
            // captures_len counts group 0.
            let groups = pattern.captures_len() - 1;
            if target == 0 || target > groups {
                return Err(ConfigError::TargetOutOfRange {
                    rule: def.name.clone(),
                    target,
                    groups,
                });
            }
        }
        Ok(Rule {
            name: def.name.clone(),
            pattern,
            replacement: def.replacement.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the rule to a single token.
    pub fn apply_token(&self, token: &str, tables: &SoundTables) -> Result<String, EvolveError> {
        let mut out = String::with_capacity(token.len() + 4);
        let mut last = 0;
        let mut groups: Vec<&str> = Vec::new();

        for caps in self.pattern.captures_iter(token) {
            let caps = caps.map_err(|e| self.failure(token, e.to_string()))?;
            let Some(whole) = caps.get(0) else {
                continue;
            };
            groups.clear();
            groups.extend((0..caps.len()).map(|i| caps.get(i).map_or("", |m| m.as_str())));

            out.push_str(&token[last..whole.start()]);
            match &self.replacement {
                Replacement::Literal(template) => expand_template(template, &groups, &mut out),
                Replacement::Computed { transform, target } => {
                    let Some(group) = caps.get(*target) else {
                        out.push_str(whole.as_str());
                        last = whole.end();
                        continue;
                    };
                    if group.start() < whole.start() || group.end() > whole.end() {
                        return Err(self.failure(
                            token,
                            format!("group {target} lies outside the consumed match"),
                        ));
                    }
                    let following = groups.get(target + 1).copied().unwrap_or("");
                    let replaced = transform
                        .apply(group.as_str(), following, tables)
                        .map_err(|detail| self.failure(token, detail))?;
                    out.push_str(&token[whole.start()..group.start()]);
                    out.push_str(&replaced);
                    out.push_str(&token[group.end()..whole.end()]);
                }
            }
            last = whole.end();
        }
        out.push_str(&token[last..]);
        Ok(out)
    }

    /// Apply the rule to each whitespace-separated token of `text`.
    ///
    /// Tokens are rejoined with single spaces, but only if some token
    /// changed; otherwise the input is returned as-is.
    pub fn apply_phrase(&self, text: &str, tables: &SoundTables) -> Result<String, EvolveError> {
        map_tokens(text, |token| self.apply_token(token, tables))
    }

    fn failure(&self, input: &str, detail: String) -> EvolveError {
        EvolveError::RuleApplication {
            rule: self.name.clone(),
            input: input.to_string(),
            detail,
        }
    }
}

/// Fail with `EmptyMatch` if `pattern` can match zero characters.
///
/// Checked against the empty string and against every class member in
/// both orders plus the markers, which catches bare lookarounds like `(?=V)`.
pub(crate) fn reject_empty_matches(
    name: &str,
    pattern: &Regex,
    classes: &ClassRegistry,
) -> Result<(), ConfigError> {
    let sample = classes.sample();
    let empty = pattern.is_match("").unwrap_or(false)
        || pattern
            .find_iter(&sample)
            .any(|found| found.is_ok_and(|m| m.start() == m.end()));
    if empty {
        return Err(ConfigError::EmptyMatch {
            rule: name.to_string(),
        });
    }
    Ok(())
}

/// Run a fallible per-token transform over every token of a phrase.
pub(crate) fn map_tokens(
    text: &str,
    mut f: impl FnMut(&str) -> Result<String, EvolveError>,
) -> Result<String, EvolveError> {
    let mut changed = false;
    let mut tokens = Vec::new();
    for token in text.split_whitespace() {
        let next = f(token)?;
        changed |= next != token;
        tokens.push(next);
    }
    if changed {
        Ok(tokens.join(" "))
    } else {
        Ok(text.to_string())
    }
}

/// Append `template` to `out`, substituting `$n`, `${n}` and `$$`.
/// References to groups that did not participate expand to nothing.
fn expand_template(template: &str, groups: &[&str], out: &mut String) {
    let mut rest = template;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];

        if let Some(after) = rest.strip_prefix('$') {
            out.push('$');
            rest = after;
            continue;
        }
        let (digits, tail) = if let Some(braced) = rest.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], &braced[end + 1..]),
                None => ("", rest),
            }
        } else {
            let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            (&rest[..end], &rest[end..])
        };
        match digits.parse::<usize>() {
            Ok(n) => {
                out.push_str(groups.get(n).copied().unwrap_or(""));
                rest = tail;
            }
            Err(_) => out.push('$'),
        }
    }
    out.push_str(rest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassDef;
    use crate::tables::Place;

    fn classes() -> ClassRegistry {
        ClassRegistry::new(&[
            ClassDef {
                name: 'V',
                members: "aeiou".to_string(),
            },
            ClassDef {
                name: 'C',
                members: "ptkbdgmnsh".to_string(),
            },
            ClassDef {
                name: 'N',
                members: "mn".to_string(),
            },
            ClassDef {
                name: 'P',
                members: "ptkbdg".to_string(),
            },
        ])
        .unwrap()
    }

    fn rule(pattern: &str, replacement: Replacement) -> Rule {
        Rule::compile(
            &RuleDef {
                name: "test".to_string(),
                pattern: pattern.to_string(),
                replacement,
            },
            &classes(),
        )
        .unwrap()
    }

    fn lit(s: &str) -> Replacement {
        Replacement::Literal(s.to_string())
    }

    fn tables() -> SoundTables {
        SoundTables {
            place: [('p', Place::Labial), ('t', Place::Alveolar)].into_iter().collect(),
            nasal_by_place: [(Place::Labial, 'm'), (Place::Alveolar, 'n')]
                .into_iter()
                .collect(),
            voicing: [('p', 'b'), ('t', 'd'), ('k', 'g')].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_literal_backreferences() {
        let r = rule("(V)h(V)", lit("${1}$2$$"));
        assert_eq!(r.apply_token("kahe", &tables()).unwrap(), "kae$");
    }

    #[test]
    fn test_non_overlapping_left_to_right() {
        // "aaa": the first match consumes "aa", the third "a" is alone.
        let r = rule("aa", lit("b"));
        assert_eq!(r.apply_token("aaa", &tables()).unwrap(), "ba");
        // Replaced text is not re-examined within one application.
        let r = rule("ab", lit("aab"));
        assert_eq!(r.apply_token("ab", &tables()).unwrap(), "aab");
    }

    #[test]
    fn test_consumed_context_blocks_adjacent_match() {
        let r = rule("(V)t(V)", lit("${1}d$2"));
        assert_eq!(r.apply_token("atata", &tables()).unwrap(), "adata");
        let r = rule("(V)t(?=V)", lit("${1}d"));
        assert_eq!(r.apply_token("atata", &tables()).unwrap(), "adada");
    }

    #[test]
    fn test_computed_voice() {
        let r = rule(
            "(V)([ptk])(?=V)",
            Replacement::Computed {
                transform: Transform::Voice,
                target: 2,
            },
        );
        assert_eq!(r.apply_token("apaka", &tables()).unwrap(), "abaga");
    }

    #[test]
    fn test_computed_nasal_place_and_missing_entry() {
        let r = rule(
            "(N)(P)",
            Replacement::Computed {
                transform: Transform::NasalPlace,
                target: 1,
            },
        );
        assert_eq!(r.apply_token("anpa", &tables()).unwrap(), "ampa");
        match r.apply_token("anka", &tables()) {
            Err(EvolveError::RuleApplication { rule, input, detail }) => {
                assert_eq!(rule, "test");
                assert_eq!(input, "anka");
                assert!(detail.contains("'k'"), "{detail}");
            }
            other => panic!("expected RuleApplication, got {other:?}"),
        }
    }

    #[test]
    fn test_backreference_geminate() {
        let r = rule("(C)\\1", lit("${1}2"));
        assert_eq!(r.apply_token("katta", &tables()).unwrap(), "kat2a");
        assert_eq!(r.apply_token("kata", &tables()).unwrap(), "kata");
    }

    #[test]
    fn test_phrase_applies_per_token() {
        let r = rule("a$", lit("e"));
        assert_eq!(r.apply_phrase("kata  pana", &tables()).unwrap(), "kate pane");
        // Untouched phrases keep their original spacing.
        assert_eq!(r.apply_phrase("kit  pun", &tables()).unwrap(), "kit  pun");
        assert_eq!(r.apply_phrase("   ", &tables()).unwrap(), "   ");
        assert_eq!(r.apply_phrase("", &tables()).unwrap(), "");
    }

    #[test]
    fn test_compile_errors() {
        let def = |pattern: &str, replacement| RuleDef {
            name: "bad".to_string(),
            pattern: pattern.to_string(),
            replacement,
        };
        assert!(matches!(
            Rule::compile(&def("(Z)", lit("")), &classes()),
            Err(ConfigError::UndefinedClass { class: 'Z', .. })
        ));
        assert!(matches!(
            Rule::compile(&def("(a", lit("")), &classes()),
            Err(ConfigError::InvalidPattern { .. })
        ));
        assert!(matches!(
            Rule::compile(&def("a*", lit("")), &classes()),
            Err(ConfigError::EmptyMatch { .. })
        ));
        assert!(matches!(
            Rule::compile(
                &def(
                    "(a)",
                    Replacement::Computed {
                        transform: Transform::Voice,
                        target: 2
                    }
                ),
                &classes()
            ),
            Err(ConfigError::TargetOutOfRange { groups: 1, .. })
        ));
    }

    #[test]
    fn test_zero_width_patterns_rejected() {
        for pattern in ["(?=V)", "(?<=C)(?=V)", "h?(?=V)"] {
            let def = RuleDef {
                name: "insert".to_string(),
                pattern: pattern.to_string(),
                replacement: lit("x"),
            };
            assert!(
                matches!(Rule::compile(&def, &classes()), Err(ConfigError::EmptyMatch { .. })),
                "{pattern}"
            );
        }
    }

    #[test]
    fn test_computed_keeps_ungrouped_text() {
        let r = rule(
            "(N)x(P)",
            Replacement::Computed {
                transform: Transform::NasalPlace,
                target: 1,
            },
        );
        assert_eq!(r.apply_token("anxpa", &tables()).unwrap(), "amxpa");
    }

    #[test]
    fn test_computed_nested_groups_emitted_once() {
        let r = rule(
            "((N)(P))",
            Replacement::Computed {
                transform: Transform::NasalPlace,
                target: 2,
            },
        );
        assert_eq!(r.apply_token("anpa", &tables()).unwrap(), "ampa");
        assert_eq!(r.apply_token("kanpanpa", &tables()).unwrap(), "kampampa");
    }

    #[test]
    fn test_computed_skips_unmatched_target() {
        let r = rule(
            "(N)|(t)a",
            Replacement::Computed {
                transform: Transform::Voice,
                target: 2,
            },
        );
        assert_eq!(r.apply_token("mta", &tables()).unwrap(), "mda");
    }

    #[test]
    fn test_template_edge_cases() {
        let mut out = String::new();
        expand_template("x$9y$", &["whole", "one"], &mut out);
        assert_eq!(out, "xy$");
        let mut out = String::new();
        expand_template("${1}0", &["whole", "one"], &mut out);
        assert_eq!(out, "one0");
    }
}
