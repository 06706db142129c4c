// Character-class registry: single-letter placeholders in rule patterns.
//
// Rule patterns are written against placeholders such as `C` (consonant) or
// `V` (vowel). Before a pattern is compiled, `expand` rewrites each
// placeholder into a character set over the class members. This happens
// once per rule when the pipeline is built; nothing is re-expanded per word.
//
// Placeholders are uppercase ASCII letters, which is why the codec forbids
// ASCII internal symbols: a placeholder can never collide with a segment.

use crate::codec::{GEMINATE_MARK, STRESS_MARK};
use crate::config::ClassDef;
use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;

/// Characters that would change the meaning of a bracket expression or of
/// the surrounding pattern if they appeared as class members.
const FORBIDDEN_MEMBERS: &[char] = &[
    '\\', '[', ']', '^', '-', '(', ')', '{', '}', '|', '.', '*', '+', '?', '$', '&', '~',
];

/// Named sets of internal symbols, keyed by placeholder letter.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: BTreeMap<char, String>,
}

impl ClassRegistry {
    pub fn new(defs: &[ClassDef]) -> Result<Self, ConfigError> {
        let mut classes = BTreeMap::new();
        for def in defs {
            if let Some(bad) = def.members.chars().find(|c| FORBIDDEN_MEMBERS.contains(c)) {
                return Err(ConfigError::InvalidClassMember {
                    class: def.name,
                    member: bad,
                });
            }
            let mut members = String::new();
            for c in def.members.chars() {
                if !members.contains(c) {
                    members.push(c);
                }
            }
            classes.insert(def.name, members);
        }
        Ok(ClassRegistry { classes })
    }

    /// Members of a class, in declared order.
    pub fn members(&self, name: char) -> Option<&str> {
        self.classes.get(&name).map(String::as_str)
    }

    /// Whether `c` belongs to class `name`.
    pub fn contains(&self, name: char, c: char) -> bool {
        self.members(name).is_some_and(|m| m.contains(c))
    }

    /// Every member of every class, forwards then backwards, then the
    /// markers. Compiled patterns are run over this to find zero-width
    /// matches.
    pub fn sample(&self) -> String {
        let forward: String = self.classes.values().map(String::as_str).collect();
        let mut sample: String = forward.chars().chain(forward.chars().rev()).collect();
        sample.push(STRESS_MARK);
        sample.push(GEMINATE_MARK);
        sample
    }

    /// Rewrite every placeholder in `source` into a character set.
    ///
    /// Escapes are copied untouched, including the braced or bracketed
    /// names of `\p{..}`, `\P{..}` and `\k<..>`. So are named-group
    /// headers (`(?P<Name>`, `(?<Name>`) and named backreferences
    /// (`(?P=Name)`). Inside a bracket expression the members are spliced in
    /// bare so `[^V]` stays a single set.
    pub fn expand(&self, rule: &str, source: &str) -> Result<String, ConfigError> {
        let mut out = String::with_capacity(source.len() * 4);
        let mut chars = source.chars().peekable();
        let mut in_bracket = false;

        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    out.push(c);
                    let Some(next) = chars.next() else {
                        continue;
                    };
                    out.push(next);
                    match (next, chars.peek().copied()) {
                        ('p' | 'P', Some('{')) => copy_through(&mut chars, &mut out, '}'),
                        ('k', Some('<')) => copy_through(&mut chars, &mut out, '>'),
                        // One-letter property name, as in `\pL`.
                        ('p' | 'P', Some(name)) => {
                            out.push(name);
                            chars.next();
                        }
                        _ => {}
                    }
                }
                '(' if !in_bracket && chars.peek() == Some(&'?') => {
                    out.push(c);
                    let mut header = String::new();
                    while let Some(&next) = chars.peek() {
                        if next == ':' || next == ')' || next == '=' || next == '!' {
                            break;
                        }
                        header.push(next);
                        chars.next();
                        if next == '>' {
                            break;
                        }
                    }
                    out.push_str(&header);
                    if header == "?P" && chars.peek() == Some(&'=') {
                        copy_through(&mut chars, &mut out, ')');
                    }
                }
                '[' if !in_bracket => {
                    in_bracket = true;
                    out.push(c);
                    // A leading `]` or `^]` is literal, not the closing bracket.
                    if chars.peek() == Some(&'^') {
                        out.push('^');
                        chars.next();
                    }
                    if chars.peek() == Some(&']') {
                        out.push(']');
                        chars.next();
                    }
                }
                ']' if in_bracket => {
                    in_bracket = false;
                    out.push(c);
                }
                c if c.is_ascii_uppercase() => {
                    let members = self.members(c).ok_or_else(|| ConfigError::UndefinedClass {
                        rule: rule.to_string(),
                        class: c,
                    })?;
                    if in_bracket {
                        out.push_str(members);
                    } else {
                        out.push('[');
                        out.push_str(members);
                        out.push(']');
                    }
                }
                _ => out.push(c),
            }
        }
        Ok(out)
    }
}

/// Copy characters verbatim up to and including `close`.
fn copy_through(chars: &mut Peekable<Chars<'_>>, out: &mut String, close: char) {
    for c in chars.by_ref() {
        out.push(c);
        if c == close {
            break;
        }
    }
}
