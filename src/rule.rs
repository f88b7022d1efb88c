//! Route rule compilation.
//!
//! A [`Rule`] is what the application writes when it registers a route: either
//! a path string with placeholders, or a [`Regex`] it built itself. The
//! compiler turns a path string into a [`CompiledRule`] that only matches a
//! *whole* fragment, case-insensitively. A [`Regex`] is used as written, so
//! anchoring it is up to the caller.
//!
//! # Placeholders
//!
//! | Token     | Expands to        | Matches                          |
//! |-----------|-------------------|----------------------------------|
//! | `{name}`  | `([\w\-.]+)`      | one path segment, captured by name |
//! | `:any`    | `([\w\-.]+)`      | one path segment                 |
//! | `:word`   | `([a-zA-Z]+)`     | letters only                     |
//! | `:num`    | `(\d+)`           | digits only                      |
//!
//! Captures come back in the left-to-right order of the placeholders. Anything
//! else in a string rule is regex syntax, except `\`, `.` and `-`, which are
//! literal. A rule that does not compile is kept as an inert pattern that never
//! matches.
//!
//! # Example
//!
//! ```
//! use spa_navigator::rule::CompiledRule;
//!
//! let rule = CompiledRule::from_path("/user/{id}/post/:num/");
//! assert_eq!(rule.captures("user/ada/post/7"), Some(vec!["ada".to_string(), "7".to_string()]));
//! assert_eq!(rule.captures("user/ada/post/7/edit"), None);
//! assert_eq!(rule.named("USER/ada/post/7").unwrap().get("id"), Some(&"ada".to_string()));
//! ```

#[cfg(feature = "cache")]
use crate::cache::PatternCache;
use crate::fragment::trim_slashes;
use crate::params::RouteParams;
use regex::Regex;
use std::fmt;

/// Capture group used by `{name}` and `:any`.
const ANY_SEGMENT: &str = r"[\w\-.]+";
const WORD_SEGMENT: &str = "[a-zA-Z]+";
const NUM_SEGMENT: &str = r"\d+";

/// A route rule as written by the application.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Path string, possibly with placeholders.
    Path(String),
    /// Precompiled pattern, used as-is.
    Pattern(Regex),
}

impl From<&str> for Rule {
    fn from(path: &str) -> Self {
        Rule::Path(path.to_string())
    }
}

impl From<String> for Rule {
    fn from(path: String) -> Self {
        Rule::Path(path)
    }
}

impl From<Regex> for Rule {
    fn from(pattern: Regex) -> Self {
        Rule::Pattern(pattern)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Path(path) => f.write_str(path),
            Rule::Pattern(pattern) => f.write_str(pattern.as_str()),
        }
    }
}

/// A rule ready for matching.
///
/// `source` is the canonical string form used to identify the route on
/// removal. `regex` is `None` when the source failed to compile.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    source: String,
    regex: Option<Regex>,
}

impl CompiledRule {
    /// Compile any rule.
    pub fn compile(rule: &Rule) -> Self {
        match rule {
            Rule::Path(path) => Self::from_path(path),
            Rule::Pattern(pattern) => Self::from_regex(pattern.clone()),
        }
    }

    /// Compile a path rule with placeholders.
    pub fn from_path(rule: &str) -> Self {
        let source = format!("(?i)^{}$", translate(trim_slashes(rule)));
        match Regex::new(&source) {
            Ok(regex) => Self {
                source,
                regex: Some(regex),
            },
            Err(err) => {
                warn_log!("Rule '{}' does not compile and will never match: {}", rule, err);
                Self {
                    source,
                    regex: None,
                }
            }
        }
    }

    /// Wrap a precompiled pattern without touching it.
    pub fn from_regex(regex: Regex) -> Self {
        Self {
            source: regex.as_str().to_string(),
            regex: Some(regex),
        }
    }

    /// Canonical string form of the pattern.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// `false` when the rule failed to compile.
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    /// Positional captures for a match of `fragment`.
    ///
    /// The whole-match group is dropped. Groups that did not take part in the
    /// match yield empty strings so positions stay stable.
    pub fn captures(&self, fragment: &str) -> Option<Vec<String>> {
        let caps = self.matched(fragment)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// Named captures (`{name}` placeholders or `(?P<name>...)` groups) for a
    /// match of `fragment`.
    pub fn named(&self, fragment: &str) -> Option<RouteParams> {
        let regex = self.regex.as_ref()?;
        let caps = self.matched(fragment)?;
        let mut params = RouteParams::new();
        for name in regex.capture_names().flatten() {
            if let Some(value) = caps.name(name) {
                params.insert(name.to_string(), value.as_str().to_string());
            }
        }
        Some(params)
    }

    /// `true` if the pattern matches `fragment`.
    pub fn is_match(&self, fragment: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(fragment))
    }

    fn matched<'t>(&self, fragment: &'t str) -> Option<regex::Captures<'t>> {
        self.regex.as_ref()?.captures(fragment)
    }
}

impl PartialEq for CompiledRule {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Translate a trimmed rule into regex source (without anchors).
fn translate(rule: &str) -> String {
    let mut out = String::with_capacity(rule.len() * 2);
    let mut used_names: Vec<&str> = Vec::new();
    let mut rest = rule;

    while let Some(c) = rest.chars().next() {
        if let Some((name, tail)) = brace_placeholder(rest) {
            if used_names.contains(&name) {
                out.push('(');
            } else {
                used_names.push(name);
                out.push_str("(?P<");
                out.push_str(name);
                out.push('>');
            }
            out.push_str(ANY_SEGMENT);
            out.push(')');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(":any") {
            push_group(&mut out, ANY_SEGMENT);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(":word") {
            push_group(&mut out, WORD_SEGMENT);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(":num") {
            push_group(&mut out, NUM_SEGMENT);
            rest = tail;
        } else {
            if matches!(c, '\\' | '.' | '-') {
                out.push('\\');
            }
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    trace_log!("Translated rule '{}' into '{}'", rule, out);
    out
}

fn push_group(out: &mut String, body: &str) {
    out.push('(');
    out.push_str(body);
    out.push(')');
}

/// Parse `{identifier}` at the start of `input`.
fn brace_placeholder(input: &str) -> Option<(&str, &str)> {
    let inner = input.strip_prefix('{')?;
    let end = inner.find('}')?;
    let name = &inner[..end];
    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_')
        || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return None;
    }
    Some((name, &inner[end + 1..]))
}

// ============================================================================
// Compiler
// ============================================================================

/// Compiles rules for a router, memoising string rules when the `cache`
/// feature is enabled.
#[derive(Debug, Default)]
pub struct RuleCompiler {
    #[cfg(feature = "cache")]
    cache: PatternCache,
}

impl RuleCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `rule`, consulting the pattern cache for path rules.
    pub fn compile(&mut self, rule: &Rule) -> CompiledRule {
        match rule {
            #[cfg(feature = "cache")]
            Rule::Path(path) => {
                if let Some(hit) = self.cache.get(path) {
                    return hit;
                }
                let compiled = CompiledRule::from_path(path);
                self.cache.insert(path.clone(), compiled.clone());
                compiled
            }
            _ => CompiledRule::compile(rule),
        }
    }

    /// Pattern cache statistics.
    #[cfg(feature = "cache")]
    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    #[cfg(feature = "cache")]
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================
