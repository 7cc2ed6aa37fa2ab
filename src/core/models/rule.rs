//! Detection rules
//!
//! A rule is a pure predicate over text. It never sees the file path, the
//! commit, or anything else about where the text came from.

use regex::Regex;
use serde::Serialize;

/// Longest excerpt kept on a violation, in characters
pub const MAX_EXCERPT_CHARS: usize = 200;

/// How a rule recognises offending text
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Literal substring
    Contains(String),
    /// Regular expression
    Pattern(Regex),
}

impl Matcher {
    /// Byte offset of the first match, if any
    fn find(&self, text: &str) -> Option<usize> {
        match self {
            Self::Contains(needle) => text.find(needle.as_str()),
            Self::Pattern(re) => re.find(text).map(|m| m.start()),
        }
    }

    /// Short description, e.g. `contains "secret"`
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Contains(needle) => format!("contains \"{needle}\""),
            Self::Pattern(re) => format!("matches /{}/", re.as_str()),
        }
    }
}

/// A named detection rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// Short identifier shown in reports
    pub name: String,
    /// Human description used as the violation message
    pub message: String,
    /// The predicate
    pub matcher: Matcher,
}

impl Rule {
    /// Rule firing on a literal substring
    #[must_use]
    pub fn contains(name: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::with_matcher(name, Matcher::Contains(needle.into()))
    }

    /// Rule firing on a regular expression match
    #[must_use]
    pub fn pattern(name: impl Into<String>, re: Regex) -> Self {
        Self::with_matcher(name, Matcher::Pattern(re))
    }

    fn with_matcher(name: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            name: name.into(),
            message: matcher.describe(),
            matcher,
        }
    }

    /// Replace the generated description
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Evaluate the rule against `text`
    #[must_use]
    pub fn check(&self, text: &str) -> Option<Violation> {
        let offset = self.matcher.find(text)?;
        Some(Violation {
            rule: self.name.clone(),
            message: self.message.clone(),
            excerpt: excerpt_at(text, offset),
        })
    }
}

/// A rule that fired
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Name of the rule
    pub rule: String,
    /// Rule description
    pub message: String,
    /// The line containing the match, trimmed and shortened
    pub excerpt: String,
}

/// The line around byte `offset`, trimmed to [`MAX_EXCERPT_CHARS`]
fn excerpt_at(text: &str, offset: usize) -> String {
    let start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
    let line = text[start..end].trim();
    if line.chars().count() <= MAX_EXCERPT_CHARS {
        line.to_string()
    } else {
        let mut short: String = line.chars().take(MAX_EXCERPT_CHARS).collect();
        short.push_str("...");
        short
    }
}
