//! Ticket reference extraction built from the startup project directory.

use std::fmt;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
/// Enumerates supported `MatcherBuildError` values.
pub enum MatcherBuildError {
    #[error("project key '{key}' is not a valid tracker key")]
    InvalidProjectKey { key: String },
    #[error("failed to compile reference pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// `KEY-NUMBER` token extracted from message text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueReference {
    project_key: String,
    number: String,
}

impl IssueReference {
    /// Splits a `KEY-NUMBER` token; the number keeps its digits as written.
    pub fn parse(token: &str) -> Option<Self> {
        let (project_key, number) = token.split_once('-')?;
        if project_key.is_empty()
            || number.is_empty()
            || !number.chars().all(|ch| ch.is_ascii_digit())
        {
            return None;
        }
        Some(Self {
            project_key: project_key.to_string(),
            number: number.to_string(),
        })
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

impl fmt::Display for IssueReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.project_key, self.number)
    }
}

/// Compiled matcher for every known project key.
///
/// Holds no pattern at all when built from an empty key list, so it can never
/// match the empty string. Matching takes `&self` only and the matcher is
/// shared across message tasks without locking.
#[derive(Debug, Clone)]
pub struct ReferenceMatcher {
    pattern: Option<Regex>,
}

impl ReferenceMatcher {
    pub fn build<S>(keys: &[S]) -> Result<Self, MatcherBuildError>
    where
        S: AsRef<str>,
    {
        let mut alternatives = Vec::with_capacity(keys.len());
        for key in keys {
            let key = key.as_ref();
            if !is_valid_project_key(key) {
                return Err(MatcherBuildError::InvalidProjectKey {
                    key: key.to_string(),
                });
            }
            alternatives.push(regex::escape(key));
        }
        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        // Group 1 is the token. The boundary is ASCII-only: `XPROJ-1` and `my_PROJ-5`
        // never match `PROJ`, while a key right after CJK or accented text does.
        let pattern = format!(
            r"(?:^|[^0-9A-Za-z_])((?:{})-[0-9]+)",
            alternatives.join("|")
        );
        Ok(Self {
            pattern: Some(Regex::new(&pattern)?),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// Returns every reference in text order, repeats included.
    pub fn find_all(&self, text: &str) -> Vec<IssueReference> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        pattern
            .captures_iter(text)
            .filter_map(|captures| captures.get(1))
            .filter_map(|token| IssueReference::parse(token.as_str()))
            .collect()
    }
}

fn is_valid_project_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
