//! Canonical lowercase-hyphenated identifiers.
//!
//! Human-supplied names pass through [`sanitize`] and then [`Slug::validate`].
//! Sanitizing alone does not guarantee validity: an all-symbol input
//! sanitizes to the empty string, which validation then rejects.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum slug length.
pub const MIN_LEN: usize = 3;
/// Maximum slug length.
pub const MAX_LEN: usize = 50;

/// A validated identifier matching `^[a-z0-9]+(-[a-z0-9]+)*$`, length 3-50.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validate an already-sanitized string into a slug.
    pub fn validate(s: &str) -> Result<Self> {
        if s.len() < MIN_LEN {
            return Err(Error::InvalidIdentifier {
                input: s.to_string(),
                reason: format!("too short ({} chars, minimum {})", s.len(), MIN_LEN),
            });
        }
        if s.len() > MAX_LEN {
            return Err(Error::InvalidIdentifier {
                input: s.to_string(),
                reason: format!("too long ({} chars, maximum {})", s.len(), MAX_LEN),
            });
        }
        if !matches_pattern(s) {
            return Err(Error::InvalidIdentifier {
                input: s.to_string(),
                reason: "must be lowercase alphanumeric groups separated by single hyphens"
                    .to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Sanitize a raw human-supplied name, then validate it.
    pub fn from_raw(raw: &str) -> Result<Self> {
        Self::validate(&sanitize(raw))
    }

    /// The slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slug({})", self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::validate(s)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sanitize a raw name into slug form.
///
/// Lowercases, strips characters outside `[a-z0-9- ]`, collapses whitespace
/// runs to single hyphens, collapses repeated hyphens, and trims hyphens at
/// either end. The result may still fail validation (e.g. empty).
pub fn sanitize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_hyphen = true; // suppress leading hyphens
    for c in lowered.chars() {
        let mapped = match c {
            'a'..='z' | '0'..='9' => Some(c),
            '-' | ' ' | '\t' | '\n' | '\r' => Some('-'),
            _ => None,
        };
        match mapped {
            Some('-') => {
                if !last_hyphen {
                    out.push('-');
                    last_hyphen = true;
                }
            }
            Some(c) => {
                out.push(c);
                last_hyphen = false;
            }
            None => {}
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn matches_pattern(s: &str) -> bool {
    // ^[a-z0-9]+(-[a-z0-9]+)*$ without pulling in a regex engine
    if s.starts_with('-') || s.ends_with('-') {
        return false;
    }
    let mut prev_hyphen = false;
    for c in s.chars() {
        match c {
            'a'..='z' | '0'..='9' => prev_hyphen = false,
            '-' => {
                if prev_hyphen {
                    return false;
                }
                prev_hyphen = true;
            }
            _ => return false,
        }
    }
    !s.is_empty()
}
