//! Task sequence numbers.
//!
//! Tasks are identified within an epic by a zero-padded 3-digit sequence,
//! "001" through "999". The padded form sorts numerically and
//! lexicographically alike, which the store relies on.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A task number in the range 1..=999, displayed zero-padded ("001").
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskNumber(u16);

impl TaskNumber {
    /// Create from a 1-based index.
    pub fn new(index: u16) -> Result<Self> {
        if index == 0 || index > 999 {
            return Err(Error::InvalidIdentifier {
                input: index.to_string(),
                reason: "task numbers range from 001 to 999".to_string(),
            });
        }
        Ok(Self(index))
    }

    /// Parse a zero-padded 3-digit string ("007").
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidIdentifier {
                input: s.to_string(),
                reason: "expected a zero-padded 3-digit task number like 001".to_string(),
            });
        }
        let index: u16 = s.parse().map_err(|_| Error::InvalidIdentifier {
            input: s.to_string(),
            reason: "not a number".to_string(),
        })?;
        Self::new(index)
    }

    /// The 1-based index.
    pub fn index(&self) -> u16 {
        self.0
    }

    /// The next task number, if any remain.
    pub fn next(&self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }
}

impl fmt::Display for TaskNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl fmt::Debug for TaskNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskNumber({})", self)
    }
}

impl std::str::FromStr for TaskNumber {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TaskNumber {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<TaskNumber> for String {
    fn from(n: TaskNumber) -> Self {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_format_zero_pads() {
        assert_eq!(TaskNumber::new(1).unwrap().to_string(), "001");
        assert_eq!(TaskNumber::new(42).unwrap().to_string(), "042");
        assert_eq!(TaskNumber::new(999).unwrap().to_string(), "999");
    }

    #[test]
    fn test_parse_is_inverse_of_format() {
        for i in [1u16, 9, 10, 99, 100, 999] {
            let n = TaskNumber::new(i).unwrap();
            assert_eq!(TaskNumber::parse(&n.to_string()).unwrap(), n);
        }
    }

    #[test_case("000"; "zero")]
    #[test_case("1"; "unpadded")]
    #[test_case("0001"; "too long")]
    #[test_case("abc"; "not a number")]
    #[test_case("01a"; "trailing letter")]
    fn test_parse_rejects(input: &str) {
        assert!(TaskNumber::parse(input).is_err());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(TaskNumber::new(0).is_err());
        assert!(TaskNumber::new(1000).is_err());
    }

    #[test]
    fn test_numeric_ordering() {
        let two = TaskNumber::new(2).unwrap();
        let ten = TaskNumber::new(10).unwrap();
        assert!(two < ten);
    }

    #[test]
    fn test_next_saturates_at_999() {
        assert_eq!(
            TaskNumber::new(1).unwrap().next(),
            Some(TaskNumber::new(2).unwrap())
        );
        assert_eq!(TaskNumber::new(999).unwrap().next(), None);
    }
}
