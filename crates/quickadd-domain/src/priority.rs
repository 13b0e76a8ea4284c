use quickadd_core::{QuickAddError, QuickAddResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority, `P1` being the most urgent. Serialized as its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    P1,
    P2,
    P3,
    P4,
}

impl Priority {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Priority::P1),
            2 => Some(Priority::P2),
            3 => Some(Priority::P3),
            4 => Some(Priority::P4),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Priority::P1 => 1,
            Priority::P2 => 2,
            Priority::P3 => 3,
            Priority::P4 => 4,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.level())
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.level()
    }
}

impl TryFrom<u8> for Priority {
    type Error = QuickAddError;

    fn try_from(level: u8) -> QuickAddResult<Self> {
        Priority::from_level(level)
            .ok_or_else(|| QuickAddError::Validation(format!("invalid priority level: {}", level)))
    }
}

impl FromStr for Priority {
    type Err = QuickAddError;

    fn from_str(s: &str) -> QuickAddResult<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('p')
            .or_else(|| trimmed.strip_prefix('P'))
            .unwrap_or(trimmed);
        digits
            .parse::<u8>()
            .ok()
            .and_then(Priority::from_level)
            .ok_or_else(|| QuickAddError::Validation(format!("invalid priority: {}", s)))
    }
}
