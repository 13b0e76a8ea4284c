use quickadd_core::{QuickAddError, QuickAddResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic kind of a recognized span of quick-add text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Project,
    Label,
    Priority,
    DueDate,
    DueTime,
    Recurrence,
    Duration,
}

impl TokenKind {
    pub const ALL: [TokenKind; 7] = [
        TokenKind::Project,
        TokenKind::Label,
        TokenKind::Priority,
        TokenKind::DueDate,
        TokenKind::DueTime,
        TokenKind::Recurrence,
        TokenKind::Duration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Project => "project",
            TokenKind::Label => "label",
            TokenKind::Priority => "priority",
            TokenKind::DueDate => "due_date",
            TokenKind::DueTime => "due_time",
            TokenKind::Recurrence => "recurrence",
            TokenKind::Duration => "duration",
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = QuickAddError;

    fn from_str(s: &str) -> QuickAddResult<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "project" => Ok(TokenKind::Project),
            "label" | "labels" => Ok(TokenKind::Label),
            "priority" => Ok(TokenKind::Priority),
            "due_date" | "date" => Ok(TokenKind::DueDate),
            "due_time" | "time" => Ok(TokenKind::DueTime),
            "recurrence" | "recurring" => Ok(TokenKind::Recurrence),
            "duration" | "estimation" => Ok(TokenKind::Duration),
            _ => Err(QuickAddError::Unknown {
                kind: "token kind",
                value: s.to_string(),
            }),
        }
    }
}

/// The disabled-section set: token kinds the user switched off for this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TokenKindSet(u8);

impl TokenKindSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, kind: TokenKind) {
        self.0 |= kind.bit();
    }

    pub fn remove(&mut self, kind: TokenKind) {
        self.0 &= !kind.bit();
    }

    pub fn contains(&self, kind: TokenKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenKind> + '_ {
        TokenKind::ALL.into_iter().filter(|k| self.contains(*k))
    }
}

impl FromIterator<TokenKind> for TokenKindSet {
    fn from_iter<I: IntoIterator<Item = TokenKind>>(iter: I) -> Self {
        let mut set = TokenKindSet::new();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl Serialize for TokenKindSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A recognized span of the input. Offsets are byte offsets into the
/// original text, `start < end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub kind: TokenKind,
    pub raw_text: String,
    pub start: usize,
    pub end: usize,
    /// A project or label token still being typed at the caret. Live matches
    /// feed autocomplete only and are never committed to a parse result.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub live: bool,
}

impl Match {
    pub fn new(kind: TokenKind, text: &str, start: usize, end: usize) -> Self {
        Self {
            kind,
            raw_text: text[start..end].to_string(),
            start,
            end,
            live: false,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: &Match) -> bool {
        self.start < other.end && other.start < self.end
    }
}
