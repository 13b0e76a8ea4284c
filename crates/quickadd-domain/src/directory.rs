use quickadd_core::{QuickAddError, QuickAddResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::token::TokenKind;

pub type EntryId = Uuid;

/// A known project or label, as supplied by the host's store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: EntryId,
    pub name: String,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A project or label name taken from the text. `id` is `None` when the
/// directory has no such entry, which makes it a create-candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedName {
    pub name: String,
    pub id: Option<EntryId>,
}

impl ResolvedName {
    pub fn found(entry: &DirectoryEntry) -> Self {
        Self {
            name: entry.name.clone(),
            id: Some(entry.id),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// Read-only snapshot of known projects and labels used for name → id
/// resolution and autocomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub projects: Vec<DirectoryEntry>,
    #[serde(default)]
    pub labels: Vec<DirectoryEntry>,
}

impl Directory {
    pub fn new(projects: Vec<DirectoryEntry>, labels: Vec<DirectoryEntry>) -> Self {
        Self { projects, labels }
    }

    pub fn from_json(json: &str) -> QuickAddResult<Self> {
        serde_json::from_str(json).map_err(|e| QuickAddError::Serialization(e.to_string()))
    }

    pub fn load(path: &Path) -> QuickAddResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Entries a token kind resolves against. Only project and label tokens name entries.
    pub fn entries(&self, kind: TokenKind) -> &[DirectoryEntry] {
        match kind {
            TokenKind::Project => &self.projects,
            TokenKind::Label => &self.labels,
            _ => &[],
        }
    }

    /// Case-insensitive exact lookup; the first entry wins on duplicate names.
    pub fn lookup(&self, kind: TokenKind, name: &str) -> Option<&DirectoryEntry> {
        let needle = name.to_lowercase();
        self.entries(kind)
            .iter()
            .find(|entry| entry.name.to_lowercase() == needle)
    }

    pub fn resolve_name(&self, kind: TokenKind, name: &str) -> ResolvedName {
        match self.lookup(kind, name) {
            Some(entry) => ResolvedName::found(entry),
            None => ResolvedName::not_found(name),
        }
    }

    /// Case-insensitive search: prefix matches first, then substring
    /// matches, each group in directory order.
    pub fn search(&self, kind: TokenKind, query: &str) -> Vec<&DirectoryEntry> {
        let needle = query.to_lowercase();
        let entries = self.entries(kind);
        let (mut prefixed, mut contained) = (Vec::new(), Vec::new());
        for entry in entries {
            let name = entry.name.to_lowercase();
            if name.starts_with(&needle) {
                prefixed.push(entry);
            } else if name.contains(&needle) {
                contained.push(entry);
            }
        }
        prefixed.append(&mut contained);
        prefixed
    }
}
