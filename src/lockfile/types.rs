//! Common types for lockfile parsing

use indexmap::IndexMap;

/// Lockfile formats, in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockfileKind {
    /// pnpm-lock.yaml
    Pnpm,
    /// yarn.lock
    Yarn,
}

impl LockfileKind {
    /// Repository path of the lockfile
    pub fn path(&self) -> &'static str {
        match self {
            LockfileKind::Pnpm => "pnpm-lock.yaml",
            LockfileKind::Yarn => "yarn.lock",
        }
    }
}

/// Result of parsing a lockfile, validated before anything iterates it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLock {
    /// Content does not have the expected structure
    Malformed(String),
    /// Structurally valid but lists no packages
    Empty,
    /// Entry key to resolved version, in file order
    Entries(IndexMap<String, String>),
}

impl ParsedLock {
    pub fn from_entries(entries: IndexMap<String, String>) -> Self {
        if entries.is_empty() {
            ParsedLock::Empty
        } else {
            ParsedLock::Entries(entries)
        }
    }
}

/// A version found for the requested identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub version: String,
    /// Path of the file the version was read from
    pub source_artifact: String,
}
