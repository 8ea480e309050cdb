//! Lockfile parser trait definition

use crate::lockfile::types::{LockfileKind, ParsedLock, VersionRecord};

/// Trait for parsing a lockfile format
pub trait LockfileParser: Send + Sync {
    /// Returns the lockfile format this parser handles
    fn kind(&self) -> LockfileKind;

    /// Parse the content into validated entries
    fn parse(&self, content: &str) -> ParsedLock;

    /// Extract the package name from an entry key
    fn package_name<'a>(&self, key: &'a str) -> Option<&'a str>;

    /// Versions of `identifier`, in discovery order
    ///
    /// Malformed and empty locks yield nothing; callers are expected to have
    /// handled `ParsedLock::Malformed` already.
    fn versions_for(&self, lock: &ParsedLock, identifier: &str) -> Vec<VersionRecord> {
        let ParsedLock::Entries(entries) = lock else {
            return Vec::new();
        };

        entries
            .iter()
            .filter(|(key, _)| self.package_name(key) == Some(identifier))
            .map(|(_, version)| VersionRecord {
                version: version.clone(),
                source_artifact: self.kind().path().to_string(),
            })
            .collect()
    }
}
