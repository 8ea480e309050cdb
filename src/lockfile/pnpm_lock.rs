//! pnpm-lock.yaml parser
//!
//! Reads the top-level `packages` mapping, whose keys are dependency paths:
//!
//! ```text
//! packages:
//!   /@scope/name@5.15.2(react@18.2.0):
//!     resolution: {integrity: sha512-...}
//!   /lodash@4.17.21:
//!     resolution: {integrity: sha512-...}
//! ```

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_yaml::Value;
use tracing::debug;

use crate::lockfile::traits::LockfileParser;
use crate::lockfile::types::{LockfileKind, ParsedLock};

/// `/<name>@<major.minor.patch><anything>`; the optional `@scope/` segment is
/// consumed before the `@` that separates name and version
static DEPENDENCY_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?<packageName>(@[^/]+/)?[^@]+)@(?<version>[0-9]+\.[0-9]+\.[0-9]+).*").unwrap()
});

/// Name and version extracted from a dependency path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyPath<'a> {
    pub name: &'a str,
    pub version: &'a str,
}

/// Split a dependency path into package name and version
///
/// Pre-release tags, build metadata and peer-dependency suffixes are dropped.
pub fn parse_dependency_path(key: &str) -> Option<DependencyPath<'_>> {
    let caps = DEPENDENCY_PATH_RE.captures(key)?;
    Some(DependencyPath {
        name: caps.name("packageName")?.as_str(),
        version: caps.name("version")?.as_str(),
    })
}

/// Parser for pnpm-lock.yaml files
pub struct PnpmLockParser;

impl LockfileParser for PnpmLockParser {
    fn kind(&self) -> LockfileKind {
        LockfileKind::Pnpm
    }

    fn parse(&self, content: &str) -> ParsedLock {
        let document: Value = match serde_yaml::from_str(content) {
            Ok(document) => document,
            Err(e) => return ParsedLock::Malformed(format!("invalid YAML: {e}")),
        };

        let Value::Mapping(root) = document else {
            return ParsedLock::Malformed("lockfile is not a mapping".to_string());
        };

        let Some(Value::Mapping(packages)) = root.get("packages") else {
            return ParsedLock::Malformed("lockfile has no packages mapping".to_string());
        };

        let mut entries = IndexMap::new();
        for key in packages.keys() {
            let Some(key) = key.as_str() else {
                continue;
            };
            match parse_dependency_path(key) {
                Some(path) => {
                    entries.insert(key.to_string(), path.version.to_string());
                }
                None => debug!("Skipping unrecognized dependency path {}", key),
            }
        }

        ParsedLock::from_entries(entries)
    }

    fn package_name<'a>(&self, key: &'a str) -> Option<&'a str> {
        parse_dependency_path(key).map(|path| path.name)
    }
}
