//! yarn.lock parser
//!
//! Parses the line-oriented lockfile written by yarn. Each entry starts with an
//! unindented header listing one or more `<name>@<range>` patterns and holds
//! indented fields, of which only `version` is read.
//!
//! Format examples:
//! - Classic:
//!   ```text
//!   "@babel/code-frame@^7.0.0", "@babel/code-frame@^7.10.4":
//!     version "7.12.11"
//!   ```
//! - Berry:
//!   ```text
//!   "lodash@npm:^4.17.21":
//!     version: 4.17.21
//!   ```

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::lockfile::traits::LockfileParser;
use crate::lockfile::types::{LockfileKind, ParsedLock};

/// Package name up to the first unscoped `@`
static PACKAGE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(@?[a-z0-9-]+/?[a-z0-9-]+)@").unwrap());

/// Indentation of an entry's own fields
const FIELD_INDENT: usize = 2;

/// Extract the package name from a `<name>@<range>` pattern
pub fn extract_package_name(pattern: &str) -> Option<&str> {
    PACKAGE_NAME_RE
        .captures(pattern)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parser for yarn.lock files
pub struct YarnLockParser;

/// Entry being accumulated while walking the file
struct PendingEntry {
    patterns: Vec<String>,
    version: Option<String>,
}

impl PendingEntry {
    fn flush_into(self, entries: &mut IndexMap<String, String>) {
        let Some(version) = self.version else {
            return;
        };
        for pattern in self.patterns {
            entries.insert(pattern, version.clone());
        }
    }
}

impl YarnLockParser {
    /// Split an entry header into its patterns
    fn parse_header(line: &str) -> Option<Vec<String>> {
        let header = line.trim_end().strip_suffix(':')?;
        let patterns: Vec<String> = header
            .split(',')
            .map(|p| unquote(p.trim()).to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if patterns.is_empty() {
            None
        } else {
            Some(patterns)
        }
    }

    /// Parse a `version "x"` or `version: x` field
    fn parse_version_field(field: &str) -> Option<String> {
        let rest = field.strip_prefix("version")?;
        let rest = rest.strip_prefix(':').unwrap_or(rest);
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let value = unquote(rest.trim());
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

impl LockfileParser for YarnLockParser {
    fn kind(&self) -> LockfileKind {
        LockfileKind::Yarn
    }

    fn parse(&self, content: &str) -> ParsedLock {
        let mut entries = IndexMap::new();
        let mut current: Option<PendingEntry> = None;

        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            // Skip empty lines and comments
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if ["<<<<<<<", "=======", ">>>>>>>"]
                .iter()
                .any(|marker| line.starts_with(marker))
            {
                return ParsedLock::Malformed(format!(
                    "merge conflict marker on line {}",
                    line_num + 1
                ));
            }

            let indent = line.len() - line.trim_start().len();

            if indent == 0 {
                let Some(patterns) = Self::parse_header(line) else {
                    return ParsedLock::Malformed(format!(
                        "expected an entry header on line {}",
                        line_num + 1
                    ));
                };
                if let Some(entry) = current.take() {
                    entry.flush_into(&mut entries);
                }
                current = Some(PendingEntry {
                    patterns,
                    version: None,
                });
                continue;
            }

            let Some(entry) = current.as_mut() else {
                return ParsedLock::Malformed(format!(
                    "indented line {} outside of any entry",
                    line_num + 1
                ));
            };

            if indent == FIELD_INDENT
                && entry.version.is_none()
                && let Some(version) = Self::parse_version_field(trimmed)
            {
                entry.version = Some(version);
            }
        }

        if let Some(entry) = current.take() {
            entry.flush_into(&mut entries);
        }

        ParsedLock::from_entries(entries)
    }

    fn package_name<'a>(&self, key: &'a str) -> Option<&'a str> {
        extract_package_name(key)
    }
}

/// Remove surrounding quotes; a quoted header list only carries them on its ends
fn unquote(value: &str) -> &str {
    value.trim_start_matches('"').trim_end_matches('"')
}
