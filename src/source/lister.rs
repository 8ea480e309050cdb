//! Repository listing for the fleet host

#[cfg(test)]
use mockall::automock;

use std::fmt;
use std::str::FromStr;

use crate::source::error::FetchError;

/// A repository handed to the checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    /// `owner/name`
    pub full_name: String,
    pub archived: bool,
}

impl RepositoryRef {
    pub fn new(full_name: &str, archived: bool) -> Self {
        Self {
            full_name: full_name.to_string(),
            archived,
        }
    }
}

/// Repository selector given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryPattern {
    /// `owner/name`
    Single { owner: String, name: String },
    /// `owner/*`, every repository of a user or organization
    Owner(String),
}

impl FromStr for RepositoryPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .split_once('/')
            .ok_or_else(|| format!("expected <owner>/<name> or <owner>/*, got {s:?}"))?;

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(format!("expected <owner>/<name> or <owner>/*, got {s:?}"));
        }

        if name == "*" {
            Ok(RepositoryPattern::Owner(owner.to_string()))
        } else {
            Ok(RepositoryPattern::Single {
                owner: owner.to_string(),
                name: name.to_string(),
            })
        }
    }
}

impl fmt::Display for RepositoryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryPattern::Single { owner, name } => write!(f, "{owner}/{name}"),
            RepositoryPattern::Owner(owner) => write!(f, "{owner}/*"),
        }
    }
}

/// Trait for resolving repository patterns into concrete repositories
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RepositoryLister: Send + Sync {
    async fn list(&self, pattern: &RepositoryPattern) -> Result<Vec<RepositoryRef>, FetchError>;
}
