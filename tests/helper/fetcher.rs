//! In-memory repository host for integration tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use dep_compliance::compliance::{CheckOptions, CheckRequest, PackageManager, Reduction};
use dep_compliance::source::{
    ContentFetcher, FetchError, FileContent, RemoteContent, RepositoryLister, RepositoryPattern,
    RepositoryRef,
};

/// Repositories and their files, with a log of every fetch
#[derive(Default)]
pub struct FakeHost {
    repositories: Vec<RepositoryRef>,
    contents: HashMap<(String, String), RemoteContent>,
    fetches: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(mut self, full_name: &str, archived: bool) -> Self {
        self.repositories
            .push(RepositoryRef::new(full_name, archived));
        self
    }

    /// Serve `content` base64-encoded, as the contents API does
    pub fn with_file(mut self, full_name: &str, path: &str, content: &str) -> Self {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(content);
        self.contents.insert(
            (full_name.to_string(), path.to_string()),
            RemoteContent::File(FileContent::base64(path, &encoded)),
        );
        self
    }

    pub fn with_directory(mut self, full_name: &str, path: &str) -> Self {
        self.contents.insert(
            (full_name.to_string(), path.to_string()),
            RemoteContent::Other {
                path: path.to_string(),
                kind: "dir".to_string(),
            },
        );
        self
    }

    /// Every `repo/path` requested so far, in order
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for FakeHost {
    async fn fetch(&self, full_name: &str, path: &str) -> Result<RemoteContent, FetchError> {
        self.fetches
            .lock()
            .unwrap()
            .push(format!("{full_name}/{path}"));

        self.contents
            .get(&(full_name.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("{full_name}/{path}")))
    }
}

#[async_trait]
impl RepositoryLister for FakeHost {
    async fn list(&self, pattern: &RepositoryPattern) -> Result<Vec<RepositoryRef>, FetchError> {
        let matched: Vec<RepositoryRef> = match pattern {
            RepositoryPattern::Single { owner, name } => {
                let full_name = format!("{owner}/{name}");
                self.repositories
                    .iter()
                    .filter(|r| r.full_name == full_name)
                    .cloned()
                    .collect()
            }
            RepositoryPattern::Owner(owner) => {
                let prefix = format!("{owner}/");
                self.repositories
                    .iter()
                    .filter(|r| r.full_name.starts_with(&prefix))
                    .cloned()
                    .collect()
            }
        };

        if matched.is_empty() {
            return Err(FetchError::NotFound(pattern.to_string()));
        }
        Ok(matched)
    }
}

pub fn library_request(library: &str, requirement: &str, reduce: Option<Reduction>) -> CheckRequest {
    CheckRequest::new(CheckOptions {
        requirement: Some(requirement.to_string()),
        library: Some(library.to_string()),
        package_manager: None,
        reduce,
    })
    .unwrap()
}

pub fn package_manager_request(pm: PackageManager, requirement: &str) -> CheckRequest {
    CheckRequest::new(CheckOptions {
        requirement: Some(requirement.to_string()),
        library: None,
        package_manager: Some(pm),
        reduce: None,
    })
    .unwrap()
}
