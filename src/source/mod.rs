//! Remote repository access
//!
//! - [`fetcher`]: `ContentFetcher` trait for reading one file out of a repository
//! - [`lister`]: `RepositoryLister` trait and repository patterns
//! - [`github`]: GitHub REST implementation of both traits
//! - [`error`]: Transport-level errors

pub mod error;
pub mod fetcher;
pub mod github;
pub mod lister;

pub use error::FetchError;
pub use fetcher::{ContentFetcher, FileContent, RemoteContent};
pub use github::GitHubClient;
pub use lister::{RepositoryLister, RepositoryPattern, RepositoryRef};
