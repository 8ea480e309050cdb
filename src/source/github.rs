//! GitHub REST API implementation of the content fetcher and repository lister

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{ClientConfig, MAX_REPO_PAGES, REPOS_PER_PAGE, USER_AGENT};
use crate::source::error::FetchError;
use crate::source::fetcher::{ContentFetcher, FileContent, RemoteContent};
use crate::source::lister::{RepositoryLister, RepositoryPattern, RepositoryRef};

/// Entry returned by `GET /repos/{owner}/{repo}/contents/{path}` for a single item
#[derive(Debug, Deserialize)]
struct ContentEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

/// Repository as returned by the repos endpoints
#[derive(Debug, Deserialize)]
struct Repository {
    full_name: String,
    #[serde(default)]
    archived: bool,
}

/// Client for the GitHub REST API
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            api_url: config.api_url,
            token: config.token,
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Map non-success statuses onto `FetchError`
    fn check_status(
        response: reqwest::Response,
        url: &str,
        subject: &str,
    ) -> Result<reqwest::Response, FetchError> {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(subject.to_string()));
        }

        let rate_limit_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || (status == reqwest::StatusCode::FORBIDDEN && rate_limit_exhausted)
        {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(FetchError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    /// Whether `url` shares scheme, host and port with the API base URL
    fn is_api_origin(&self, url: &str) -> bool {
        match (reqwest::Url::parse(&self.api_url), reqwest::Url::parse(url)) {
            (Ok(api), Ok(other)) => api.origin() == other.origin(),
            _ => false,
        }
    }

    /// Download a file body that was too large to be inlined by the contents API
    async fn download_raw(&self, path: &str, download_url: &str) -> Result<FileContent, FetchError> {
        debug!("Downloading {} from {}", path, download_url);

        let request = self.client.get(download_url);
        let request = match &self.token {
            Some(token) if self.is_api_origin(download_url) => request.bearer_auth(token),
            _ => request,
        };

        let response = request.send().await?;
        let response = Self::check_status(response, download_url, path)?;
        let body = response.text().await?;

        Ok(FileContent::utf8(path, &body))
    }

    async fn fetch_repository(&self, owner: &str, name: &str) -> Result<RepositoryRef, FetchError> {
        let url = format!("{}/repos/{}/{}", self.api_url, owner, name);
        let subject = format!("{owner}/{name}");

        let response = self.get(&url).send().await?;
        let response = Self::check_status(response, &url, &subject)?;

        let repository: Repository = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub repository response: {}", e);
            FetchError::InvalidResponse(e.to_string())
        })?;

        Ok(RepositoryRef::new(&repository.full_name, repository.archived))
    }

    /// Page through `/orgs/{owner}/repos` or `/users/{owner}/repos`
    async fn fetch_owner_repositories(
        &self,
        owner_kind: &str,
        owner: &str,
    ) -> Result<Vec<RepositoryRef>, FetchError> {
        let base_url = format!("{}/{}/{}/repos", self.api_url, owner_kind, owner);
        let mut repositories = Vec::new();

        for page in 1..=MAX_REPO_PAGES {
            let url = format!("{base_url}?per_page={REPOS_PER_PAGE}&page={page}");
            debug!("Listing repositories from {}", url);

            let response = self.get(&url).send().await?;
            let response = Self::check_status(response, &url, owner)?;

            let parsed: Vec<Repository> = response.json().await.map_err(|e| {
                warn!("Failed to parse GitHub repository list: {}", e);
                FetchError::InvalidResponse(e.to_string())
            })?;

            let len = parsed.len();
            repositories.extend(
                parsed
                    .into_iter()
                    .map(|r| RepositoryRef::new(&r.full_name, r.archived)),
            );

            if len < REPOS_PER_PAGE {
                break;
            }
        }

        Ok(repositories)
    }
}

#[async_trait::async_trait]
impl ContentFetcher for GitHubClient {
    async fn fetch(&self, full_name: &str, path: &str) -> Result<RemoteContent, FetchError> {
        let url = format!("{}/repos/{}/contents/{}", self.api_url, full_name, path);
        let subject = format!("{full_name}/{path}");

        let response = self.get(&url).send().await?;
        let response = Self::check_status(response, &url, &subject)?;

        let body: serde_json::Value = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub contents response: {}", e);
            FetchError::InvalidResponse(e.to_string())
        })?;

        // Directories come back as a listing of their entries
        if body.is_array() {
            return Ok(RemoteContent::Other {
                path: path.to_string(),
                kind: "dir".to_string(),
            });
        }

        let entry: ContentEntry = serde_json::from_value(body)
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

        if entry.kind != "file" {
            return Ok(RemoteContent::Other {
                path: path.to_string(),
                kind: entry.kind,
            });
        }

        match (entry.encoding.as_deref(), entry.content, entry.download_url) {
            (Some("none"), _, Some(download_url)) => {
                self.download_raw(path, &download_url).await.map(RemoteContent::File)
            }
            (Some(encoding), Some(content), _) => Ok(RemoteContent::File(FileContent {
                path: path.to_string(),
                encoding: encoding.to_string(),
                content,
            })),
            _ => Err(FetchError::InvalidResponse(format!(
                "contents response for {subject} carries no body"
            ))),
        }
    }
}

#[async_trait::async_trait]
impl RepositoryLister for GitHubClient {
    async fn list(&self, pattern: &RepositoryPattern) -> Result<Vec<RepositoryRef>, FetchError> {
        match pattern {
            RepositoryPattern::Single { owner, name } => {
                Ok(vec![self.fetch_repository(owner, name).await?])
            }
            RepositoryPattern::Owner(owner) => {
                match self.fetch_owner_repositories("orgs", owner).await {
                    Err(e) if e.is_not_found() => {
                        debug!("{} is not an organization, listing user repositories", owner);
                        self.fetch_owner_repositories("users", owner).await
                    }
                    result => result,
                }
            }
        }
    }
}
