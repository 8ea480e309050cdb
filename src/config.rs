// =============================================================================
// GitHub API constants
// =============================================================================

/// Default base URL for the GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// User agent sent with every request
pub const USER_AGENT: &str = "dep-compliance";

/// Page size used when listing repositories
pub const REPOS_PER_PAGE: usize = 100;

/// Upper bound on listing pages (10,000 repositories)
pub const MAX_REPO_PAGES: usize = 100;

// =============================================================================
// Repository artifacts
// =============================================================================

/// Manifest carrying the `packageManager` pin
pub const MANIFEST_PATH: &str = "package.json";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "dep_compliance=info";

/// Settings for the GitHub client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: Option<String>, token: Option<String>) -> Self {
        Self {
            api_url: normalize_api_url(api_url.as_deref().unwrap_or(DEFAULT_API_URL)),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

fn normalize_api_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
