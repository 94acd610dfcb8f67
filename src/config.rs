use std::env;
use std::fmt;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_ACCEPT: &str = "application/vnd.github+json";
pub const DEFAULT_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_USER_AGENT: &str = "Rust GitHub API Client";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_LOG_DIRECTIVES: &str = "info";

/// Log filter from `RUST_LOG`, falling back to `info`.
pub fn log_filter() -> EnvFilter {
    log_filter_from(env::var("RUST_LOG").ok().as_deref())
}

fn log_filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVES))
}

/// Bearer token presented on every request.
///
/// Immutable once built. The value is never printed by `Debug`.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, rejecting empty or whitespace-only values.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ClientError::Configuration(
                "GitHub token is empty".to_string(),
            ));
        }
        Ok(Credential(token.trim().to_string()))
    }

    /// Read the token from `GITHUB_TOKEN`.
    pub fn from_env() -> Result<Self> {
        match env::var("GITHUB_TOKEN") {
            Ok(token) => Credential::new(token),
            Err(_) => Err(ClientError::Configuration(
                "GITHUB_TOKEN environment variable not found".to_string(),
            )),
        }
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Static settings for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub api_version: String,
    pub accept: String,
    /// Per-request network timeout. `None` disables it.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

impl ClientConfig {
    /// Defaults, with the base URL overridden by `GITHUB_API_URL` when set.
    pub fn from_env() -> Self {
        let config = ClientConfig::default();
        match env::var("GITHUB_API_URL") {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
            _ => config,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}
