//! # GitHub API Client
//!
//! A small client for the paginated, rate-limited GitHub REST API covering
//! repository search, commit listing and content lookup.
//!
//! ## Main Components
//!
//! - [`GitHubClient`]: The three read operations
//! - [`Transport`]: Single-request seam, implemented over `reqwest` by [`HttpTransport`]
//! - [`pagination`]: The page loops and rate-limit backoff
//! - [`Collected`]: Items gathered so far, plus the error that stopped the loop, if any
//!
//! ## Example
//!
//! ```no_run
//! use github_api_client_lib::{ClientConfig, Credential, GitHubClient, SearchParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let credential = Credential::from_env()?;
//!     let client = GitHubClient::new(credential, &ClientConfig::default())?;
//!
//!     let params = SearchParams::new("machine learning").max_items(30);
//!     let repos = client.search_repositories(&params).await?;
//!     if repos.is_partial() {
//!         eprintln!("stopped early after {} repositories", repos.len());
//!     }
//!     for repo in &repos.items {
//!         println!("{} ({} stars)", repo.full_name, repo.stargazers_count);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod args;
mod client;
mod config;
mod error;
pub mod models;
pub mod pagination;
pub mod rate_limit;
mod transport;

// Re-export main components for documentation and external use
pub use crate::args::{Args, Command};
pub use crate::client::{GitHubClient, SearchParams, SearchSort, SortOrder};
pub use crate::config::{log_filter, ClientConfig, Credential};
pub use crate::error::{ClientError, Result};
pub use crate::models::{Commit, Content, ContentEntry, FileContent, Repository};
pub use crate::pagination::Collected;
pub use crate::rate_limit::RateLimitState;
pub use crate::transport::{HttpTransport, RequestDescriptor, ResponseDescriptor, Transport};
