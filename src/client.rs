use clap::ValueEnum;
use tokio::time::Duration;
use tracing::info;

use crate::config::{ClientConfig, Credential};
use crate::error::Result;
use crate::models::{Commit, Content, Repository};
use crate::pagination::{self, Collected};
use crate::transport::{HttpTransport, RequestDescriptor, Transport};

/// Sort key accepted by repository search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchSort {
    Stars,
    Forks,
    HelpWantedIssues,
    Updated,
    /// GitHub's relevance ranking; no `sort` parameter is sent.
    BestMatch,
}

impl SearchSort {
    fn as_param(self) -> Option<&'static str> {
        match self {
            SearchSort::Stars => Some("stars"),
            SearchSort::Forks => Some("forks"),
            SearchSort::HelpWantedIssues => Some("help-wanted-issues"),
            SearchSort::Updated => Some("updated"),
            SearchSort::BestMatch => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_param(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Parameters of a repository search.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    pub sort: SearchSort,
    pub order: SortOrder,
    pub page_size: u32,
    pub max_items: usize,
    /// Client-side pause between page requests.
    pub inter_page_delay: Duration,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        SearchParams {
            query: query.into(),
            sort: SearchSort::Stars,
            order: SortOrder::Desc,
            page_size: 10,
            max_items: 100,
            inter_page_delay: Duration::from_secs(1),
        }
    }

    pub fn sort(mut self, sort: SearchSort, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn inter_page_delay(mut self, delay: Duration) -> Self {
        self.inter_page_delay = delay;
        self
    }

    fn request(&self) -> RequestDescriptor {
        let mut request = RequestDescriptor::new("/search/repositories").with_query("q", &self.query);
        if let Some(sort) = self.sort.as_param() {
            request = request
                .with_query("sort", sort)
                .with_query("order", self.order.as_param());
        }
        request.with_query("per_page", self.page_size)
    }
}

/// Client for the three read operations.
///
/// Holds no state besides its transport, so one client can serve
/// independent operations on separate tasks.
pub struct GitHubClient<T = HttpTransport> {
    transport: T,
}

impl GitHubClient<HttpTransport> {
    /// Build a client that talks HTTP to `config.base_url`.
    pub fn new(credential: Credential, config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(credential, config)?;
        Ok(GitHubClient { transport })
    }
}

impl<T: Transport> GitHubClient<T> {
    pub fn with_transport(transport: T) -> Self {
        GitHubClient { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Search public repositories, returning at most `params.max_items`.
    pub async fn search_repositories(&self, params: &SearchParams) -> Result<Collected<Repository>> {
        info!("Searching repositories for '{}'", params.query);
        pagination::collect_bounded(
            &self.transport,
            &params.request(),
            params.page_size,
            params.max_items,
            params.inter_page_delay,
        )
        .await
    }

    /// List every commit of `owner/repo`, newest first.
    pub async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        page_size: u32,
    ) -> Result<Collected<Commit>> {
        info!("Listing commits for {}/{}", owner, repo);
        let request = RequestDescriptor::new(format!("{}/commits", repo_endpoint(owner, repo)))
            .with_query("per_page", page_size);
        pagination::collect_exhaustive(&self.transport, &request, page_size).await
    }

    /// Metadata and content of a file, or the listing of a folder.
    pub async fn get_content(&self, owner: &str, repo: &str, path: &str) -> Result<Option<Content>> {
        let path = path.trim_start_matches('/');
        info!("Getting content of {}/{}/{}", owner, repo, path);
        let request = RequestDescriptor::new(format!(
            "{}/contents/{}",
            repo_endpoint(owner, repo),
            encode_path(path)
        ));
        pagination::fetch_one(&self.transport, &request).await
    }
}

fn repo_endpoint(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}",
        urlencoding::encode(owner),
        urlencoding::encode(repo)
    )
}

/// Percent-encode each segment of a repository path, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
