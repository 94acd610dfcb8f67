use clap::{Parser, Subcommand};

use crate::client::{SearchSort, SortOrder};

/// Command line client for the GitHub REST API with pagination and
/// rate-limit handling.
#[derive(Parser)]
#[clap(
    author,
    version,
    about,
    long_about = "Search repositories, list commits and read file contents on GitHub, following pagination and waiting out rate limits."
)]
pub struct Args {
    /// GitHub API token for authentication. Falls back to GITHUB_TOKEN.
    #[clap(short, long, global = true)]
    pub token: Option<String>,

    /// Also write the fetched records as JSON to this file.
    #[clap(short, long, global = true)]
    pub output: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search public repositories.
    Search {
        /// Search query, e.g. "machine learning language:rust".
        query: String,

        #[clap(long, value_enum, default_value = "stars")]
        sort: SearchSort,

        #[clap(long, value_enum, default_value = "desc")]
        order: SortOrder,

        /// Results requested per page (1-100).
        #[clap(short = 'p', long, default_value = "10")]
        per_page: u32,

        /// Maximum number of repositories to retrieve.
        #[clap(short = 'm', long, default_value = "100")]
        max_repos: usize,

        /// Seconds to wait between page requests.
        #[clap(short, long, default_value = "1.0")]
        delay: f64,
    },

    /// List the commits of a repository.
    Commits {
        owner: String,
        repo: String,

        /// Commits requested per page (1-100).
        #[clap(short = 'p', long, default_value = "10")]
        per_page: u32,
    },

    /// Show a file or folder of a repository.
    Content {
        owner: String,
        repo: String,
        path: String,
    },

    /// Run a sample search, commit listing and content lookup side by side.
    Demo,
}
