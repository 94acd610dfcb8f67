use clap::Parser;
use dotenv::dotenv;
use futures::join;
use github_api_client_lib::{
    log_filter, Args, ClientConfig, Collected, Command, Commit, Content, Credential,
    GitHubClient, Repository, SearchParams,
};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::Serialize;
use std::error::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Duration;
use tracing::{error, info, warn};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Initialize the tracing logger
    tracing_subscriber::fmt().with_env_filter(log_filter()).init();

    dotenv().ok();

    let args = Args::parse();

    // Token from arguments, then environment
    let credential = match &args.token {
        Some(token) => Credential::new(token.clone()),
        None => Credential::from_env(),
    };
    let credential = match credential {
        Ok(credential) => credential,
        Err(e) => {
            error!("GitHub token not provided or found in environment");
            return Err(e.into());
        }
    };

    let config = ClientConfig::from_env().with_user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    let client = GitHubClient::new(credential, &config)?;
    let progress = MultiProgress::new();

    match args.command {
        Command::Search {
            query,
            sort,
            order,
            per_page,
            max_repos,
            delay,
        } => {
            let delay = Duration::try_from_secs_f64(delay)
                .map_err(|e| format!("invalid delay {}: {}", delay, e))?;
            let params = SearchParams::new(query)
                .sort(sort, order)
                .page_size(per_page)
                .max_items(max_repos)
                .inter_page_delay(delay);

            let pb = spinner(&progress, format!("Searching '{}'", params.query))?;
            let repos = client.search_repositories(&params).await?;
            pb.finish_and_clear();

            print_repositories(&repos, params.max_items);
            if let Some(path) = &args.output {
                write_json(path, &repos.items).await?;
            }
        }
        Command::Commits {
            owner,
            repo,
            per_page,
        } => {
            let pb = spinner(&progress, format!("Listing commits of {}/{}", owner, repo))?;
            let commits = client.list_commits(&owner, &repo, per_page).await?;
            pb.finish_and_clear();

            print_commits(&commits);
            if let Some(path) = &args.output {
                write_json(path, &commits.items).await?;
            }
        }
        Command::Content { owner, repo, path } => {
            let pb = spinner(&progress, format!("Getting {}/{}/{}", owner, repo, path))?;
            let content = client.get_content(&owner, &repo, &path).await;
            pb.finish_and_clear();

            let content = content?;
            print_content(&path, content.as_ref());
            if let (Some(output), Some(content)) = (&args.output, &content) {
                write_json(output, content).await?;
            }
        }
        Command::Demo => run_demo(&client, &progress).await?,
    }

    Ok(())
}

/// The three sample operations, each awaited independently so a rate-limit
/// wait in one does not hold up the others.
async fn run_demo(client: &GitHubClient, progress: &MultiProgress) -> Result<(), BoxError> {
    let params = SearchParams::new("machine learning")
        .page_size(10)
        .max_items(30)
        .inter_page_delay(Duration::from_secs(1));

    let search_pb = spinner(progress, "Searching for repos".to_string())?;
    let commits_pb = spinner(progress, "Listing commits".to_string())?;
    let content_pb = spinner(progress, "Getting content".to_string())?;

    let (repos, commits, content) = join!(
        async {
            let result = client.search_repositories(&params).await;
            search_pb.finish_and_clear();
            result
        },
        async {
            let result = client.list_commits("octocat", "hello-world", 5).await;
            commits_pb.finish_and_clear();
            result
        },
        async {
            let result = client.get_content("octocat", "hello-world", "README").await;
            content_pb.finish_and_clear();
            result
        }
    );

    println!("SEARCHING FOR REPOS");
    print_repositories(&repos?, params.max_items);
    println!("{}\n", "-".repeat(20));

    println!("LISTING COMMITS");
    print_commits(&commits?);
    println!("{}\n", "-".repeat(20));

    println!("GETTING CONTENT");
    print_content("README", content?.as_ref());
    Ok(())
}

fn spinner(progress: &MultiProgress, message: String) -> Result<ProgressBar, BoxError> {
    let pb = progress.add(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {wide_msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

fn report_interruption<T>(what: &str, collected: &Collected<T>) {
    if let Some(e) = &collected.interruption {
        warn!(
            "Result is partial: stopped after {} {}: {}",
            collected.len(),
            what,
            e
        );
    }
}

fn print_repositories(repos: &Collected<Repository>, max_items: usize) {
    report_interruption("repositories", repos);
    println!(
        "Total repositories fetched: {} (requested up to {})",
        repos.len(),
        max_items
    );
    for repo in &repos.items {
        println!(
            "Repo Name: {}, Stars: {}, Url: {}",
            repo.name, repo.stargazers_count, repo.html_url
        );
    }
}

fn print_commits(commits: &Collected<Commit>) {
    report_interruption("commits", commits);
    for commit in &commits.items {
        println!(
            "Commit SHA: {},\n Commit message: {}",
            commit.sha, commit.commit.message
        );
    }
}

fn print_content(path: &str, content: Option<&Content>) {
    match content {
        None => warn!("Nothing found at '{}'", path),
        Some(Content::Directory(entries)) => {
            for entry in entries {
                println!("{:<9} {:>9}  {}", entry.kind, entry.size, entry.path);
            }
        }
        Some(Content::File(file)) => {
            println!("{} ({} bytes, sha {})", file.entry.path, file.entry.size, file.entry.sha);
            match file.decoded_content() {
                Ok(Some(bytes)) => println!("{}", String::from_utf8_lossy(&bytes)),
                Ok(None) => warn!("GitHub returned no inline content for '{}'", path),
                Err(e) => error!("Could not decode '{}': {}", path, e),
            }
        }
    }
}

async fn write_json<T: Serialize + ?Sized>(path: &str, value: &T) -> Result<(), BoxError> {
    let json = serde_json::to_string_pretty(value)?;
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await?;
    file.write_all(json.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await?;

    info!("Saved results to '{}'", path);
    Ok(())
}
