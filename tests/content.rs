mod common;

use chrono::Utc;
use github_api_client_lib::{ClientError, Content, GitHubClient};
use reqwest::StatusCode;
use serde_json::json;
use tokio::time::{Duration, Instant};

use common::*;

fn readme() -> serde_json::Value {
    json!({
        "type": "file",
        "name": "README",
        "path": "README",
        "sha": "980a0d5f19a64b4b30a87d4206aade58726b60e3",
        "size": 13,
        "encoding": "base64",
        "content": "SGVsbG8gV29ybGQhCg==\n",
        "html_url": "https://github.com/octocat/Hello-World/blob/master/README"
    })
}

#[tokio::test(start_paused = true)]
async fn test_existing_file_decodes_content() {
    let client = GitHubClient::with_transport(ScriptedTransport::new(vec![ok(readme())]));

    let content = client
        .get_content("octocat", "hello-world", "README")
        .await
        .unwrap();

    match content {
        Some(Content::File(file)) => {
            assert_eq!(file.entry.path, "README");
            assert_eq!(file.decoded_content().unwrap().unwrap(), b"Hello World!\n");
        }
        other => panic!("expected a file, got {:?}", other),
    }
    let request = &client.transport().requests()[0];
    assert_eq!(request.endpoint(), "/repos/octocat/hello-world/contents/README");
    assert_eq!(request.page(), None);
}

#[tokio::test(start_paused = true)]
async fn test_missing_path_is_none() {
    let client = GitHubClient::with_transport(ScriptedTransport::new(vec![json_response(
        StatusCode::NOT_FOUND,
        json!({ "message": "Not Found" }),
    )]));

    let content = client
        .get_content("octocat", "hello-world", "nope.txt")
        .await
        .unwrap();

    assert!(content.is_none());
    assert_eq!(client.transport().requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_folder_listing() {
    let client = GitHubClient::with_transport(ScriptedTransport::new(vec![ok(json!([
        { "type": "dir", "name": "src", "path": "src", "sha": "a", "size": 0 },
        { "type": "file", "name": "Cargo.toml", "path": "Cargo.toml", "sha": "b", "size": 512 }
    ]))]));

    let content = client.get_content("octocat", "hello-world", "/").await.unwrap();

    match content {
        Some(Content::Directory(entries)) => assert_eq!(entries.len(), 2),
        other => panic!("expected a directory, got {:?}", other),
    }
    assert_eq!(
        client.transport().requests()[0].endpoint(),
        "/repos/octocat/hello-world/contents/"
    );
}

#[tokio::test(start_paused = true)]
async fn test_path_with_reserved_characters_is_encoded() {
    let client = GitHubClient::with_transport(ScriptedTransport::new(vec![ok(readme())]));

    client
        .get_content("octocat", "hello-world", "docs/what?#1.md")
        .await
        .unwrap();

    assert_eq!(
        client.transport().requests()[0].endpoint(),
        "/repos/octocat/hello-world/contents/docs/what%3F%231.md"
    );
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_is_retried_once() {
    let client = GitHubClient::with_transport(ScriptedTransport::new(vec![
        rate_limited(Utc::now().timestamp() - 5),
        ok(readme()),
    ]));

    let start = Instant::now();
    let content = client
        .get_content("octocat", "hello-world", "README")
        .await
        .unwrap();

    assert!(matches!(content, Some(Content::File(_))));
    assert_eq!(client.transport().requests().len(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_second_rate_limit_is_surfaced() {
    let reset = Utc::now().timestamp() - 5;
    let client = GitHubClient::with_transport(ScriptedTransport::new(vec![
        rate_limited(reset),
        rate_limited(reset),
    ]));

    let result = client.get_content("octocat", "hello-world", "README").await;

    match result {
        Err(ClientError::RateLimitExhausted { reset_epoch }) => assert_eq!(reset_epoch, reset),
        other => panic!("expected rate limit error, got {:?}", other),
    }
    assert_eq!(client.transport().requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_permission_error_is_not_retried() {
    let client = GitHubClient::with_transport(ScriptedTransport::new(vec![forbidden_with_quota(10)]));

    let result = client.get_content("octocat", "private", "README").await;

    assert!(matches!(
        result,
        Err(ClientError::PermissionOrClient { status, .. }) if status == StatusCode::FORBIDDEN
    ));
    assert_eq!(client.transport().requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_is_returned() {
    let client = GitHubClient::with_transport(ScriptedTransport::new(vec![transport_failure()]));

    let result = client.get_content("octocat", "hello-world", "README").await;

    assert!(matches!(result, Err(ClientError::Transport(_))));
}
