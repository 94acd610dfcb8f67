#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use github_api_client_lib::{ClientError, RequestDescriptor, ResponseDescriptor, Result, Transport};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Replays canned responses in order and records every request it sees.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<ResponseDescriptor>>>,
    seen: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<ResponseDescriptor>>) -> Self {
        ScriptedTransport {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.seen.lock().unwrap().clone()
    }

    pub fn pages(&self) -> Vec<Option<u32>> {
        self.requests().iter().map(|r| r.page()).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor> {
        self.seen.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {:?}", request))
    }
}

pub fn json_response(status: StatusCode, body: Value) -> Result<ResponseDescriptor> {
    Ok(ResponseDescriptor::new(
        status,
        HeaderMap::new(),
        serde_json::to_vec(&body).unwrap(),
    ))
}

pub fn ok(body: Value) -> Result<ResponseDescriptor> {
    json_response(StatusCode::OK, body)
}

fn forbidden(remaining: u64, reset_epoch: i64) -> Result<ResponseDescriptor> {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-ratelimit-remaining",
        HeaderValue::from_str(&remaining.to_string()).unwrap(),
    );
    headers.insert(
        "x-ratelimit-reset",
        HeaderValue::from_str(&reset_epoch.to_string()).unwrap(),
    );
    Ok(ResponseDescriptor::new(
        StatusCode::FORBIDDEN,
        headers,
        br#"{"message":"API rate limit exceeded"}"#.to_vec(),
    ))
}

pub fn rate_limited(reset_epoch: i64) -> Result<ResponseDescriptor> {
    forbidden(0, reset_epoch)
}

/// A 403 that still has requests left, i.e. a permission failure.
pub fn forbidden_with_quota(remaining: u64) -> Result<ResponseDescriptor> {
    forbidden(remaining, chrono::Utc::now().timestamp() + 60)
}

pub fn transport_failure() -> Result<ResponseDescriptor> {
    Err(ClientError::Transport("connection reset by peer".into()))
}

pub fn repo(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("repo-{}", id),
        "full_name": format!("owner/repo-{}", id),
        "html_url": format!("https://github.com/owner/repo-{}", id),
        "stargazers_count": 1000 - id,
    })
}

pub fn search_page(total_count: u64, ids: std::ops::Range<u64>) -> Result<ResponseDescriptor> {
    let items: Vec<Value> = ids.map(repo).collect();
    ok(json!({
        "total_count": total_count,
        "incomplete_results": false,
        "items": items,
    }))
}

pub fn commit(n: u64) -> Value {
    json!({
        "sha": format!("{:040x}", n),
        "commit": { "message": format!("commit {}", n) },
    })
}

pub fn commit_page(ns: std::ops::Range<u64>) -> Result<ResponseDescriptor> {
    let commits: Vec<Value> = ns.map(commit).collect();
    ok(Value::Array(commits))
}
