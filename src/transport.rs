use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::{ClientConfig, Credential};
use crate::error::Result;

/// One GET request: endpoint path, query parameters and optional page number.
///
/// Descriptors are built once and never mutated; moving to another page
/// produces a fresh descriptor via [`RequestDescriptor::at_page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    endpoint: String,
    query: Vec<(String, String)>,
    page: Option<u32>,
}

impl RequestDescriptor {
    pub fn new(endpoint: impl Into<String>) -> Self {
        RequestDescriptor {
            endpoint: endpoint.into(),
            query: Vec::new(),
            page: None,
        }
    }

    /// Add a query parameter. A repeated key replaces the earlier value in place.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.query.push((key, value)),
        }
        self
    }

    /// A copy of this descriptor addressing `page`.
    pub fn at_page(&self, page: u32) -> Self {
        RequestDescriptor {
            page: Some(page),
            ..self.clone()
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn page(&self) -> Option<u32> {
        self.page
    }

    /// Query pairs in send order, with `page` last when set.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.query.clone();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs
    }
}

/// A well-formed HTTP response, whatever its status.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseDescriptor {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        ResponseDescriptor {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The `message` field of a GitHub error body, or the raw body text.
    pub fn error_message(&self) -> String {
        match serde_json::from_slice::<Value>(&self.body) {
            Ok(json) => match json.get("message").and_then(|v| v.as_str()) {
                Some(message) => message.to_string(),
                None => json.to_string(),
            },
            Err(_) => String::from_utf8_lossy(&self.body).trim().to_string(),
        }
    }
}

/// Sends a single request. Implementations never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor>;
}

/// [`Transport`] backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
    credential: Credential,
    base_url: String,
    accept: String,
    api_version: String,
}

impl HttpTransport {
    pub fn new(credential: Credential, config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpTransport {
            client: builder.build()?,
            credential,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            accept: config.accept.clone(),
            api_version: config.api_version.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor> {
        let url = format!("{}{}", self.base_url, request.endpoint());

        debug!("Requesting URL: {} page {:?}", url, request.page());
        let response = self
            .client
            .get(&url)
            .query(&request.query_pairs())
            .header(ACCEPT, &self.accept)
            .bearer_auth(self.credential.expose())
            .header("X-GitHub-Api-Version", &self.api_version)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(ResponseDescriptor::new(status, headers, body.to_vec()))
    }
}
