//! HTTP transport for the Jira REST API.
//!
//! The client speaks to Jira through [`HttpTransport`] so that version
//! fallback and status mapping can be exercised without a network.
//! [`ReqwestTransport`] is the real implementation; [`MockTransport`] replays
//! scripted responses.

use crate::config::JiraConfig;
use crate::error::JiraError;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Jira REST API versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// Current API, rich-text documents and `expand=names`
    V3,
    /// Legacy API, wiki-text descriptions
    V2,
}

impl ApiVersion {
    /// Path prefix for this version
    pub fn prefix(&self) -> &'static str {
        match self {
            ApiVersion::V3 => "/rest/api/3",
            ApiVersion::V2 => "/rest/api/2",
        }
    }

    /// Full path for an endpoint under this version
    pub fn path(&self, endpoint: &str) -> String {
        format!("{}{}", self.prefix(), endpoint)
    }

    /// Path of a single issue
    pub fn issue_path(&self, key: &str) -> String {
        self.path(&format!("/issue/{}", key))
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST with a JSON body
    Post,
}

/// A request relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path including the API prefix
    pub path: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl ApiRequest {
    /// GET request for a path
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// POST request for a path with a JSON body
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Append a query parameter
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Value of a query parameter, if set
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A response that reached us with a status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl ApiResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request that never produced a response (DNS, TLS, connection reset...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure(pub String);

impl From<TransportFailure> for JiraError {
    fn from(failure: TransportFailure) -> Self {
        JiraError::Connectivity(failure.0)
    }
}

/// Sends requests to Jira
pub trait HttpTransport: Send + Sync {
    /// Execute one request
    fn execute(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportFailure>> + Send;
}

/// Transport backed by `reqwest` with basic authentication
#[derive(Clone)]
pub struct ReqwestTransport {
    base_url: String,
    email: String,
    api_token: String,
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport from configuration.
    ///
    /// One trailing slash is stripped from the base URL. No request timeout is
    /// set beyond reqwest's defaults.
    pub fn new(config: &JiraConfig) -> Result<Self, JiraError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| JiraError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: strip_trailing_slash(&config.base_url).to_string(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
            client,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportFailure> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("Jira {:?} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .basic_auth(&self.email, Some(&self.api_token))
        .header(ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportFailure(format!("Request failed: {}", e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure(format!("Failed to read response: {}", e)))?;

        Ok(ApiResponse { status, body })
    }
}

/// Strip at most one trailing slash
pub fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

type Script = HashMap<(Method, String), VecDeque<Result<ApiResponse, TransportFailure>>>;

/// Scripted transport for tests
///
/// Responses are queued per method and path and consumed in order. Unscripted
/// requests get a 404. Clones share the script and the request log.
///
/// # Examples
///
/// ```
/// use casegen_jira::{ApiRequest, HttpTransport, Method, MockTransport};
///
/// # tokio_test_block_on(async {
/// let transport = MockTransport::new();
/// transport.respond(Method::Get, "/rest/api/3/issue/A-1", 200, "{}");
///
/// let response = transport.execute(&ApiRequest::get("/rest/api/3/issue/A-1")).await.unwrap();
/// assert_eq!(response.status, 200);
/// assert_eq!(transport.request_count(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<Script>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a method and path
    pub fn respond(&self, method: Method, path: impl Into<String>, status: u16, body: impl Into<String>) {
        self.push(method, path.into(), Ok(ApiResponse::new(status, body)));
    }

    /// Queue a network-level failure for a method and path
    pub fn fail(&self, method: Method, path: impl Into<String>, message: impl Into<String>) {
        self.push(method, path.into(), Err(TransportFailure(message.into())));
    }

    fn push(&self, method: Method, path: String, outcome: Result<ApiResponse, TransportFailure>) {
        self.script
            .lock()
            .unwrap()
            .entry((method, path))
            .or_default()
            .push_back(outcome);
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl HttpTransport for MockTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportFailure> {
        self.requests.lock().unwrap().push(request.clone());

        let next = self
            .script
            .lock()
            .unwrap()
            .get_mut(&(request.method, request.path.clone()))
            .and_then(VecDeque::pop_front);

        next.unwrap_or_else(|| {
            Ok(ApiResponse::new(
                404,
                format!(r#"{{"errorMessages":["no scripted response for {}"]}}"#, request.path),
            ))
        })
    }
}
