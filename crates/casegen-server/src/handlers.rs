//! HTTP request handlers.
//!
//! Thin JSON wrappers around `JiraClient`. Domain errors are translated to
//! status codes here and nowhere else.

use casegen_domain::{ConnectionReport, NormalizedStory, StoryInput};
use casegen_jira::{ConfigCheck, HttpTransport, JiraClient, JiraError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

/// Shared application state
pub struct AppState<T> {
    /// Jira client
    pub client: Arc<JiraClient<T>>,
    /// Result of validating the Jira configuration at startup
    pub config_check: Arc<ConfigCheck>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            config_check: Arc::clone(&self.config_check),
        }
    }
}

impl<T: HttpTransport> AppState<T> {
    /// Create state from a client and its configuration check
    pub fn new(client: JiraClient<T>, config_check: ConfigCheck) -> Self {
        Self {
            client: Arc::new(client),
            config_check: Arc::new(config_check),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Always "ok" when the server answers
    pub status: String,
    /// Whether Jira credentials are configured
    pub jira_configured: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Jira-related error
    Jira(JiraError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Jira(e) => match e {
                JiraError::NotFound { .. } => StatusCode::NOT_FOUND,
                JiraError::AuthFailure { .. } => StatusCode::UNAUTHORIZED,
                JiraError::Transport { .. } | JiraError::MalformedResponse(_) => {
                    StatusCode::BAD_GATEWAY
                }
                JiraError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
                JiraError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let AppError::Jira(e) = self;

        if status.is_server_error() {
            error!("Jira request failed: {}", e);
        } else {
            warn!("Jira request rejected: {}", e);
        }

        let body = Json(ErrorResponse {
            error: e.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<JiraError> for AppError {
    fn from(e: JiraError) -> Self {
        AppError::Jira(e)
    }
}

/// GET /health
async fn health_check<T: HttpTransport>(State(state): State<AppState<T>>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        jira_configured: state.config_check.is_ready(),
    })
}

/// GET /api/config/check
async fn config_check<T: HttpTransport>(State(state): State<AppState<T>>) -> Json<ConfigCheck> {
    Json(state.config_check.as_ref().clone())
}

/// GET /api/jira/story/:key
async fn get_story<T: HttpTransport>(
    State(state): State<AppState<T>>,
    Path(key): Path<String>,
) -> Result<Json<NormalizedStory>, AppError> {
    let story = state.client.fetch_story(&key).await?;
    Ok(Json(story))
}

/// GET /api/jira/test
async fn test_connection<T: HttpTransport>(
    State(state): State<AppState<T>>,
) -> Result<Json<ConnectionReport>, AppError> {
    let report = state.client.test_connection().await?;
    Ok(Json(report))
}

/// POST /api/story - Fill blank story fields from Jira when a key is given
async fn hydrate_story<T: HttpTransport>(
    State(state): State<AppState<T>>,
    Json(input): Json<StoryInput>,
) -> Result<Json<StoryInput>, AppError> {
    if !input.needs_hydration() {
        return Ok(Json(input));
    }

    let key = input.jira_key.clone().unwrap_or_default();
    let story = state.client.fetch_story(&key).await?;
    Ok(Json(input.hydrate(story)))
}

/// Create the axum router with all routes
pub fn create_router<T: HttpTransport + 'static>(state: AppState<T>) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check::<T>))
        .route("/api/config/check", get(config_check::<T>))
        .route("/api/jira/story/:key", get(get_story::<T>))
        .route("/api/jira/test", get(test_connection::<T>))
        .route("/api/story", post(hydrate_story::<T>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use casegen_jira::{ConfigIssue, Method, MockTransport};
    use tower::ServiceExt; // for oneshot

    fn create_test_state(transport: &MockTransport) -> AppState<MockTransport> {
        AppState::new(
            JiraClient::with_transport(transport.clone()),
            ConfigCheck::default(),
        )
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state(&MockTransport::new()));

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_missing_credentials() {
        let state = AppState::new(
            JiraClient::with_transport(MockTransport::new()),
            ConfigCheck {
                issues: vec![ConfigIssue::MissingApiToken],
            },
        );
        let app = create_router(state);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();
        assert!(!health.jira_configured);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (JiraError::NotFound { resource: "A-1".into() }, StatusCode::NOT_FOUND),
            (JiraError::AuthFailure { message: "x".into() }, StatusCode::UNAUTHORIZED),
            (JiraError::Transport { status: 500, message: "x".into() }, StatusCode::BAD_GATEWAY),
            (JiraError::Connectivity("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (JiraError::MalformedResponse("x".into()), StatusCode::BAD_GATEWAY),
            (JiraError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_story_not_found() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/rest/api/3/issue/NOPE-1", 404, "");
        let app = create_router(create_test_state(&transport));

        let request = Request::builder()
            .uri("/api/jira/story/NOPE-1")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
