//! HTTP boundary for the bug tracker.
//!
//! An axum router over shared [`BugService`] state. Handlers stay thin:
//! they parse the request, call the service, and translate the result into
//! the wire envelopes. Client-input failures use the regular failure
//! envelope; everything outside the contract (unmatched routes, body parse
//! rejections, internal errors) uses the bare `{ error: { message, status } }`
//! shape.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use eyre::{Context, Result};

use crate::protocol::{ApiError, ApiSuccess, BugInput, HealthStatus, ListParams, UnhandledError};
use crate::service::{BugService, ServiceError};
use crate::types::{Bug, DESCRIPTION_MAX, Severity, Status, TITLE_MAX, ValidationError};

pub const DEFAULT_PORT: u16 = 4000;

/// Where the server binds.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
        }
    }
}

/// Shared handler state.
///
/// The service sits behind a mutex because axum runs handlers concurrently
/// and update's read-validate-write sequence must not interleave. The guard
/// is never held across an await point; every operation is pure in-memory
/// computation, so the critical section is short.
#[derive(Clone)]
pub struct AppState {
    service: Arc<Mutex<BugService>>,
}

impl AppState {
    pub fn new(service: BugService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BugService>, ApiFailure> {
        self.service.lock().map_err(|_| ApiFailure::Unhandled {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "bug store mutex poisoned".to_string(),
        })
    }
}

/// A handler failure, already mapped to its wire form.
#[derive(Debug, Clone)]
enum ApiFailure {
    /// Client-input failure, rendered as the regular failure envelope.
    Client {
        status: StatusCode,
        message: String,
        details: Option<String>,
    },
    /// Failure outside the envelope contract, rendered as the bare shape.
    Unhandled { status: StatusCode, message: String },
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        match self {
            ApiFailure::Client {
                status,
                message,
                details,
            } => (status, Json(ApiError::new(message, details))).into_response(),
            ApiFailure::Unhandled { status, message } => {
                if status.is_server_error() {
                    log::error!("unhandled error: {}", message);
                }
                (status, Json(UnhandledError::new(message, status.as_u16()))).into_response()
            }
        }
    }
}

impl From<ServiceError> for ApiFailure {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidParameter { parameter, allowed } => ApiFailure::Client {
                status: StatusCode::BAD_REQUEST,
                message: format!("Invalid {} parameter", parameter),
                details: Some(format!("{} must be one of: {}", capitalize(parameter), allowed)),
            },
            ServiceError::InvalidId => ApiFailure::Client {
                status: StatusCode::BAD_REQUEST,
                message: "Invalid bug ID".to_string(),
                details: Some("Bug ID must be a positive integer".to_string()),
            },
            ServiceError::Validation(err) => ApiFailure::Client {
                status: StatusCode::BAD_REQUEST,
                message: format!("Invalid {}", err.field()),
                details: Some(validation_details(&err)),
            },
            ServiceError::NotFound(id) => ApiFailure::Client {
                status: StatusCode::NOT_FOUND,
                message: "Bug not found".to_string(),
                details: Some(format!("No bug found with ID {}", id)),
            },
            ServiceError::Internal(message) => ApiFailure::Unhandled {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message,
            },
        }
    }
}

/// Wire `details` text for a field rule violation.
fn validation_details(err: &ValidationError) -> String {
    match err {
        ValidationError::EmptyTitle | ValidationError::TitleTooLong => format!(
            "Title is required and must be less than {} characters",
            TITLE_MAX
        ),
        ValidationError::EmptyDescription | ValidationError::DescriptionTooLong => format!(
            "Description is required and must be less than {} characters",
            DESCRIPTION_MAX
        ),
        ValidationError::InvalidSeverity(_) => {
            format!("Severity must be one of: {}", Severity::ALLOWED)
        }
        ValidationError::InvalidStatus(_) => {
            format!("Status must be one of: {}", Status::ALLOWED)
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn invalid_body(rejection: JsonRejection) -> ApiFailure {
    // Axum answers 415/422 for some rejections; on this surface every
    // body-decode failure is a 400.
    ApiFailure::Unhandled {
        status: StatusCode::BAD_REQUEST,
        message: rejection.body_text(),
    }
}

/// Build the router over the given state.
///
/// Unknown methods on known paths fall through to the same 404 handler as
/// unknown paths, rather than axum's default 405.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/bugs", get(list_bugs).post(create_bug).fallback(fallback))
        .route(
            "/api/bugs/:id",
            get(get_bug).put(update_bug).fallback(fallback),
        )
        .route("/health", get(health))
        .fallback(fallback)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(config: ServerConfig, service: BugService) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    log::info!("Bug tracker API listening on {}", config.bind);
    axum::serve(listener, app(AppState::new(service)))
        .await
        .context("Server error")?;
    Ok(())
}

async fn list_bugs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiSuccess<Vec<Bug>>>, ApiFailure> {
    let service = state.lock()?;
    let listing = service.list(&params)?;
    Ok(Json(ApiSuccess::listing(listing)))
}

async fn get_bug(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiSuccess<Bug>>, ApiFailure> {
    let service = state.lock()?;
    let bug = service.get(&id)?;
    Ok(Json(ApiSuccess::record(bug)))
}

async fn create_bug(
    State(state): State<AppState>,
    payload: Result<Json<BugInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiSuccess<Bug>>), ApiFailure> {
    let Json(input) = payload.map_err(invalid_body)?;
    let mut service = state.lock()?;
    let bug = service.create(&input)?;
    log::info!("created bug {}", bug.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiSuccess::with_message(bug, "Bug created successfully")),
    ))
}

async fn update_bug(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BugInput>, JsonRejection>,
) -> Result<Json<ApiSuccess<Bug>>, ApiFailure> {
    let Json(patch) = payload.map_err(invalid_body)?;
    let mut service = state.lock()?;
    let bug = service.update(&id, &patch)?;
    log::info!("updated bug {}", bug.id);
    Ok(Json(ApiSuccess::with_message(bug, "Bug updated successfully")))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}

async fn fallback(method: Method, uri: Uri) -> impl IntoResponse {
    log::debug!("no route for {} {}", method, uri);
    (StatusCode::NOT_FOUND, Json(UnhandledError::not_found()))
}
