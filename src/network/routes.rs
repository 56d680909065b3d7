//! HTTP routes
//!
//! Axum handlers that turn requests into [`Request`]s and run them on the
//! blocking pool through [`Service::handle`].

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, FromRequest, OriginalUri, Path, Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Form, Router};
use bytes::Bytes;
use tokio::sync::Semaphore;

use crate::config::Config;
use crate::error::{KeeperError, Result};
use crate::protocol::{
    form_fields, json_fields, parse_id, CountParams, ListParams, Request, Response, API_PREFIX,
};
use crate::query::CancelToken;
use crate::record::Fields;
use crate::service::{respond, Service};

pub const CORS_ALLOW_ORIGIN: &str = "http://localhost:4200";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE";
pub const CORS_ALLOW_HEADERS: &str = "X-Requested-With, Content-Type, Accept";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Shared by every handler
#[derive(Clone)]
struct AppState {
    service: Arc<Service>,

    /// Cancelled at shutdown; aborts running filter passes
    cancel: CancelToken,

    permits: Arc<Semaphore>,
}

/// Build the application router.
///
/// Routes are served at the root and again under `/api`. Every response,
/// errors included, carries the CORS headers.
pub fn router(service: Arc<Service>, cancel: CancelToken, config: &Config) -> Router {
    let state = AppState {
        service,
        cancel,
        permits: Arc::new(Semaphore::new(config.max_concurrent_requests.max(1))),
    };

    let routes = Router::new()
        .route(
            "/clients",
            get(list_clients).post(create_client).options(preflight),
        )
        .route("/clients-all", get(count_clients).options(preflight))
        .route(
            "/clients/{id}",
            put(update_client).delete(delete_client).options(preflight),
        )
        .method_not_allowed_fallback(unrouted);

    Router::new()
        .merge(routes.clone())
        .nest(API_PREFIX, routes)
        .fallback(unrouted)
        .layer(DefaultBodyLimit::max(config.max_request_size))
        .layer(middleware::from_fn_with_state(state.clone(), admit))
        .layer(middleware::map_response(cors_headers))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_clients(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let request = query
        .map_err(bad_query)
        .and_then(|Query(params)| params.into_page_request())
        .map(Request::ListPage);
    dispatch(state, request).await
}

async fn count_clients(
    State(state): State<AppState>,
    query: std::result::Result<Query<CountParams>, QueryRejection>,
) -> Response {
    let request = query.map_err(bad_query).map(|Query(params)| Request::Count {
        filter: params.filter.unwrap_or_default(),
    });
    dispatch(state, request).await
}

async fn create_client(State(state): State<AppState>, ClientBody(fields): ClientBody) -> Response {
    dispatch(state, Ok(Request::Create { fields })).await
}

async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ClientBody(fields): ClientBody,
) -> Response {
    let request = parse_id(&id).map(|id| Request::Update { id, fields });
    dispatch(state, request).await
}

async fn delete_client(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let request = parse_id(&id).map(|id| Request::Delete { id });
    dispatch(state, request).await
}

async fn preflight(State(state): State<AppState>) -> Response {
    dispatch(state, Ok(Request::Preflight)).await
}

/// Unknown paths and unsupported methods; OPTIONS is always a preflight
async fn unrouted(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let request = if method == Method::OPTIONS {
        Request::Preflight
    } else {
        Request::Unrouted {
            method: method.to_string(),
            path: uri.path().to_string(),
        }
    };
    dispatch(state, Ok(request)).await
}

/// Run a routed request on the blocking pool
async fn dispatch(state: AppState, request: Result<Request>) -> Response {
    let request = match request {
        Ok(request) => request,
        Err(e) => return respond(Err(e)),
    };

    let AppState { service, cancel, .. } = state;
    match tokio::task::spawn_blocking(move || service.handle(request, &cancel)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Request task failed: {}", e);
            Response::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

fn bad_query(rejection: QueryRejection) -> KeeperError {
    KeeperError::Protocol(rejection.body_text())
}

// =============================================================================
// Body Extraction
// =============================================================================

/// Record fields from a JSON or form-encoded body
struct ClientBody(Fields);

impl<S> FromRequest<S> for ClientBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .is_some_and(|ct| ct.starts_with(FORM_CONTENT_TYPE));

        if is_form {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|r| Response::error(r.status(), &r.body_text()))?;
            return Ok(Self(form_fields(pairs)));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|r| Response::error(r.status(), &r.body_text()))?;
        json_fields(&body)
            .map(Self)
            .map_err(|e| respond(Err(e)))
    }
}

// =============================================================================
// Middleware
// =============================================================================

/// Reject with 503 once `max_concurrent_requests` are in flight
async fn admit(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: Next,
) -> axum::response::Response {
    match Arc::clone(&state.permits).try_acquire_owned() {
        Ok(permit) => {
            let response = next.run(request).await;
            drop(permit);
            response
        }
        Err(_) => {
            tracing::warn!("Rejecting request: concurrency limit reached");
            Response::error(StatusCode::SERVICE_UNAVAILABLE, "Too many requests").into_response()
        }
    }
}

async fn cors_headers(mut response: axum::response::Response) -> axum::response::Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    response
}
