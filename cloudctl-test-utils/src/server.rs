//! axum server emulating the database firewall endpoints.

use std::io;
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use cloudctl_api::{FirewallRulesResponse, UpdateFirewallRulesRequest};
use serde_json::json;
use tokio::sync::oneshot;

use crate::store::{FirewallStore, RecordedRequest};

#[derive(Clone)]
struct AppState {
    expected_auth: Arc<str>,
    store: FirewallStore,
}

/// Router for `/v2/databases/{id}/firewall`; any other path is recorded as
/// unexpected.
pub fn router(token: &str, store: FirewallStore) -> Router {
    let state = AppState {
        expected_auth: Arc::from(format!("Bearer {token}")),
        store,
    };
    Router::new()
        .route("/v2/databases/:id/firewall", any(firewall))
        .fallback(unexpected)
        .with_state(state)
}

fn error_body(status: StatusCode, id: &str, message: &str) -> Response {
    (status, Json(json!({ "id": id, "message": message }))).into_response()
}

async fn firewall(
    State(state): State<AppState>,
    Path(cluster_id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(&*state.expected_auth);

    state.store.record(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorized,
        body: serde_json::from_slice(&body).ok(),
    });

    if !authorized {
        return error_body(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Unable to authenticate you.",
        );
    }

    match method {
        Method::GET => match state.store.rules(&cluster_id) {
            Some(rules) => Json(FirewallRulesResponse { rules }).into_response(),
            None => not_found(),
        },
        Method::PUT => {
            let request: UpdateFirewallRulesRequest = match serde_json::from_slice(&body) {
                Ok(request) => request,
                Err(e) => {
                    state
                        .store
                        .record_unexpected(format!("PUT {} with malformed body: {e}", uri.path()));
                    return error_body(StatusCode::BAD_REQUEST, "bad_request", &e.to_string());
                }
            };
            match state.store.apply_update(&cluster_id, request) {
                Some(_) => StatusCode::NO_CONTENT.into_response(),
                None => not_found(),
            }
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

fn not_found() -> Response {
    error_body(
        StatusCode::NOT_FOUND,
        "not_found",
        "The resource you were accessing could not be found.",
    )
}

async fn unexpected(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> StatusCode {
    state.store.record_unexpected(format!(
        "{method} {uri} ({} byte body: {})",
        body.len(),
        String::from_utf8_lossy(&body)
    ));
    StatusCode::NOT_FOUND
}

/// A running mock API bound to an ephemeral localhost port.
///
/// The server runs on its own thread and runtime, so it can back blocking
/// tests that spawn the `cloudctl` binary. Dropping the handle stops the
/// server and fails the test if any unexpected request was received.
pub struct MockApiServer {
    url: String,
    store: FirewallStore,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl MockApiServer {
    /// Start serving `store`, accepting only `Authorization: Bearer <token>`.
    pub fn start(token: &str, store: FirewallStore) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.set_nonblocking(true)?;
        let url = format!("http://{}", listener.local_addr()?);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let app = router(token, store.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = thread::Builder::new()
            .name("mock-api".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let listener = match tokio::net::TcpListener::from_std(listener) {
                        Ok(listener) => listener,
                        Err(e) => {
                            tracing::error!("mock API failed to adopt listener: {e}");
                            return;
                        }
                    };
                    let server = axum::serve(listener, app).with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    });
                    if let Err(e) = server.await {
                        tracing::error!("mock API server error: {e}");
                    }
                });
            })?;

        Ok(Self {
            url,
            store,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn store(&self) -> &FirewallStore {
        &self.store
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }

        let unexpected = self.store.unexpected_requests();
        if !unexpected.is_empty() && !thread::panicking() {
            panic!("mock API received unexpected requests:\n{}", unexpected.join("\n"));
        }
    }
}
