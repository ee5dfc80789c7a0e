//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum Router that forwards every request to the dispatcher
//! - Wire up middleware (request ID, tracing, timeout)
//! - Turn handler responses into HTTP responses; views render on the
//!   blocking pool since renderers may read files
//! - Serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode, Uri},
    response::IntoResponse,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::JesterConfig;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::Response;
use crate::http::view::{FileViews, ViewRenderer};
use crate::lifecycle::wait_for_signal;
use crate::routing::Dispatcher;

/// Application state injected into the catch-all handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub views: Arc<dyn ViewRenderer>,
}

/// HTTP host for a dispatcher.
pub struct HttpServer {
    router: Router,
    config: JesterConfig,
}

impl HttpServer {
    /// Create a server that renders views from `config.app.views_dir`.
    pub fn new(config: JesterConfig, dispatcher: Dispatcher) -> Self {
        let views = Arc::new(FileViews::new(&config.app.views_dir));
        Self::with_views(config, dispatcher, views)
    }

    /// Create a server with a custom view renderer.
    pub fn with_views(config: JesterConfig, dispatcher: Dispatcher, views: Arc<dyn ViewRenderer>) -> Self {
        let state = AppState { dispatcher, views };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &JesterConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(&X_REQUEST_ID)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C or `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &JesterConfig {
        &self.config
    }
}

/// Forward the request to the dispatcher and send back what the handler asked for.
async fn dispatch_handler(State(state): State<AppState>, method: Method, uri: Uri) -> axum::response::Response {
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let raw_query = uri.query().unwrap_or("");

    match state.dispatcher.dispatch(target, method, raw_query) {
        Ok(response @ Response::View { .. }) => {
            let views = Arc::clone(&state.views);
            match tokio::task::spawn_blocking(move || response.into_http(views.as_ref())).await {
                Ok(rendered) => rendered,
                Err(e) => {
                    tracing::error!(request_target = %target, error = %e, "View rendering task failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
                }
            }
        }
        Ok(response) => response.into_http(state.views.as_ref()),
        Err(e) => {
            tracing::error!(request_target = %target, error = %e, "Dispatch failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::RequestContext;
    use crate::http::view::ViewError;
    use std::sync::{mpsc, Mutex};
    use tokio::sync::oneshot;
    use crate::routing::{Action, RedirectTo, RouteTable};
    use axum::http::header;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct NameViews;

    impl ViewRenderer for NameViews {
        fn render(&self, name: &str, data: &Value) -> Result<String, ViewError> {
            Ok(format!("{}:{}", name, data))
        }
    }

    /// Blocks inside `render` until released, reporting when it starts.
    struct GatedViews {
        started: Mutex<Option<oneshot::Sender<()>>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl ViewRenderer for GatedViews {
        fn render(&self, name: &str, _data: &Value) -> Result<String, ViewError> {
            if let Some(started) = self.started.lock().unwrap().take() {
                let _ = started.send(());
            }
            self.release
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5))
                .map(|_| format!("rendered {}", name))
                .map_err(|_| ViewError::Syntax("render was never released".into()))
        }
    }

    fn server(fallback: bool) -> HttpServer {
        let mut routes = RouteTable::new();
        routes
            .get(
                "/users/{id}",
                Action::new("Users", "show", |_: &RequestContext, args: &[String]| {
                    Response::json(&json!({ "id": args[0] }))
                }),
            )
            .get(
                "/about",
                Action::new("Pages", "about", |_: &RequestContext, _: &[String]| {
                    Response::view("about", json!({}))
                }),
            );

        let mut dispatcher = Dispatcher::new(routes);
        if fallback {
            dispatcher = dispatcher.with_fallback(RedirectTo::new("/"));
        }
        HttpServer::with_views(JesterConfig::default(), dispatcher, Arc::new(NameViews))
    }

    async fn send(server: &HttpServer, method: Method, uri: &str) -> axum::response::Response {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        server.router().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_matched_route_returns_json() {
        let server = server(false);
        let response = send(&server, Method::GET, "/users/42?verbose=1").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(&X_REQUEST_ID));

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "id": "42" }));
    }

    #[tokio::test]
    async fn test_view_rendering() {
        let server = server(false);
        let response = send(&server, Method::GET, "/about/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"about:{}");
    }

    #[tokio::test]
    async fn test_view_rendering_leaves_runtime_free() {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let views = Arc::new(GatedViews {
            started: Mutex::new(Some(started_tx)),
            release: Mutex::new(release_rx),
        });

        let mut routes = RouteTable::new();
        routes.get(
            "/page",
            Action::new("Pages", "show", |_: &RequestContext, _: &[String]| {
                Response::view("page", json!({}))
            }),
        );
        let server = HttpServer::with_views(JesterConfig::default(), Dispatcher::new(routes), views);

        // Single-threaded runtime: this task only runs again if rendering
        // does not hold the runtime thread.
        let request = Request::builder().uri("/page").body(Body::empty()).unwrap();
        let pending = tokio::spawn(server.router().oneshot(request));
        started_rx.await.unwrap();
        release_tx.send(()).unwrap();

        let response = pending.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"rendered page");
    }

    #[tokio::test]
    async fn test_unmatched_without_fallback_is_404() {
        let server = server(false);
        let response = send(&server, Method::POST, "/users/42").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unmatched_with_fallback_redirects() {
        let server = server(true);
        let response = send(&server, Method::GET, "/nope").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }
}
