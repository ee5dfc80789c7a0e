//! Per-request dispatch.
//!
//! # Responsibilities
//! - Build the `RequestContext` from the raw request strings
//! - Match the request against the frozen route table
//! - Invoke exactly one handler: the matched route's, or the fallback
//!
//! # Design Decisions
//! - The table and fallback are injected at construction; no globals
//! - No match with no fallback yields a `404` response, never a hang
//! - Pipeline errors are returned to the caller, not swallowed

use std::sync::Arc;
use std::time::Instant;

use axum::http::Method;
use thiserror::Error;

use crate::http::request::RequestContext;
use crate::http::response::Response;
use crate::observability::metrics;
use crate::pipeline::PipelineError;
use crate::routing::matcher::RouteMatcher;
use crate::routing::route::Handler;
use crate::routing::table::RouteTable;

/// Errors that abort a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A stream operation failed while matching.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Runs the request → route → handler cycle.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    fallback: Option<Arc<dyn Handler>>,
}

impl Dispatcher {
    /// Freeze `routes` and dispatch against them.
    pub fn new(routes: RouteTable) -> Self {
        tracing::info!(routes = routes.len(), "Route table frozen");
        Self {
            routes: Arc::new(routes),
            fallback: None,
        }
    }

    /// Handler invoked when no route matches.
    pub fn with_fallback<H: Handler + 'static>(mut self, handler: H) -> Self {
        tracing::info!(fallback = handler.name(), "Fallback route configured");
        self.fallback = Some(Arc::new(handler));
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn fallback(&self) -> Option<&dyn Handler> {
        self.fallback.as_deref()
    }

    /// Dispatch one request.
    ///
    /// `target` is the request target (path plus optional `?query`),
    /// `raw_query` the query string without the leading `?`.
    pub fn dispatch(&self, target: &str, method: Method, raw_query: &str) -> Result<Response, DispatchError> {
        let start_time = Instant::now();
        let request = RequestContext::new(target, method, raw_query);

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            query = ?request.query,
            "Dispatching request"
        );

        let matched = match RouteMatcher::new(&self.routes).find(&request.path, &request.method) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!(path = %request.path, error = %e, "Route matching failed");
                metrics::record_dispatch(&request.method, "error", start_time);
                return Err(e.into());
            }
        };

        let (response, outcome) = match matched {
            Some(m) => {
                tracing::debug!(
                    route = %m.route.path(),
                    handler = m.route.handler().name(),
                    variables = ?m.variables,
                    "Route matched"
                );
                (m.route.handler().invoke(&request, &m.variables), "matched")
            }
            None => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(path = %request.path, fallback = fallback.name(), "No route matched");
                    (fallback.invoke(&request, &[]), "fallback")
                }
                None => {
                    tracing::warn!(path = %request.path, "No route matched and no fallback configured");
                    (Response::not_found(), "unmatched")
                }
            },
        };

        metrics::record_dispatch(&request.method, outcome, start_time);
        Ok(response)
    }
}
