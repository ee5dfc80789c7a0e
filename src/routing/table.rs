//! The route table.
//!
//! # Design Decisions
//! - Append-only; registration order is kept and decides ties
//! - No uniqueness check: duplicate method/path pairs are legal
//! - Built during startup, then frozen inside the `Dispatcher`

use std::sync::Arc;

use axum::http::Method;

use crate::pipeline::Stream;
use crate::routing::route::{Handler, Route};

/// Registration-ordered list of routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route binding `method` and `path` to `handler`.
    pub fn register<H>(&mut self, path: impl Into<String>, method: Method, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.register_shared(path, method, Arc::new(handler))
    }

    /// Append a route whose handler is already shared.
    pub fn register_shared(
        &mut self,
        path: impl Into<String>,
        method: Method,
        handler: Arc<dyn Handler>,
    ) -> &mut Self {
        let route = Route::new(path, method, handler);
        tracing::debug!(
            method = %route.method(),
            path = %route.path(),
            handler = route.handler().name(),
            "Route registered"
        );
        self.routes.push(route);
        self
    }

    pub fn get<H: Handler + 'static>(&mut self, path: impl Into<String>, handler: H) -> &mut Self {
        self.register(path, Method::GET, handler)
    }

    pub fn post<H: Handler + 'static>(&mut self, path: impl Into<String>, handler: H) -> &mut Self {
        self.register(path, Method::POST, handler)
    }

    pub fn put<H: Handler + 'static>(&mut self, path: impl Into<String>, handler: H) -> &mut Self {
        self.register(path, Method::PUT, handler)
    }

    pub fn patch<H: Handler + 'static>(&mut self, path: impl Into<String>, handler: H) -> &mut Self {
        self.register(path, Method::PATCH, handler)
    }

    pub fn delete<H: Handler + 'static>(&mut self, path: impl Into<String>, handler: H) -> &mut Self {
        self.register(path, Method::DELETE, handler)
    }

    /// All routes in registration order.
    pub fn list(&self) -> &[Route] {
        &self.routes
    }

    /// The routes as a stream keyed by registration index.
    pub fn stream(&self) -> Stream<usize, &Route> {
        Stream::list(self.routes.iter())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::RequestContext;
    use crate::http::response::Response;

    fn noop(_: &RequestContext, _: &[String]) -> Response {
        Response::not_found()
    }

    #[test]
    fn test_registration_order() {
        let mut table = RouteTable::new();
        table
            .get("/", noop)
            .post("/users", noop)
            .get("/users/{id}", noop)
            .get("/", noop);

        let listed: Vec<(&str, &Method)> = table.list().iter().map(|r| (r.path(), r.method())).collect();
        assert_eq!(
            listed,
            vec![
                ("/", &Method::GET),
                ("/users", &Method::POST),
                ("/users/{id}", &Method::GET),
                ("/", &Method::GET),
            ]
        );
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_stream_keys_follow_order() {
        let mut table = RouteTable::new();
        table.put("/a", noop).delete("/b", noop).patch("/c", noop);

        let keys: Vec<usize> = table.stream().keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2]);
        assert_eq!(table.stream().into_values()[2].method(), &Method::PATCH);
    }
}
