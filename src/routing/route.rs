//! Routes and the handler contract.

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::http::request::RequestContext;
use crate::http::response::Response;

/// Something a route can invoke.
///
/// Handlers receive the request context and the captured path variables
/// as ordered positional arguments, and return the response to send.
pub trait Handler: Send + Sync {
    fn invoke(&self, request: &RequestContext, args: &[String]) -> Response;

    /// Label used in logs and route listings.
    fn name(&self) -> &str {
        "closure"
    }
}

impl<F> Handler for F
where
    F: Fn(&RequestContext, &[String]) -> Response + Send + Sync,
{
    fn invoke(&self, request: &RequestContext, args: &[String]) -> Response {
        self(request, args)
    }
}

/// A named controller operation, e.g. `UserController::show`.
pub struct Action<F> {
    name: String,
    logic: F,
}

impl<F> Action<F>
where
    F: Fn(&RequestContext, &[String]) -> Response + Send + Sync,
{
    pub fn new(controller: &str, operation: &str, logic: F) -> Self {
        Self {
            name: format!("{}::{}", controller, operation),
            logic,
        }
    }
}

impl<F> Handler for Action<F>
where
    F: Fn(&RequestContext, &[String]) -> Response + Send + Sync,
{
    fn invoke(&self, request: &RequestContext, args: &[String]) -> Response {
        (self.logic)(request, args)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Redirects every request to a fixed location. The usual fallback.
#[derive(Debug, Clone)]
pub struct RedirectTo {
    location: String,
    name: String,
}

impl RedirectTo {
    pub fn new(location: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            name: format!("redirect -> {}", location),
            location,
        }
    }
}

impl Handler for RedirectTo {
    fn invoke(&self, _request: &RequestContext, _args: &[String]) -> Response {
        Response::redirect(self.location.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A registered binding of method and path pattern to a handler.
#[derive(Clone)]
pub struct Route {
    path: String,
    method: Method,
    handler: Arc<dyn Handler>,
    has_variables: bool,
}

impl Route {
    pub fn new(path: impl Into<String>, method: Method, handler: Arc<dyn Handler>) -> Self {
        let path = path.into();
        Self {
            has_variables: path.contains('{') && path.contains('}'),
            path,
            method,
            handler,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }

    /// Whether the pattern holds at least one `{variable}` segment.
    pub fn has_variables(&self) -> bool {
        self.has_variables
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("handler", &self.handler.name())
            .field("has_variables", &self.has_variables)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(_: &RequestContext, _: &[String]) -> Response {
        Response::Json(serde_json::Value::Null)
    }

    #[test]
    fn test_has_variables() {
        assert!(Route::new("/users/{id}", Method::GET, Arc::new(ok)).has_variables());
        assert!(!Route::new("/users", Method::GET, Arc::new(ok)).has_variables());
        assert!(!Route::new("/users/{id", Method::GET, Arc::new(ok)).has_variables());
    }

    #[test]
    fn test_action_name() {
        let action = Action::new("UserController", "show", ok);
        assert_eq!(action.name(), "UserController::show");
    }

    #[test]
    fn test_redirect_handler() {
        let ctx = RequestContext::new("/nowhere", Method::GET, "");
        let fallback = RedirectTo::new("/");
        assert_eq!(fallback.invoke(&ctx, &[]), Response::redirect("/"));
    }
}
