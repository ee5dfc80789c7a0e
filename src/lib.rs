//! jester: a minimal web-application framework.
//!
//! Register routes in a [`routing::RouteTable`], freeze them into a
//! [`routing::Dispatcher`], and serve them with [`http::HttpServer`].
//! Path patterns use `/`-separated segments; `{name}` segments capture
//! the matching request segment and hand it to the handler.

// Core subsystems
pub mod config;
pub mod http;
pub mod pipeline;
pub mod routing;

// Collaborator interfaces
pub mod model;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::JesterConfig;
pub use http::{HttpServer, RequestContext, Response};
pub use lifecycle::Shutdown;
pub use pipeline::Stream;
pub use routing::{Action, Dispatcher, Handler, RedirectTo, RouteTable};
