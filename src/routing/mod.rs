//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     table.rs (register path, method, handler in order)
//!     → Dispatcher::new freezes the table behind an Arc
//!
//! Incoming request (target, method, raw query):
//!     → dispatcher.rs (build RequestContext)
//!     → matcher.rs (first matching route + captured variables)
//!     → route handler, or the fallback, or 404
//! ```
//!
//! # Design Decisions
//! - Routes are immutable once registered; the table is read-only while serving
//! - Deterministic: registration order breaks ties, first match wins
//! - Handlers are typed trait objects resolved at registration time

pub mod dispatcher;
pub mod matcher;
pub mod route;
pub mod table;

pub use dispatcher::{DispatchError, Dispatcher};
pub use matcher::{RouteMatch, RouteMatcher};
pub use route::{Action, Handler, RedirectTo, Route};
pub use table::RouteTable;
