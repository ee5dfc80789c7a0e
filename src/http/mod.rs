//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → request.rs (path/query split, query decoding)
//!     → routing::Dispatcher (match route, invoke handler)
//!     → response.rs (handler effect → HTTP response)
//!     → view.rs (render views on demand)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod view;

pub use request::{decode_query, RequestContext, X_REQUEST_ID};
pub use response::Response;
pub use server::HttpServer;
pub use view::{FileViews, ViewError, ViewRenderer};
