//! Response emission.
//!
//! # Responsibilities
//! - Describe the effects a handler may request (JSON, redirect, view, text)
//! - Turn those effects into HTTP responses
//!
//! # Design Decisions
//! - Handlers return a `Response`; the dispatcher never inspects it
//! - Redirects use `302 Found` with a `Location` header
//! - Render and encoding failures become `500` responses and are logged

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;

use crate::http::view::ViewRenderer;

/// The response a handler asks the host to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// `200` with a JSON body.
    Json(Value),
    /// `302` to the given location.
    Redirect(String),
    /// `200` with a rendered view.
    View { name: String, data: Value },
    /// Plain text with an explicit status.
    Text { status: StatusCode, body: String },
}

impl Response {
    /// JSON body from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Response::Json(value),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode JSON response");
                Response::text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode response")
            }
        }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Response::Redirect(location.into())
    }

    pub fn view(name: impl Into<String>, data: Value) -> Self {
        Response::View {
            name: name.into(),
            data,
        }
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Response::Text {
            status,
            body: body.into(),
        }
    }

    /// Sent when no route matched and no fallback is configured.
    pub fn not_found() -> Self {
        Response::text(StatusCode::NOT_FOUND, "No matching route found")
    }

    /// Status code this response will be sent with, before rendering.
    pub fn status(&self) -> StatusCode {
        match self {
            Response::Json(_) | Response::View { .. } => StatusCode::OK,
            Response::Redirect(_) => StatusCode::FOUND,
            Response::Text { status, .. } => *status,
        }
    }

    /// Build the HTTP response, rendering views with `views`.
    pub fn into_http(self, views: &dyn ViewRenderer) -> axum::response::Response {
        match self {
            Response::Json(value) => Json(value).into_response(),
            Response::Redirect(location) => {
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
            Response::View { name, data } => match views.render(&name, &data) {
                Ok(html) => Html(html).into_response(),
                Err(e) => {
                    tracing::error!(view = %name, error = %e, "Failed to render view");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render view").into_response()
                }
            },
            Response::Text { status, body } => (status, body).into_response(),
        }
    }
}
