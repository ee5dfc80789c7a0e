//! Route matching logic.
//!
//! # Responsibilities
//! - Pick the first route (registration order) whose method and path
//!   pattern match the request
//! - Capture `{variable}` segments as ordered strings
//!
//! # Design Decisions
//! - Method matching is exact
//! - Trailing slash: one trailing `/` is stripped from the request path
//!   when the candidate pattern is longer than one character
//! - Patterns without variables compare as whole strings
//! - Patterns with variables compare segment by segment; a request path
//!   with fewer segments fails, extra trailing segments are not rejected
//! - Linear scan with early exit, no index

use axum::http::Method;

use crate::pipeline::PipelineError;
use crate::routing::route::Route;
use crate::routing::table::RouteTable;

/// A successful match: the route plus captured variables in segment order.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub variables: Vec<String>,
}

/// Finds the route that should handle a request.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatcher<'a> {
    table: &'a RouteTable,
}

impl<'a> RouteMatcher<'a> {
    pub fn new(table: &'a RouteTable) -> Self {
        Self { table }
    }

    /// Match `path` and `method` against the table.
    ///
    /// `Ok(None)` means no route matched.
    pub fn find(&self, path: &str, method: &Method) -> Result<Option<RouteMatch<'a>>, PipelineError> {
        let mut variables = Vec::new();

        let route = self.table.stream().first(|_, route| {
            if route.method() != method {
                return false;
            }

            let candidate = normalize_path(route.path(), path);
            if !route.has_variables() {
                return route.path() == candidate;
            }

            match match_segments(route.path(), candidate) {
                Some(captured) => {
                    variables = captured;
                    true
                }
                None => false,
            }
        })?;

        Ok(route.map(|route| RouteMatch { route, variables }))
    }
}

/// Strip one trailing `/` from `path` if `pattern` is longer than one character.
pub fn normalize_path<'p>(pattern: &str, path: &'p str) -> &'p str {
    if pattern.len() > 1 {
        if let Some(stripped) = path.strip_suffix('/') {
            return stripped;
        }
    }
    path
}

/// Whether a pattern segment is a `{name}` placeholder with a non-empty name.
pub fn is_variable_segment(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// Segment-wise match of `pattern` against `path`.
///
/// Returns the captured variables, or `None` if the path is shorter than
/// the pattern or a literal segment differs.
pub fn match_segments(pattern: &str, path: &str) -> Option<Vec<String>> {
    let path_parts: Vec<&str> = path.split('/').collect();
    let mut variables = Vec::new();

    for (index, part) in pattern.split('/').enumerate() {
        let actual = path_parts.get(index)?;
        if is_variable_segment(part) {
            variables.push(actual.to_string());
        } else if part != *actual {
            return None;
        }
    }

    Some(variables)
}
