//! View rendering.
//!
//! Views are HTML files under the configured views directory. A view may
//! reference `${name}` placeholders; each is replaced by the matching
//! field of the data object handed to `Response::view`.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while rendering a view.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("view '{name}' could not be read: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid view name '{0}'")]
    InvalidName(String),

    #[error("template syntax error: {0}")]
    Syntax(String),

    #[error("no value for placeholder '{0}'")]
    MissingValue(String),
}

/// Renders a named view with data.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, name: &str, data: &Value) -> Result<String, ViewError>;
}

/// Views loaded from `<dir>/<name>.html` on every render.
#[derive(Debug, Clone)]
pub struct FileViews {
    dir: PathBuf,
}

impl FileViews {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ViewRenderer for FileViews {
    fn render(&self, name: &str, data: &Value) -> Result<String, ViewError> {
        if name.is_empty() || name.split('/').any(|part| part == ".." || part.is_empty()) {
            return Err(ViewError::InvalidName(name.to_string()));
        }

        let path = self.dir.join(format!("{}.html", name));
        let template = fs::read_to_string(&path).map_err(|source| ViewError::Io {
            name: name.to_string(),
            source,
        })?;

        tracing::debug!(view = %name, path = ?path, "Rendering view");
        render_template(&template, data)
    }
}

/// Replace `${name}` placeholders with fields of `data`.
///
/// Strings are inserted as-is; other JSON values use their JSON text.
/// `$` not followed by `{` is copied through.
pub fn render_template(input: &str, data: &Value) -> Result<String, ViewError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(ViewError::Syntax("unterminated placeholder".to_string()));
        };

        let name = after[..end].trim();
        if name.is_empty() {
            return Err(ViewError::Syntax("empty placeholder".to_string()));
        }

        match data.get(name) {
            Some(Value::String(s)) => out.push_str(s),
            Some(other) => out.push_str(&other.to_string()),
            None => return Err(ViewError::MissingValue(name.to_string())),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_placeholders() {
        let data = json!({ "name": "Jamie", "age": 31 });
        let html = render_template("<p>${name} is ${ age }</p>", &data).unwrap();
        assert_eq!(html, "<p>Jamie is 31</p>");
    }

    #[test]
    fn test_render_passthrough() {
        let html = render_template("costs $5", &json!({})).unwrap();
        assert_eq!(html, "costs $5");
    }

    #[test]
    fn test_render_errors() {
        assert!(matches!(
            render_template("${missing}", &json!({})),
            Err(ViewError::MissingValue(name)) if name == "missing"
        ));
        assert!(matches!(render_template("${open", &json!({})), Err(ViewError::Syntax(_))));
        assert!(matches!(render_template("${}", &json!({})), Err(ViewError::Syntax(_))));
    }

    #[test]
    fn test_file_views() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("home.html"), "<h1>${title}</h1>").unwrap();

        let views = FileViews::new(dir.path());
        let html = views.render("home", &json!({ "title": "Welcome" })).unwrap();
        assert_eq!(html, "<h1>Welcome</h1>");

        assert!(matches!(views.render("absent", &json!({})), Err(ViewError::Io { .. })));
        assert!(matches!(views.render("../secret", &json!({})), Err(ViewError::InvalidName(_))));
    }
}
