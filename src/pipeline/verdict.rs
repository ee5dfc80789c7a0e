//! Predicate results.
//!
//! Stream predicates may be written against dynamic data (decoded JSON),
//! so their return type is not always a plain `bool`. A [`Verdict`] is
//! anything that may or may not carry a boolean; a verdict that carries
//! none is rejected by the stream instead of being coerced.

use serde_json::Value;

/// A predicate result that may or may not be boolean.
pub trait Verdict {
    /// Returns the boolean carried by this verdict, if any.
    fn as_bool(&self) -> Option<bool>;

    /// Short description used in error messages.
    fn describe(&self) -> String;
}

impl Verdict for bool {
    fn as_bool(&self) -> Option<bool> {
        Some(*self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl Verdict for Option<bool> {
    fn as_bool(&self) -> Option<bool> {
        *self
    }

    fn describe(&self) -> String {
        match self {
            Some(b) => b.to_string(),
            None => "none".to_string(),
        }
    }
}

impl Verdict for Value {
    fn as_bool(&self) -> Option<bool> {
        self.as_bool()
    }

    fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format!("number {}", n),
            Value::String(s) => format!("string {:?}", s),
            Value::Array(_) => "array".to_string(),
            Value::Object(_) => "object".to_string(),
        }
    }
}
