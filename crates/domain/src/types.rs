//! Request and response value types shared by every resource.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// URL query parameters, e.g. `{"search": "kubernetes"}` or
/// `{"fields": "id,label"}`.
pub type Params = BTreeMap<String, String>;

/// Names of the fields the API should return for a model.
///
/// An empty list lets the API pick the model's default fields.
pub type Fields = Vec<String>;

/// JSON object sent on create and update.
pub type Body = Map<String, Value>;

/// One page of a resource listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsPage {
    /// Total number of matching items on the server, across all pages.
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<Value>,
}

impl ResultsPage {
    /// Absolute URL of the following page, if any.
    #[must_use]
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| !next.is_empty())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("body must be a map or a struct, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("can't convert the given body: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Converts a serialisable struct or map into a [`Body`].
///
/// Field names follow the value's serde attributes.
///
/// # Errors
///
/// Returns [`BodyError::NotAnObject`] when the value does not serialise to a
/// JSON object, and [`BodyError::Serialize`] when serialisation itself fails.
pub fn make_body_from<T: Serialize + ?Sized>(value: &T) -> Result<Body, BodyError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(BodyError::NotAnObject { kind: json_kind(&other) }),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
