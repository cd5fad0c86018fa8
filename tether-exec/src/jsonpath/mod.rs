use serde_json::Value as JsonValue;
use serde_json_path::JsonPath;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),
    #[error("invalid JSONPath expression {path:?}: {message}")]
    InvalidPath { path: String, message: String },
    #[error("extraction task failed: {0}")]
    TaskJoin(String),
}

/// Evaluates a JSONPath expression against JSON text.
///
/// `Ok(None)` means the path matched nothing; malformed JSON or an invalid
/// expression is an error.
pub trait JsonPathEvaluator: Send + Sync {
    fn get(&self, json_text: &str, path: &str) -> Result<Option<JsonValue>, ExtractionError>;
}

/// [`JsonPathEvaluator`] backed by `serde_json_path` (RFC 9535).
///
/// A single match yields that node; several matches yield them as an array.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonPathEvaluator;

impl JsonPathEvaluator for SerdeJsonPathEvaluator {
    fn get(&self, json_text: &str, path: &str) -> Result<Option<JsonValue>, ExtractionError> {
        let jsonpath = JsonPath::parse(path.trim()).map_err(|e| ExtractionError::InvalidPath {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let doc: JsonValue =
            serde_json::from_str(json_text).map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;

        let nodes = jsonpath.query(&doc).all();
        match nodes.len() {
            0 => Ok(None),
            1 => Ok(Some(nodes[0].clone())),
            _ => Ok(Some(JsonValue::Array(nodes.into_iter().cloned().collect()))),
        }
    }
}
