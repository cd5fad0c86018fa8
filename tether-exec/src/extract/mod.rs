mod view;

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tether_core::types::{PostRequestSet, Variable, VariableSource};

use crate::jsonpath::{ExtractionError, JsonPathEvaluator};

pub use view::ResponseView;

/// One value to write into the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub target: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to extract {target}: {source}")]
pub struct RuleError {
    pub target: String,
    #[source]
    pub source: ExtractionError,
}

/// Evaluates every rule against `view` on its own blocking task, all started
/// together, and waits for all of them.
///
/// Bindings come back in rule order. When any rule fails the first failure
/// (in rule order) is returned and no bindings are, so callers apply either
/// every binding of a response or none.
pub async fn extract_variables(
    rules: &[Variable],
    view: &ResponseView,
    evaluator: Arc<dyn JsonPathEvaluator>,
) -> Result<Vec<Binding>, RuleError> {
    let view = Arc::new(view.clone());
    let handles: Vec<_> = rules
        .iter()
        .map(|rule| {
            let rule = rule.clone();
            let view = view.clone();
            let evaluator = evaluator.clone();
            let target = rule.target_env_variable.clone();
            let handle = tokio::task::spawn_blocking(move || {
                extract_rule(&rule, &view, evaluator.as_ref())
            });
            (target, handle)
        })
        .collect();

    collect_bindings(handles).await
}

async fn collect_bindings(
    handles: Vec<(String, tokio::task::JoinHandle<Result<Option<Binding>, ExtractionError>>)>,
) -> Result<Vec<Binding>, RuleError> {
    let mut bindings = Vec::new();
    for (target, handle) in handles {
        match handle.await {
            Ok(Ok(Some(b))) => bindings.push(b),
            Ok(Ok(None)) => {}
            Ok(Err(source)) => return Err(RuleError { target, source }),
            Err(e) => {
                return Err(RuleError {
                    target,
                    source: ExtractionError::TaskJoin(e.to_string()),
                })
            }
        }
    }
    Ok(bindings)
}

/// Applies the enable/status gate, then extracts the value of one rule.
pub fn extract_rule(
    rule: &Variable,
    view: &ResponseView,
    evaluator: &dyn JsonPathEvaluator,
) -> Result<Option<Binding>, ExtractionError> {
    if !rule.matches_status(view.status_code) {
        return Ok(None);
    }
    let value = match rule.from {
        VariableSource::Body => from_body(&view.body, &rule.json_path, evaluator)?,
        source => view.lookup(source, &rule.source_key).map(str::to_string),
    };
    Ok(value.map(|value| Binding {
        target: rule.target_env_variable.clone(),
        value,
    }))
}

/// The single static rule of a `setEnv` hook.
///
/// Body extraction is skipped when the body is empty or, for HTTP, not JSON.
pub fn extract_static(
    set: &PostRequestSet,
    view: &ResponseView,
    evaluator: &dyn JsonPathEvaluator,
) -> Result<Option<Binding>, ExtractionError> {
    if set.status_code != view.status_code {
        return Ok(None);
    }
    let value = match set.from {
        VariableSource::Body => {
            if view.body.is_empty() || !view.is_json {
                return Ok(None);
            }
            from_body(&view.body, &set.from_key, evaluator)?
        }
        source => view.lookup(source, &set.from_key).map(str::to_string),
    };
    Ok(value.map(|value| Binding {
        target: set.target.clone(),
        value,
    }))
}

fn from_body(
    body: &str,
    path: &str,
    evaluator: &dyn JsonPathEvaluator,
) -> Result<Option<String>, ExtractionError> {
    // Only string results are bound; numbers, objects and nulls are dropped.
    match evaluator.get(body, path)? {
        Some(JsonValue::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}
