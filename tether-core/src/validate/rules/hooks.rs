use crate::types::{PostRequest, PreRequest, RequestKind, VariableSource};
use crate::validate::validator::{Validator, ENV_KEY_RE};

pub(crate) fn validate_pre_request(v: &mut Validator, request_id: &str, hook: &PreRequest, path: &str) {
    match hook {
        PreRequest::TriggerRequest { request_id: target } => {
            if target.trim().is_empty() {
                v.push(format!("{path}.requestId"), "must not be empty (use \"none\" to disable)");
            } else if hook.trigger_target() == Some(request_id) {
                v.push(format!("{path}.requestId"), "request must not trigger itself");
            }
        }
        PreRequest::Script { script, .. } if script.trim().is_empty() => {
            v.push(format!("{path}.script"), "must not be empty");
        }
        _ => {}
    }
}

pub(crate) fn validate_post_request(v: &mut Validator, kind: RequestKind, hook: &PostRequest, path: &str) {
    match hook {
        PostRequest::None => {}
        PostRequest::SetEnvFromResponse(set) => {
            if !set.from.allowed_for(kind) {
                v.push(
                    format!("{path}.from"),
                    format!("source '{}' is not available on {kind} responses", set.from.as_str()),
                );
            }
            if !ENV_KEY_RE.is_match(&set.target) {
                v.push(format!("{path}.target"), "must be a non-empty name without whitespace or braces");
            }
            if set.from_key.trim().is_empty() {
                let what = if set.from == VariableSource::Body { "JSONPath" } else { "key" };
                v.push(format!("{path}.fromKey"), format!("{what} must not be empty"));
            }
        }
        PostRequest::Script { script, .. } => {
            if script.trim().is_empty() {
                v.push(format!("{path}.script"), "must not be empty");
            }
        }
    }
}
