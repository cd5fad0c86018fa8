use crate::types::{RequestKind, Variable, VariableSource};
use crate::validate::validator::{Validator, ENV_KEY_RE};

pub(crate) fn validate_variables(v: &mut Validator, kind: RequestKind, vars: &[Variable], path: &str) {
    for (i, var) in vars.iter().enumerate() {
        let p = format!("{path}[{i}]");

        if !var.from.allowed_for(kind) {
            v.push(
                format!("{p}.from"),
                format!("source '{}' is not available on {kind} responses", var.from.as_str()),
            );
        }

        // Disabled rules may be half-filled drafts.
        if !var.enable {
            continue;
        }

        if !ENV_KEY_RE.is_match(&var.target_env_variable) {
            v.push(
                format!("{p}.targetEnvVariable"),
                "must be a non-empty name without whitespace or braces",
            );
        }

        match var.from {
            VariableSource::Body => {
                if var.json_path.trim().is_empty() {
                    v.push(format!("{p}.jsonPath"), "must not be empty for body rules");
                }
            }
            _ => {
                if var.source_key.is_empty() {
                    v.push(format!("{p}.sourceKey"), "must not be empty");
                }
            }
        }
    }
}
