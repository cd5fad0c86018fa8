use crate::types::{Request, RequestSpec};
use crate::validate::rules::{hooks, variables};
use crate::validate::validator::{Validator, ID_RE};

pub(crate) fn validate_request(v: &mut Validator, req: &Request) {
    if req.meta.id.trim().is_empty() {
        v.push("meta.id", "must not be empty");
    } else if !ID_RE.is_match(&req.meta.id) {
        v.push("meta.id", "must match regex ^[A-Za-z0-9_\\-\\.]+$");
    }

    match &req.spec {
        RequestSpec::Http(s) => {
            if s.url.trim().is_empty() {
                v.push("spec.url", "must not be empty");
            }
        }
        RequestSpec::Rpc(s) => {
            if s.address.trim().is_empty() {
                v.push("spec.address", "must not be empty");
            }
        }
    }

    hooks::validate_pre_request(v, req.id(), req.spec.pre_request(), "spec.preRequest");
    hooks::validate_post_request(v, req.kind(), req.spec.post_request(), "spec.postRequest");
    variables::validate_variables(v, req.kind(), req.spec.variables(), "spec.variables");
}
