mod rules;
mod validator;

use crate::error::ValidationError;
use crate::types::Request;
use validator::Validator;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for Request {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_request(self)
    }
}

pub fn validate_request(req: &Request) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.validate_request(req);
    v.finish()
}
