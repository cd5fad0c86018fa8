#![forbid(unsafe_code)]

//! Data model for the tether request runner: saved requests, their pre/post
//! hooks and binding rules, and the environments those rules write into.

pub mod error;
pub mod expressions;
pub mod parser;
pub mod types;
pub mod validate;

pub use crate::error::{ParseError, ValidationError, Violation};
pub use crate::expressions::{parse_template, render_template, request_variables, system_variables, Template};
pub use crate::parser::{parse_environment_str, parse_request_str, parse_str, DocumentFormat, Parsed};
pub use crate::types::{Environment, Request, RequestKind};
pub use crate::validate::{validate_request, Validate};
