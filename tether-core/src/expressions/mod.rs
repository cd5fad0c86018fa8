mod system;
mod template;

pub use system::{request_variables, system_variables, SYSTEM_VARIABLES};
pub use template::{Segment, Template, parse_template, render_template};
