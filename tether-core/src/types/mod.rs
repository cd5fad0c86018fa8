mod common;
mod environment;
mod hooks;
mod request;
mod variable;

pub use common::KeyValue;
pub use environment::{Environment, EnvironmentMeta};
pub use hooks::{PostRequest, PostRequestSet, PreRequest, ScriptLanguage, UnknownScriptLanguage, NONE_REQUEST_ID};
pub use request::{HttpRequestSpec, Request, RequestKind, RequestMeta, RequestSpec, RpcRequestSpec};
pub use variable::{Variable, VariableSource};
