#![forbid(unsafe_code)]

//! Request orchestration for tether.
//!
//! [`Orchestrator::send`] resolves a saved request, runs its trigger chain,
//! dispatches it to the HTTP or RPC transport, and binds values from the
//! response into the active environment.

pub mod executor;
pub mod extract;
pub mod jsonpath;
pub mod script;
pub mod transport;

pub use crate::executor::{
    Entity, Event, EventSink, HookError, Orchestrator, OrchestratorConfig, Response,
    ScriptingConfig, SendError,
};
pub use crate::jsonpath::{ExtractionError, JsonPathEvaluator, SerdeJsonPathEvaluator};
pub use crate::script::{HttpScriptRunner, ScriptError, ScriptRegistry, ScriptRunner};
pub use crate::transport::{
    HttpResponse, HttpTransport, ReqwestHttpTransport, RpcResponse, RpcTransport, TransportError,
    UnsupportedRpcTransport,
};
