mod chain;
mod config;
mod error;
pub mod events;
mod orchestrator;
mod post_request;
mod response;

pub use config::{OrchestratorConfig, ScriptingConfig};
pub use error::{Entity, HookError, SendError};
pub use events::{
    CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink, TracingEventSink,
};
pub use orchestrator::Orchestrator;
pub use response::Response;
