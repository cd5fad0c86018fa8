pub(crate) mod hooks;
pub(crate) mod request;
pub(crate) mod variables;
