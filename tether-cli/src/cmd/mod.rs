pub mod config;
pub mod env;
pub mod send;
pub mod validate;
