//! Logger bootstrap.
//!
//! The engine itself only uses the `log` facade; this module wires a concrete
//! `env_logger` backend for applications that don't bring their own.

mod init;

pub use init::{LoggingConfig, init_logging};
