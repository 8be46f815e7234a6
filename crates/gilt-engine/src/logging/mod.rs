//! `env_logger` installation for binaries built on the engine.
//!
//! Library code only talks to the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
