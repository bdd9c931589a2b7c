//! Observability
//!
//! Tracing subscriber setup shared by every `roadnet` command.

pub mod logging;

pub use logging::{LogFormat, init_logging, verbosity_to_directive};
