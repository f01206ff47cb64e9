//! Shared utilities for the financial analyst workspace
//!
//! Logging setup and small environment-variable helpers used by the
//! configuration layers of the other crates.

pub mod env;
pub mod logging;

pub use env::{env_parse, env_var};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
