//! Core abstractions for the financial analyst workspace
//!
//! This crate defines the traits and types shared by the keyword-routed agent,
//! the LLM-orchestrated agent and the conversational bot.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
