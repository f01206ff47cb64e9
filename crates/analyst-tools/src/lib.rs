//! Tool management for the financial analyst agents
//!
//! Tools are the functions an agent can call: fetching metrics, filtering
//! M&A news and generating a SWOT write-up.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;
