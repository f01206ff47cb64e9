//! Agent runtime for the financial analyst
//!
//! [`AgentExecutor`] runs the LLM tool-calling loop, [`ToolAgent`] adapts it
//! to the [`analyst_core::Agent`] trait, and [`AgentRuntime`] holds the shared
//! provider and tool registry used to build agents.

pub mod agents;
pub mod executor;
pub mod runtime;

pub use agents::ToolAgent;
pub use executor::{
    AgentExecutor, AgentExecutorBuilder, ExecutionOutcome, ExecutorConfig, ITERATION_LIMIT_MESSAGE,
    ToolStep,
};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
