//! Financial analyst agents

pub mod analyst_agent;
pub mod smart;

pub use analyst_agent::{AgentResponse, AnalystAgent};
pub use smart::SmartAgent;
