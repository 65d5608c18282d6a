// ABOUTME: Agent module - runs compiled agents and lets them delegate to each other.
// ABOUTME: Provides AgentRunner, its settings and output, and the DelegateTool.

mod delegation;
mod runner;

pub use delegation::{DelegateTool, DelegationMode};
pub use runner::{AgentOutput, AgentRunner, RunnerSettings};
