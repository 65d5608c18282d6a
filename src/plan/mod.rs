// ABOUTME: Plan module - from a mission to a runnable crew.
// ABOUTME: PlanSpec types, the Planner that produces them and the PlanCompiler.

mod compiler;
mod planner;
mod spec;

pub use compiler::{CompiledAgent, CompiledPlan, CompiledTask, PlanCompiler};
pub use planner::{LlmPlanner, Planner, extract_json};
pub use spec::{AgentSpec, PlanSpec, TaskSpec};

#[cfg(test)]
mod compiler_test;
#[cfg(test)]
mod planner_test;
