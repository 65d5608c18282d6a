// ABOUTME: Crew module - executing a compiled plan for one mission.
// ABOUTME: ExecutionContext carries per-mission state; ExecutionEngine runs the tasks.

mod context;
mod engine;

pub use context::ExecutionContext;
pub use engine::{ExecutionEngine, FinalResult, TaskOutput};
