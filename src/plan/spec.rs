// ABOUTME: PlanSpec - the planner's structured description of a crew.
// ABOUTME: Plain serde types; the compiler turns them into runnable agents and tasks.

use serde::{Deserialize, Serialize};

/// Agents and the ordered tasks they should perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSpec {
    pub agents: Vec<AgentSpec>,
    pub tasks: Vec<TaskSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Unique key within a plan; tasks refer to agents by this name.
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// Tool identifiers such as `CalculatorTools.calculate`.
    #[serde(default)]
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub description: String,
    /// Name of the agent that should run this task.
    pub agent: String,
}

impl PlanSpec {
    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name.as_str()).collect()
    }
}
