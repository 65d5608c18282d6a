// ABOUTME: ExecutionEngine - runs a compiled plan's tasks in order against their agents.
// ABOUTME: Feeds earlier task outputs forward as context and honors cancellation.

use std::sync::Arc;

use super::context::ExecutionContext;
use crate::agent::{AgentRunner, RunnerSettings};
use crate::error::ExecutionError;
use crate::hook::HookEvent;
use crate::llm::LlmClient;
use crate::plan::{CompiledAgent, CompiledPlan};

/// Output of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutput {
    pub agent: String,
    pub description: String,
    pub output: String,
}

/// Result of a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalResult {
    /// Output of the last task.
    pub output: String,
    /// Every task's output, in execution order.
    pub task_outputs: Vec<TaskOutput>,
}

pub struct ExecutionEngine {
    client: Arc<dyn LlmClient>,
    settings: RunnerSettings,
}

impl ExecutionEngine {
    pub fn new(client: Arc<dyn LlmClient>, settings: RunnerSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    /// Run every task sequentially. The first error aborts the run.
    pub async fn run(
        &self,
        plan: &CompiledPlan,
        ctx: &ExecutionContext,
    ) -> Result<FinalResult, ExecutionError> {
        if plan.tasks.is_empty() {
            return Err(ExecutionError::NoTasks);
        }
        // Refuse before spending any model calls.
        if let Some((index, task)) = plan
            .tasks
            .iter()
            .enumerate()
            .find(|(_, t)| t.agent.is_none())
        {
            return Err(ExecutionError::UnassignedTask {
                index,
                agent: task.agent_ref.clone(),
            });
        }

        let total = plan.tasks.len();
        let mut task_outputs: Vec<TaskOutput> = Vec::with_capacity(total);

        for (index, task) in plan.tasks.iter().enumerate() {
            let Some(agent) = task.agent.clone() else {
                return Err(ExecutionError::UnassignedTask {
                    index,
                    agent: task.agent_ref.clone(),
                });
            };

            if ctx.is_cancelled() {
                return Err(ExecutionError::Cancelled);
            }

            tracing::info!(
                session = ctx.session_id(),
                task = index + 1,
                total,
                agent = %agent.name,
                "task started"
            );
            ctx.notify(HookEvent::TaskStart {
                index,
                total,
                agent: Some(agent.name.clone()),
                description: task.description.clone(),
            })
            .await;

            let prompt = Self::task_prompt(&task.description, &task_outputs);
            let mut runner = AgentRunner::new(agent.clone(), self.client.clone(), self.settings.clone())
                .hooks(ctx.hooks().clone())
                .coworkers(Self::coworkers_of(plan, &agent));

            let output = tokio::select! {
                biased;
                _ = ctx.cancellation().cancelled() => {
                    tracing::info!(session = ctx.session_id(), task = index + 1, "task cancelled");
                    return Err(ExecutionError::Cancelled);
                }
                result = runner.run(&prompt) => result?,
            };

            ctx.notify(HookEvent::TaskEnd {
                index,
                total,
                output: output.content.clone(),
            })
            .await;

            task_outputs.push(TaskOutput {
                agent: agent.name.clone(),
                description: task.description.clone(),
                output: output.content,
            });
        }

        let output = task_outputs
            .last()
            .map(|t| t.output.clone())
            .unwrap_or_default();
        Ok(FinalResult {
            output,
            task_outputs,
        })
    }

    fn task_prompt(description: &str, previous: &[TaskOutput]) -> String {
        if previous.is_empty() {
            return description.to_string();
        }
        let context = previous
            .iter()
            .map(|t| t.output.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("{description}\n\nThis is the context you're working with:\n{context}")
    }

    fn coworkers_of(plan: &CompiledPlan, agent: &Arc<CompiledAgent>) -> Vec<Arc<CompiledAgent>> {
        plan.agents
            .iter()
            .filter(|other| !Arc::ptr_eq(other, agent))
            .cloned()
            .collect()
    }
}
