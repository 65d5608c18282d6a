// ABOUTME: Hook system for observing mission, task, agent and tool lifecycle.
// ABOUTME: Provides events, the Hook trait, a registry that fans events out, and sinks.

mod sink;

pub use sink::{EventSink, MemorySink, SinkHook};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Lifecycle events fired while a mission runs.
#[derive(Debug, Clone, PartialEq)]
pub enum HookEvent {
    /// A mission was received and planning begins.
    ChainStart { mission: String },

    /// The planner produced a plan and it compiled.
    PlanReady { agents: Vec<String>, tasks: usize },

    /// A task is about to run. `index` is zero-based.
    TaskStart {
        index: usize,
        total: usize,
        agent: Option<String>,
        description: String,
    },

    /// An agent decided on its next step (free text plus tool choice).
    AgentAction { agent: String, log: String },

    /// Fired before a tool is executed.
    ToolStart {
        agent: String,
        tool: String,
        input: Value,
    },

    /// Fired after a tool execution completes.
    ToolEnd {
        agent: String,
        tool: String,
        output: String,
        is_error: bool,
    },

    /// An agent produced its final answer for the current task.
    AgentFinish { agent: String, output: String },

    /// A task completed.
    TaskEnd {
        index: usize,
        total: usize,
        output: String,
    },

    /// The mission finished; `output` is the final result.
    ChainEnd { output: String },

    /// The mission failed at any stage.
    ChainError { error: String },
}

impl HookEvent {
    /// Short event name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            HookEvent::ChainStart { .. } => "chain_start",
            HookEvent::PlanReady { .. } => "plan_ready",
            HookEvent::TaskStart { .. } => "task_start",
            HookEvent::AgentAction { .. } => "agent_action",
            HookEvent::ToolStart { .. } => "tool_start",
            HookEvent::ToolEnd { .. } => "tool_end",
            HookEvent::AgentFinish { .. } => "agent_finish",
            HookEvent::TaskEnd { .. } => "task_end",
            HookEvent::ChainEnd { .. } => "chain_end",
            HookEvent::ChainError { .. } => "chain_error",
        }
    }

    /// Human-readable progress line for a remote observer, if the event has one.
    pub fn describe(&self) -> Option<String> {
        let line = match self {
            HookEvent::ChainStart { mission } => format!("Mission received: {mission}"),
            HookEvent::PlanReady { agents, tasks } => format!(
                "Crew assembled: {} agent(s) [{}], {} task(s)",
                agents.len(),
                agents.join(", "),
                tasks
            ),
            HookEvent::TaskStart {
                index,
                total,
                agent,
                description,
            } => format!(
                "[Task {}/{}] {}: {}",
                index + 1,
                total,
                agent.as_deref().unwrap_or("(unassigned)"),
                description
            ),
            HookEvent::AgentAction { agent, log } => format!("{agent}: {log}"),
            HookEvent::ToolStart { agent, tool, input } => {
                format!("{agent} is using {tool} with input {input}")
            }
            HookEvent::ToolEnd {
                tool,
                output,
                is_error,
                ..
            } => {
                if *is_error {
                    format!("{tool} failed: {output}")
                } else {
                    format!("{tool} returned:\n{output}")
                }
            }
            HookEvent::AgentFinish { agent, output } => format!("{agent} finished:\n{output}"),
            HookEvent::TaskEnd { .. } => return None,
            HookEvent::ChainEnd { output } => output.clone(),
            HookEvent::ChainError { error } => format!("Error: {error}"),
        };
        Some(line)
    }
}

/// Trait for implementing hooks.
///
/// Hooks observe; they cannot block or alter execution. A failing hook is
/// logged and the remaining hooks still run.
#[async_trait]
pub trait Hook: Send + Sync {
    async fn on_event(&self, event: &HookEvent) -> Result<(), anyhow::Error>;

    /// Filter which events this hook cares about. Defaults to all.
    fn accepts(&self, event: &HookEvent) -> bool {
        let _ = event;
        true
    }
}

/// Ordered set of hooks for one mission. Cloning shares the hooks.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: impl Hook + 'static) {
        self.hooks.push(Arc::new(hook));
    }

    pub fn register_arc(&mut self, hook: Arc<dyn Hook>) {
        self.hooks.push(hook);
    }

    /// Deliver an event to every accepting hook, in registration order.
    pub async fn fire(&self, event: &HookEvent) {
        for hook in &self.hooks {
            if !hook.accepts(event) {
                continue;
            }
            if let Err(e) = hook.on_event(event).await {
                tracing::warn!(event = event.kind(), error = %e, "hook failed");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Register a hook that only handles ToolStart events.
    ///
    /// The callback receives (agent, tool, input).
    pub fn on_tool_start<F>(&mut self, f: F)
    where
        F: Fn(&str, &str, &Value) + Send + Sync + 'static,
    {
        self.register(ToolStartHook { callback: f });
    }

    /// Register a hook that only handles AgentFinish events.
    ///
    /// The callback receives (agent, output).
    pub fn on_agent_finish<F>(&mut self, f: F)
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        self.register(AgentFinishHook { callback: f });
    }
}

/// Hook wrapper for ToolStart events.
struct ToolStartHook<F> {
    callback: F,
}

#[async_trait]
impl<F> Hook for ToolStartHook<F>
where
    F: Fn(&str, &str, &Value) + Send + Sync,
{
    fn accepts(&self, event: &HookEvent) -> bool {
        matches!(event, HookEvent::ToolStart { .. })
    }

    async fn on_event(&self, event: &HookEvent) -> Result<(), anyhow::Error> {
        if let HookEvent::ToolStart { agent, tool, input } = event {
            (self.callback)(agent, tool, input);
        }
        Ok(())
    }
}

/// Hook wrapper for AgentFinish events.
struct AgentFinishHook<F> {
    callback: F,
}

#[async_trait]
impl<F> Hook for AgentFinishHook<F>
where
    F: Fn(&str, &str) + Send + Sync,
{
    fn accepts(&self, event: &HookEvent) -> bool {
        matches!(event, HookEvent::AgentFinish { .. })
    }

    async fn on_event(&self, event: &HookEvent) -> Result<(), anyhow::Error> {
        if let HookEvent::AgentFinish { agent, output } = event {
            (self.callback)(agent, output);
        }
        Ok(())
    }
}
