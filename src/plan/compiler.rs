// ABOUTME: PlanCompiler - turns a PlanSpec into shared agents and bound tasks.
// ABOUTME: Resolves tool identifiers, applies the duplicate policy and the language directive.

use std::collections::HashMap;
use std::sync::Arc;

use super::spec::{AgentSpec, PlanSpec, TaskSpec};
use crate::config::DuplicateAgentPolicy;
use crate::crew::ExecutionContext;
use crate::error::CompileError;
use crate::hook::HookRegistry;
use crate::tool::{Registry, Tool, ToolKind};

/// A runnable agent.
pub struct CompiledAgent {
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<(ToolKind, Arc<dyn Tool>)>,
    pub allow_delegation: bool,
    /// Observers attached at compile time, if the context had any.
    pub hooks: Option<HookRegistry>,
}

impl std::fmt::Debug for CompiledAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledAgent")
            .field("name", &self.name)
            .field("role", &self.role)
            .field(
                "tools",
                &self.tools.iter().map(|(k, _)| k.identifier()).collect::<Vec<_>>(),
            )
            .field("allow_delegation", &self.allow_delegation)
            .field("hooks", &self.hooks.as_ref().map(HookRegistry::len))
            .finish()
    }
}

impl CompiledAgent {
    pub fn tool_kinds(&self) -> impl Iterator<Item = ToolKind> + '_ {
        self.tools.iter().map(|(kind, _)| *kind)
    }

    pub fn describe(&self) -> AgentSpec {
        AgentSpec {
            name: self.name.clone(),
            role: self.role.clone(),
            goal: self.goal.clone(),
            backstory: self.backstory.clone(),
            tools: self
                .tool_kinds()
                .map(|kind| kind.identifier().to_string())
                .collect(),
        }
    }
}

/// A task with its description already carrying the language directive.
#[derive(Debug, Clone)]
pub struct CompiledTask {
    pub description: String,
    /// The agent name as written in the plan.
    pub agent_ref: String,
    /// `None` when `agent_ref` matched no agent.
    pub agent: Option<Arc<CompiledAgent>>,
}

#[derive(Debug, Clone, Default)]
pub struct CompiledPlan {
    pub agents: Vec<Arc<CompiledAgent>>,
    pub tasks: Vec<CompiledTask>,
}

impl CompiledPlan {
    /// Re-serialize into the shape the planner produced.
    pub fn describe(&self) -> PlanSpec {
        PlanSpec {
            agents: self.agents.iter().map(|a| a.describe()).collect(),
            tasks: self
                .tasks
                .iter()
                .map(|t| TaskSpec {
                    description: t.description.clone(),
                    agent: t.agent_ref.clone(),
                })
                .collect(),
        }
    }

    pub fn agent_names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name.clone()).collect()
    }
}

/// Compiles plans against a fixed tool registry.
#[derive(Clone)]
pub struct PlanCompiler {
    registry: Registry,
    language: String,
    duplicates: DuplicateAgentPolicy,
}

impl PlanCompiler {
    pub fn new(registry: Registry, language: impl Into<String>) -> Self {
        Self {
            registry,
            language: language.into(),
            duplicates: DuplicateAgentPolicy::default(),
        }
    }

    pub fn duplicates(mut self, policy: DuplicateAgentPolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// The directive appended to every task description.
    pub fn directive(&self) -> String {
        format!(". The result MUST be written in {} language.", self.language)
    }

    pub fn compile(
        &self,
        plan: &PlanSpec,
        ctx: &ExecutionContext,
    ) -> Result<CompiledPlan, CompileError> {
        // Resolve everything first so a bad identifier leaves nothing half-built.
        let mut resolved = Vec::with_capacity(plan.agents.len());
        for spec in &plan.agents {
            let mut tools = Vec::with_capacity(spec.tools.len());
            for id in &spec.tools {
                let tool = self
                    .registry
                    .resolve(id)
                    .map_err(|_| CompileError::UnknownTool {
                        agent: spec.name.clone(),
                        tool: id.clone(),
                    })?;
                tools.push(tool);
            }
            resolved.push(tools);
        }

        let hooks = (!ctx.hooks().is_empty()).then(|| ctx.hooks().clone());
        let agents: Vec<Arc<CompiledAgent>> = plan
            .agents
            .iter()
            .zip(resolved)
            .map(|(spec, tools)| {
                Arc::new(CompiledAgent {
                    name: spec.name.clone(),
                    role: spec.role.clone(),
                    goal: spec.goal.clone(),
                    backstory: spec.backstory.clone(),
                    tools,
                    allow_delegation: true,
                    hooks: hooks.clone(),
                })
            })
            .collect();

        let mut by_name: HashMap<String, Arc<CompiledAgent>> = HashMap::with_capacity(agents.len());
        for agent in &agents {
            let previous = by_name.insert(agent.name.clone(), agent.clone());
            if previous.is_some() && self.duplicates == DuplicateAgentPolicy::Reject {
                return Err(CompileError::DuplicateAgent(agent.name.clone()));
            }
        }

        let directive = self.directive();
        let tasks = plan
            .tasks
            .iter()
            .map(|task| {
                let agent = by_name.get(&task.agent).cloned();
                if agent.is_none() {
                    tracing::debug!(agent = %task.agent, "task references unknown agent");
                }
                CompiledTask {
                    description: format!("{}{}", task.description, directive),
                    agent_ref: task.agent.clone(),
                    agent,
                }
            })
            .collect();

        Ok(CompiledPlan { agents, tasks })
    }
}
