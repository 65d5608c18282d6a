// ABOUTME: DelegateTool - lets an agent hand work to, or ask questions of, a coworker.
// ABOUTME: The coworker runs its own think-act loop and its answer becomes the tool output.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::runner::{AgentRunner, RunnerSettings};
use crate::hook::HookRegistry;
use crate::llm::LlmClient;
use crate::plan::CompiledAgent;
use crate::tool::{Tool, ToolResult};

/// What the delegating agent wants from its coworker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegationMode {
    /// Hand over a piece of work.
    Delegate,
    /// Ask a question.
    Ask,
}

impl DelegationMode {
    fn tool_name(self) -> &'static str {
        match self {
            DelegationMode::Delegate => "delegate_work_to_coworker",
            DelegationMode::Ask => "ask_question_to_coworker",
        }
    }

    fn request_field(self) -> &'static str {
        match self {
            DelegationMode::Delegate => "task",
            DelegationMode::Ask => "question",
        }
    }
}

/// Tool that runs another agent of the same plan on a request.
///
/// Coworkers run without delegation tools of their own.
pub struct DelegateTool {
    mode: DelegationMode,
    coworkers: Vec<Arc<CompiledAgent>>,
    client: Arc<dyn LlmClient>,
    settings: RunnerSettings,
    hooks: Option<HookRegistry>,
    description: String,
}

impl DelegateTool {
    pub fn new(
        mode: DelegationMode,
        coworkers: Vec<Arc<CompiledAgent>>,
        client: Arc<dyn LlmClient>,
        settings: RunnerSettings,
    ) -> Self {
        let roles = Self::roster(&coworkers);
        let description = match mode {
            DelegationMode::Delegate => format!(
                "Delegate a specific task to one of the following coworkers: {roles}. \
                 Provide the coworker's role, the task, and ALL the context needed to do it, \
                 since they know nothing about it beforehand."
            ),
            DelegationMode::Ask => format!(
                "Ask a specific question to one of the following coworkers: {roles}. \
                 Provide the coworker's role, the question, and ALL the context needed to \
                 answer it, since they know nothing about it beforehand."
            ),
        };
        Self {
            mode,
            coworkers,
            client,
            settings,
            hooks: None,
            description,
        }
    }

    /// Report the coworker's lifecycle events to `hooks` rather than its own.
    pub fn hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn mode(&self) -> DelegationMode {
        self.mode
    }

    fn roster(coworkers: &[Arc<CompiledAgent>]) -> String {
        coworkers
            .iter()
            .map(|c| c.role.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Match by role or name, ignoring case and surrounding whitespace.
    fn find(&self, wanted: &str) -> Option<Arc<CompiledAgent>> {
        let wanted = wanted.trim();
        self.coworkers
            .iter()
            .find(|c| c.role.eq_ignore_ascii_case(wanted) || c.name.eq_ignore_ascii_case(wanted))
            .cloned()
    }
}

#[async_trait]
impl Tool for DelegateTool {
    fn name(&self) -> &str {
        self.mode.tool_name()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> serde_json::Value {
        let field = self.mode.request_field();
        serde_json::json!({
            "type": "object",
            "properties": {
                "coworker": {
                    "type": "string",
                    "description": "Role or name of the coworker"
                },
                field: {
                    "type": "string",
                    "description": format!("The {field} for the coworker")
                },
                "context": {
                    "type": "string",
                    "description": "Everything the coworker needs to know"
                }
            },
            "required": ["coworker", field, "context"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        #[derive(Deserialize)]
        struct Params {
            coworker: String,
            #[serde(alias = "question")]
            task: String,
            #[serde(default)]
            context: String,
        }
        let params: Params = serde_json::from_value(params)?;

        let Some(coworker) = self.find(&params.coworker) else {
            return Ok(ToolResult::error(format!(
                "Coworker '{}' not found. Available coworkers: {}",
                params.coworker,
                Self::roster(&self.coworkers)
            )));
        };

        let prompt = if params.context.trim().is_empty() {
            params.task
        } else {
            format!(
                "{}\n\nThis is the context you're working with:\n{}",
                params.task, params.context
            )
        };

        let mut runner = AgentRunner::new(coworker, self.client.clone(), self.settings.clone());
        if let Some(hooks) = &self.hooks {
            runner = runner.hooks(hooks.clone());
        }
        match runner.run(&prompt).await {
            Ok(output) => Ok(ToolResult::text(output.content)
                .with_metadata("coworker", output.agent)
                .with_metadata("iterations", output.iterations)),
            Err(e) => Ok(ToolResult::error(format!("Coworker failed: {}", e))),
        }
    }
}
