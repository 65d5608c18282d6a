// ABOUTME: AgentRunner - executes the think-act loop for one compiled agent.
// ABOUTME: Offers the agent's tools (plus delegation), fires lifecycle hooks, aggregates usage.

use std::collections::HashMap;
use std::sync::Arc;

use super::delegation::{DelegateTool, DelegationMode};
use crate::config::RelayConfig;
use crate::error::ExecutionError;
use crate::hook::{HookEvent, HookRegistry};
use crate::llm::{ContentBlock, LlmClient, Message, Request, Role, ToolDefinition, Usage};
use crate::plan::CompiledAgent;
use crate::tool::Tool;

/// Model parameters shared by every agent in a run.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub model: String,
    pub max_iterations: usize,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_iterations: 15,
            max_tokens: 4096,
            temperature: None,
        }
    }
}

impl From<&RelayConfig> for RunnerSettings {
    fn from(config: &RelayConfig) -> Self {
        Self {
            model: config.agent_model.clone(),
            max_iterations: config.max_iterations,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Result from running an agent on one prompt.
#[derive(Debug, Clone)]
pub struct AgentOutput {
    /// Name of the agent that produced this output.
    pub agent: String,

    /// Final answer text.
    pub content: String,

    /// Number of tool calls made during execution.
    pub tool_use_count: usize,

    /// Total token usage across all LLM calls.
    pub usage: Usage,

    /// Number of iterations in the think-act loop.
    pub iterations: usize,
}

/// Runs a single agent until it produces a final answer.
pub struct AgentRunner {
    agent: Arc<CompiledAgent>,
    client: Arc<dyn LlmClient>,
    settings: RunnerSettings,
    hooks: HookRegistry,
    tools: HashMap<String, Arc<dyn Tool>>,
    messages: Vec<Message>,
    tool_use_count: usize,
    usage: Usage,
}

impl AgentRunner {
    pub fn new(
        agent: Arc<CompiledAgent>,
        client: Arc<dyn LlmClient>,
        settings: RunnerSettings,
    ) -> Self {
        let hooks = agent.hooks.clone().unwrap_or_default();
        let tools = agent
            .tools
            .iter()
            .map(|(_, tool)| (tool.name().to_string(), tool.clone()))
            .collect();

        Self {
            agent,
            client,
            settings,
            hooks,
            tools,
            messages: Vec::new(),
            tool_use_count: 0,
            usage: Usage::default(),
        }
    }

    /// Fire lifecycle events to `hooks` instead of the ones attached at compile time.
    ///
    /// Call before `coworkers` so delegated runs report to the same hooks.
    pub fn hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    /// Let the agent hand work to, or ask questions of, the given coworkers.
    ///
    /// Ignored when the agent does not allow delegation or the list is empty.
    pub fn coworkers(mut self, coworkers: Vec<Arc<CompiledAgent>>) -> Self {
        if !self.agent.allow_delegation || coworkers.is_empty() {
            return self;
        }
        for mode in [DelegationMode::Delegate, DelegationMode::Ask] {
            let tool = DelegateTool::new(
                mode,
                coworkers.clone(),
                self.client.clone(),
                self.settings.clone(),
            )
            .hooks(self.hooks.clone());
            self.tools.insert(tool.name().to_string(), Arc::new(tool));
        }
        self
    }

    pub fn agent(&self) -> &CompiledAgent {
        &self.agent
    }

    /// Names of the tools offered to the model, sorted.
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are {}.\n{}\n\nYour personal goal is: {}",
            self.agent.role, self.agent.backstory, self.agent.goal
        )
    }

    /// Run the agent on a prompt and return its final answer.
    pub async fn run(&mut self, prompt: &str) -> Result<AgentOutput, ExecutionError> {
        self.messages.push(Message::user(prompt));

        let mut definitions: Vec<_> = self
            .tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.schema(),
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));

        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > self.settings.max_iterations {
                return Err(ExecutionError::MaxIterations {
                    agent: self.agent.name.clone(),
                    limit: self.settings.max_iterations,
                });
            }

            let request = Request::new(&self.settings.model)
                .system(self.system_prompt())
                .messages(self.messages.clone())
                .tools(definitions.clone())
                .max_tokens(self.settings.max_tokens)
                .temperature(self.settings.temperature);

            let response = self.client.create_message(&request).await.map_err(|source| {
                ExecutionError::Model {
                    agent: self.agent.name.clone(),
                    source,
                }
            })?;
            self.usage.add(response.usage);

            if !response.has_tool_use() {
                return Ok(self.finish(response.text(), iterations).await);
            }

            self.messages.push(Message {
                role: Role::Assistant,
                content: response.content.clone(),
            });

            let thought = response.text();
            let mut tool_results = Vec::new();
            let mut direct_answer = None;

            for block in &response.content {
                let ContentBlock::ToolUse { id, name, input } = block else {
                    continue;
                };
                self.tool_use_count += 1;

                let mut log = String::new();
                if !thought.trim().is_empty() {
                    log.push_str(thought.trim());
                    log.push('\n');
                }
                log.push_str(&format!("Action: {name}\nAction Input: {input}"));
                self.notify(HookEvent::AgentAction {
                    agent: self.agent.name.clone(),
                    log,
                })
                .await;
                self.notify(HookEvent::ToolStart {
                    agent: self.agent.name.clone(),
                    tool: name.clone(),
                    input: input.clone(),
                })
                .await;

                let (output, is_error, direct) = match self.tools.get(name) {
                    Some(tool) => match tool.execute(input.clone()).await {
                        Ok(r) => (r.content, r.is_error, tool.returns_direct()),
                        Err(e) => (e.to_string(), true, false),
                    },
                    None => (
                        format!("Tool '{}' not found or not allowed", name),
                        true,
                        false,
                    ),
                };

                if is_error {
                    tracing::warn!(agent = %self.agent.name, tool = %name, "tool reported an error");
                }
                self.notify(HookEvent::ToolEnd {
                    agent: self.agent.name.clone(),
                    tool: name.clone(),
                    output: output.clone(),
                    is_error,
                })
                .await;

                if direct && !is_error {
                    direct_answer = Some(output.clone());
                }
                tool_results.push(if is_error {
                    ContentBlock::tool_error(id, output)
                } else {
                    ContentBlock::tool_result(id, output)
                });
            }

            self.messages.push(Message::tool_results(tool_results));

            if let Some(answer) = direct_answer {
                return Ok(self.finish(answer, iterations).await);
            }
        }
    }

    async fn finish(&mut self, content: String, iterations: usize) -> AgentOutput {
        self.messages.push(Message::assistant(content.clone()));
        self.notify(HookEvent::AgentFinish {
            agent: self.agent.name.clone(),
            output: content.clone(),
        })
        .await;

        AgentOutput {
            agent: self.agent.name.clone(),
            content,
            tool_use_count: self.tool_use_count,
            usage: self.usage,
            iterations,
        }
    }

    async fn notify(&self, event: HookEvent) {
        self.hooks.fire(&event).await;
    }
}
