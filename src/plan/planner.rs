// ABOUTME: Planner trait and LlmPlanner - turns a mission into a PlanSpec via a model.
// ABOUTME: Extracts the JSON object from the reply, tolerating fences and prose.

use std::sync::Arc;

use async_trait::async_trait;

use super::spec::PlanSpec;
use crate::error::PlanningError;
use crate::llm::{LlmClient, Message, Request};

/// Produces a crew description for a mission.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, mission: &str) -> Result<PlanSpec, PlanningError>;
}

/// Planner backed by a chat model asked for JSON output.
pub struct LlmPlanner {
    client: Arc<dyn LlmClient>,
    model: String,
    language: String,
    tools: Vec<String>,
    temperature: Option<f64>,
    max_tokens: u32,
}

impl LlmPlanner {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            language: "Korean".to_string(),
            tools: Vec::new(),
            temperature: None,
            max_tokens: 4096,
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Tool identifiers the planner may hand out to agents.
    pub fn tools<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = identifiers.into_iter().map(Into::into).collect();
        self
    }

    pub fn temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn system_prompt(&self) -> String {
        format!(
            r#"You configure teams of cooperating AI agents.

Split the expertise needed for the mission across at least two agents when possible, and divide the work into tasks so that each agent handles its own area and hands results on to the next.

Agents may only use these tools: {tools}
Tasks run one after another in the order you list them.
Every task result must be written in {language}.

Reply with a single JSON object and nothing else:
{{
  "agents": [
    {{
      "name": "unique short name, e.g. Financial Analyst",
      "role": "e.g. The Best Financial Analyst",
      "goal": "what this agent is trying to achieve",
      "backstory": "experience and context that shapes the agent",
      "tools": ["tool identifiers from the list above"]
    }}
  ],
  "tasks": [
    {{
      "description": "what to do and what the final answer must contain",
      "agent": "name of the agent that performs this task"
    }}
  ]
}}"#,
            tools = if self.tools.is_empty() {
                "(none)".to_string()
            } else {
                self.tools.join(", ")
            },
            language = self.language,
        )
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn plan(&self, mission: &str) -> Result<PlanSpec, PlanningError> {
        let request = Request::new(&self.model)
            .system(self.system_prompt())
            .message(Message::user(format!(
                "Please configure a crew for the following mission: {mission}"
            )))
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .json_output(true);

        let response = self.client.create_message(&request).await?;
        let reply = response.text();
        let json = extract_json(&reply).ok_or(PlanningError::NoJson)?;
        let plan: PlanSpec = serde_json::from_str(json)?;

        if plan.tasks.is_empty() {
            return Err(PlanningError::EmptyPlan);
        }
        tracing::debug!(
            agents = plan.agents.len(),
            tasks = plan.tasks.len(),
            "plan received"
        );
        Ok(plan)
    }
}

/// Find the first balanced top-level JSON object in `text`.
///
/// Braces inside string literals are ignored, so code fences and prose
/// around the object do not matter.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
