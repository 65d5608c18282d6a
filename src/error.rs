// ABOUTME: Defines all error types for crewrelay using thiserror.
// ABOUTME: Each pipeline stage has its own error enum, unified under RelayError.

/// Top-level error type for the mission pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Planning failed: {0}")]
    Planning(#[from] PlanningError),

    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("Execution failed: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Errors from LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Errors from tool lookup and invocation.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    Unknown(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Execution failed: {0}")]
    Execution(#[source] anyhow::Error),
}

/// The planner could not produce a usable plan.
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("planner reply contained no JSON object")]
    NoJson,

    #[error("planner reply is not a valid plan: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("plan contains no tasks")]
    EmptyPlan,
}

/// A plan could not be turned into runnable agents and tasks.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("agent '{agent}' references unknown tool '{tool}'")]
    UnknownTool { agent: String, tool: String },

    #[error("agent name '{0}' is defined more than once")]
    DuplicateAgent(String),
}

/// A compiled plan failed while running.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("plan has no tasks to run")]
    NoTasks,

    #[error("task {index} is not assigned to any agent (requested '{agent}')")]
    UnassignedTask { index: usize, agent: String },

    #[error("agent '{agent}' model call failed: {source}")]
    Model {
        agent: String,
        #[source]
        source: LlmError,
    },

    #[error("agent '{agent}' exceeded max iterations ({limit})")]
    MaxIterations { agent: String, limit: usize },

    #[error("mission cancelled")]
    Cancelled,
}

/// Invalid process configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: String, value: String },
}
