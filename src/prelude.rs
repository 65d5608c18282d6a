// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use crewrelay::prelude::*;` to get started quickly.

pub use crate::agent::{AgentOutput, AgentRunner, DelegateTool, DelegationMode, RunnerSettings};
pub use crate::config::{DisconnectPolicy, DuplicateAgentPolicy, RelayConfig, ToolsConfig};
pub use crate::crew::{ExecutionContext, ExecutionEngine, FinalResult, TaskOutput};
pub use crate::error::{
    CompileError, ConfigError, ExecutionError, LlmError, PlanningError, RelayError, ToolError,
};
pub use crate::hook::{EventSink, Hook, HookEvent, HookRegistry, MemorySink, SinkHook};
pub use crate::llm::{
    ContentBlock, LlmClient, Message, OpenAIClient, Request, Response, Role, ScriptedClient,
    StopReason, ToolDefinition, Usage,
};
pub use crate::plan::{
    AgentSpec, CompiledAgent, CompiledPlan, CompiledTask, LlmPlanner, PlanCompiler, PlanSpec,
    Planner, TaskSpec,
};
pub use crate::relay::{ChannelSink, Pipeline, RelayServer, Session, SessionState, Stage};
pub use crate::tool::{Registry, RegistryBuilder, Tool, ToolKind, ToolResult};
pub use crate::tools::{
    CalculatorTool, GenerateSlidesTool, InternalDocumentsTool, MarkdownDeckRenderer,
    SerperEndpoint, SerperSearchTool, SlideDeck, SlideRenderer, standard_registry,
};
