// ABOUTME: Pipeline - mission text to final result: plan, compile, execute.
// ABOUTME: Reports stage changes and fires chain-level hook events.

use std::sync::Arc;

use crate::agent::RunnerSettings;
use crate::config::RelayConfig;
use crate::crew::{ExecutionContext, ExecutionEngine, FinalResult};
use crate::error::{ExecutionError, RelayError};
use crate::hook::HookEvent;
use crate::llm::LlmClient;
use crate::plan::{LlmPlanner, PlanCompiler, Planner};
use crate::tool::Registry;

/// Stage a mission is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Planning,
    Compiling,
    Executing,
}

pub struct Pipeline {
    planner: Arc<dyn Planner>,
    compiler: PlanCompiler,
    engine: ExecutionEngine,
}

impl Pipeline {
    pub fn new(planner: Arc<dyn Planner>, compiler: PlanCompiler, engine: ExecutionEngine) -> Self {
        Self {
            planner,
            compiler,
            engine,
        }
    }

    /// Wire an LLM planner, a compiler over `registry` and an engine from config.
    pub fn from_config(config: &RelayConfig, client: Arc<dyn LlmClient>, registry: Registry) -> Self {
        let planner = LlmPlanner::new(client.clone(), &config.planner_model)
            .language(&config.language)
            .tools(registry.identifiers())
            .temperature(config.temperature)
            .max_tokens(config.max_tokens);
        let compiler =
            PlanCompiler::new(registry, &config.language).duplicates(config.duplicate_agents);
        let engine = ExecutionEngine::new(client, RunnerSettings::from(config));
        Self::new(Arc::new(planner), compiler, engine)
    }

    pub async fn run(
        &self,
        mission: &str,
        ctx: &ExecutionContext,
    ) -> Result<FinalResult, RelayError> {
        self.run_with(mission, ctx, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_stage` as each stage begins.
    pub async fn run_with<F>(
        &self,
        mission: &str,
        ctx: &ExecutionContext,
        on_stage: F,
    ) -> Result<FinalResult, RelayError>
    where
        F: FnMut(Stage) + Send,
    {
        ctx.notify(HookEvent::ChainStart {
            mission: mission.to_string(),
        })
        .await;

        let outcome = tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => Err(ExecutionError::Cancelled.into()),
            result = self.stages(mission, ctx, on_stage) => result,
        };

        match outcome {
            Ok(result) => {
                tracing::info!(
                    session = ctx.session_id(),
                    tasks = result.task_outputs.len(),
                    "mission completed"
                );
                ctx.notify(HookEvent::ChainEnd {
                    output: result.output.clone(),
                })
                .await;
                Ok(result)
            }
            Err(e) => {
                tracing::info!(session = ctx.session_id(), error = %e, "mission failed");
                ctx.notify(HookEvent::ChainError {
                    error: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    async fn stages<F>(
        &self,
        mission: &str,
        ctx: &ExecutionContext,
        mut on_stage: F,
    ) -> Result<FinalResult, RelayError>
    where
        F: FnMut(Stage) + Send,
    {
        on_stage(Stage::Planning);
        tracing::debug!(session = ctx.session_id(), "planning");
        let spec = self.planner.plan(mission).await?;

        on_stage(Stage::Compiling);
        tracing::debug!(session = ctx.session_id(), "compiling");
        let plan = self.compiler.compile(&spec, ctx)?;
        ctx.notify(HookEvent::PlanReady {
            agents: plan.agent_names(),
            tasks: plan.tasks.len(),
        })
        .await;

        on_stage(Stage::Executing);
        tracing::debug!(session = ctx.session_id(), "executing");
        Ok(self.engine.run(&plan, ctx).await?)
    }
}
