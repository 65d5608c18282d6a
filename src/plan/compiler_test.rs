// ABOUTME: Tests for PlanCompiler.
// ABOUTME: Order preservation, tool resolution, unknown agents and duplicate policies.

use std::sync::Arc;

use super::*;
use crate::config::{DuplicateAgentPolicy, ToolsConfig};
use crate::crew::ExecutionContext;
use crate::error::CompileError;
use crate::hook::MemorySink;
use crate::tool::ToolKind;
use crate::tools::standard_registry;

fn agent(name: &str, tools: &[&str]) -> AgentSpec {
    AgentSpec {
        name: name.to_string(),
        role: format!("{name} role"),
        goal: format!("{name} goal"),
        backstory: format!("{name} backstory"),
        tools: tools.iter().map(|t| t.to_string()).collect(),
    }
}

fn task(description: &str, agent: &str) -> TaskSpec {
    TaskSpec {
        description: description.to_string(),
        agent: agent.to_string(),
    }
}

fn compiler() -> PlanCompiler {
    PlanCompiler::new(standard_registry(&ToolsConfig::default()), "Korean")
}

fn billing_plan() -> PlanSpec {
    PlanSpec {
        agents: vec![
            agent("Architect", &[]),
            agent("Analyst", &["CalculatorTools.calculate"]),
        ],
        tasks: vec![
            task("Design the billing data model", "Architect"),
            task("Estimate monthly invoice volume", "Analyst"),
            task("Summarize the proposal", "Architect"),
        ],
    }
}

#[test]
fn test_task_count_and_order_preserved() {
    let plan = billing_plan();
    let compiled = compiler()
        .compile(&plan, &ExecutionContext::new("t"))
        .unwrap();

    assert_eq!(compiled.tasks.len(), 3);
    assert_eq!(compiled.agents.len(), 2);
    for (spec, compiled_task) in plan.tasks.iter().zip(&compiled.tasks) {
        assert!(compiled_task.description.starts_with(&spec.description));
        assert_eq!(compiled_task.agent_ref, spec.agent);
        assert_eq!(
            compiled_task.agent.as_ref().map(|a| a.name.as_str()),
            Some(spec.agent.as_str())
        );
    }
}

#[test]
fn test_language_directive_appended() {
    let compiled = compiler()
        .compile(&billing_plan(), &ExecutionContext::new("t"))
        .unwrap();
    assert_eq!(
        compiled.tasks[0].description,
        "Design the billing data model. The result MUST be written in Korean language."
    );

    let english = PlanCompiler::new(standard_registry(&ToolsConfig::default()), "English");
    let compiled = english
        .compile(&billing_plan(), &ExecutionContext::new("t"))
        .unwrap();
    assert!(compiled.tasks[2].description.ends_with("written in English language."));
}

#[test]
fn test_tools_resolved_in_order() {
    let plan = PlanSpec {
        agents: vec![agent(
            "Researcher",
            &[
                "SearchTools.search_news",
                "CalculatorTools.calculate",
                "SearchTools.search_internet",
            ],
        )],
        tasks: vec![task("Research", "Researcher")],
    };
    let compiled = compiler().compile(&plan, &ExecutionContext::new("t")).unwrap();

    let kinds: Vec<_> = compiled.agents[0].tool_kinds().collect();
    assert_eq!(
        kinds,
        vec![ToolKind::SearchNews, ToolKind::Calculate, ToolKind::SearchInternet]
    );
    assert_eq!(compiled.agents[0].tools[1].1.name(), "calculate");
    assert!(compiled.agents[0].allow_delegation);
}

#[test]
fn test_unknown_tool_fails_whole_compile() {
    let plan = PlanSpec {
        agents: vec![
            agent("Good", &["CalculatorTools.calculate"]),
            agent("Bad", &["ShellTools.run"]),
        ],
        tasks: vec![task("Anything", "Good")],
    };

    let err = compiler()
        .compile(&plan, &ExecutionContext::new("t"))
        .unwrap_err();
    match err {
        CompileError::UnknownTool { agent, tool } => {
            assert_eq!(agent, "Bad");
            assert_eq!(tool, "ShellTools.run");
        }
        other => panic!("expected UnknownTool, got {other:?}"),
    }
}

#[test]
fn test_unknown_agent_reference_compiles_to_none() {
    let mut plan = billing_plan();
    plan.tasks.push(task("Orphaned work", "Nonexistent"));

    let compiled = tokio_test::assert_ok!(compiler().compile(&plan, &ExecutionContext::new("t")));
    let last = compiled.tasks.last().unwrap();
    assert!(last.agent.is_none());
    assert_eq!(last.agent_ref, "Nonexistent");
}

#[test]
fn test_describe_round_trips_except_directive() {
    let plan = PlanSpec {
        agents: vec![
            agent("Architect", &["SearchTools.search_internet"]),
            agent("Analyst", &["CalculatorTools.calculate", "PowerpointTools.generate_slide"]),
        ],
        tasks: vec![task("Design", "Architect"), task("Cost", "Analyst")],
    };
    let compiler = compiler();
    let compiled = compiler.compile(&plan, &ExecutionContext::new("t")).unwrap();
    let mut described = compiled.describe();

    assert_eq!(described.agents, plan.agents);
    for task in &mut described.tasks {
        task.description = task
            .description
            .strip_suffix(&compiler.directive())
            .unwrap()
            .to_string();
    }
    assert_eq!(described, plan);
}

#[test]
fn test_duplicate_agents_rejected_by_default() {
    let plan = PlanSpec {
        agents: vec![agent("Twin", &[]), agent("Twin", &["CalculatorTools.calculate"])],
        tasks: vec![task("Work", "Twin")],
    };
    let err = compiler()
        .compile(&plan, &ExecutionContext::new("t"))
        .unwrap_err();
    assert!(matches!(err, CompileError::DuplicateAgent(name) if name == "Twin"));
}

#[test]
fn test_duplicate_agents_last_wins() {
    let plan = PlanSpec {
        agents: vec![agent("Twin", &[]), agent("Twin", &["CalculatorTools.calculate"])],
        tasks: vec![task("Work", "Twin")],
    };
    let compiled = compiler()
        .duplicates(DuplicateAgentPolicy::LastWins)
        .compile(&plan, &ExecutionContext::new("t"))
        .unwrap();

    assert_eq!(compiled.agents.len(), 2);
    let bound = compiled.tasks[0].agent.as_ref().unwrap();
    assert!(Arc::ptr_eq(bound, &compiled.agents[1]));
}

#[test]
fn test_context_hooks_attached_to_agents() {
    let bare = compiler()
        .compile(&billing_plan(), &ExecutionContext::new("t"))
        .unwrap();
    assert!(bare.agents.iter().all(|a| a.hooks.is_none()));

    let ctx = ExecutionContext::new("t").with_sink(Arc::new(MemorySink::new()));
    let observed = compiler().compile(&billing_plan(), &ctx).unwrap();
    assert!(
        observed
            .agents
            .iter()
            .all(|a| a.hooks.as_ref().map(|h| h.len()) == Some(1))
    );
}
