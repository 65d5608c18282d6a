// ABOUTME: Tests for LlmPlanner and JSON extraction.
// ABOUTME: Uses a ScriptedClient in place of a model.

use std::sync::Arc;

use tokio_test::{assert_err, assert_ok};

use super::*;
use crate::error::{LlmError, PlanningError};
use crate::llm::{Request, Response, ScriptedClient};

const PLAN: &str = r#"{"agents":[{"name":"Analyst","role":"Billing analyst","goal":"Price it","backstory":"Ten years in SaaS billing","tools":["CalculatorTools.calculate"]}],"tasks":[{"description":"Estimate cost","agent":"Analyst"}]}"#;

fn planner_replying(reply: &'static str) -> (LlmPlanner, ScriptedClient) {
    let client = ScriptedClient::always(reply);
    let planner = LlmPlanner::new(Arc::new(client.clone()), "gpt-3.5-turbo")
        .tools(["CalculatorTools.calculate", "SearchTools.search_internet"]);
    (planner, client)
}

#[test]
fn test_extract_plain_object() {
    assert_eq!(extract_json(PLAN), Some(PLAN));
}

#[test]
fn test_extract_from_fences_and_prose() {
    let reply = format!("Here is your crew:\n```json\n{PLAN}\n```\nGood luck!");
    assert_eq!(extract_json(&reply), Some(PLAN));
}

#[test]
fn test_extract_ignores_braces_in_strings() {
    let text = r#"noise {"a": "}{", "b": {"c": "\"}"}} trailing }"#;
    assert_eq!(extract_json(text), Some(r#"{"a": "}{", "b": {"c": "\"}"}}"#));
}

#[test]
fn test_extract_none_without_object() {
    assert_eq!(extract_json("no json here"), None);
    assert_eq!(extract_json("{ unterminated"), None);
}

#[tokio::test]
async fn test_plan_parses_reply() {
    let (planner, client) = planner_replying(PLAN);
    let plan = assert_ok!(planner.plan("Build a billing system").await);

    assert_eq!(plan.agents[0].name, "Analyst");
    assert_eq!(plan.agents[0].tools, vec!["CalculatorTools.calculate"]);
    assert_eq!(plan.tasks.len(), 1);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_prompt_lists_tools_and_language() {
    let seen = Arc::new(std::sync::Mutex::new(None::<Request>));
    let seen_clone = seen.clone();
    let client = ScriptedClient::new(move |req| {
        *seen_clone.lock().unwrap() = Some(req.clone());
        Ok(Response::text_reply(PLAN))
    });
    let planner = LlmPlanner::new(Arc::new(client), "planner-model")
        .language("English")
        .tools(["CalculatorTools.calculate"]);

    planner.plan("Compare vendors").await.unwrap();

    let req = seen.lock().unwrap().clone().unwrap();
    assert_eq!(req.model, "planner-model");
    assert!(req.json_output);
    let system = req.system.clone().unwrap();
    assert!(system.contains("CalculatorTools.calculate"));
    assert!(system.contains("written in English"));
    assert!(req.last_user_text().unwrap().ends_with("Compare vendors"));
}

#[tokio::test]
async fn test_malformed_json_is_planning_error() {
    let (planner, _) = planner_replying(r#"{"agents": "not a list", "tasks": []}"#);
    let err = planner.plan("anything").await.unwrap_err();
    assert!(matches!(err, PlanningError::Malformed(_)));
}

#[tokio::test]
async fn test_reply_without_json_is_planning_error() {
    let (planner, _) = planner_replying("I cannot help with that.");
    let err = assert_err!(planner.plan("anything").await);
    assert!(matches!(err, PlanningError::NoJson));
}

#[tokio::test]
async fn test_plan_without_tasks_is_rejected() {
    let (planner, _) = planner_replying(r#"{"agents": [], "tasks": []}"#);
    let err = planner.plan("anything").await.unwrap_err();
    assert!(matches!(err, PlanningError::EmptyPlan));
}

#[tokio::test]
async fn test_model_failure_is_planning_error() {
    let client = ScriptedClient::new(|_| {
        Err(LlmError::Api {
            status: 429,
            message: "rate limited".into(),
        })
    });
    let planner = LlmPlanner::new(Arc::new(client), "m");
    let err = planner.plan("anything").await.unwrap_err();
    assert!(matches!(err, PlanningError::Model(_)));
    assert!(err.to_string().contains("rate limited"));
}
