// ABOUTME: Tests for LLM types - serialization and message helpers.
// ABOUTME: Verifies the tagged content-block format and request builders.

use super::*;

#[test]
fn test_role_serialization() {
    assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    assert_eq!(
        serde_json::from_str::<Role>("\"assistant\"").unwrap(),
        Role::Assistant
    );
}

#[test]
fn test_content_block_tool_use_deserialization() {
    let json = r#"{
        "type": "tool_use",
        "id": "123",
        "name": "search_internet",
        "input": {"query": "billing systems"}
    }"#;
    let block: ContentBlock = serde_json::from_str(json).unwrap();
    assert_eq!(
        block,
        ContentBlock::tool_use(
            "123",
            "search_internet",
            serde_json::json!({"query": "billing systems"})
        )
    );
}

#[test]
fn test_content_block_tool_error_serialization() {
    let block = ContentBlock::tool_error("123", "division by zero");
    let json = serde_json::to_value(&block).unwrap();
    assert_eq!(json["type"], "tool_result");
    assert_eq!(json["is_error"], true);
}

#[test]
fn test_message_text_skips_tool_blocks() {
    let msg = Message {
        role: Role::Assistant,
        content: vec![
            ContentBlock::text("Let me check. "),
            ContentBlock::tool_use("1", "calculate", serde_json::json!({})),
            ContentBlock::text("Done."),
        ],
    };
    assert_eq!(msg.text(), "Let me check. Done.");
}

#[test]
fn test_request_builder() {
    let request = Request::new("gpt-3.5-turbo")
        .system("You are an analyst")
        .message(Message::user("first"))
        .message(Message::assistant("reply"))
        .message(Message::user("second"))
        .max_tokens(512)
        .temperature(Some(0.2))
        .json_output(true);

    assert_eq!(request.model, "gpt-3.5-turbo");
    assert_eq!(request.messages.len(), 3);
    assert_eq!(request.max_tokens, Some(512));
    assert_eq!(request.temperature, Some(0.2));
    assert!(request.json_output);
    assert_eq!(request.last_user_text().as_deref(), Some("second"));
}

#[test]
fn test_response_helpers() {
    let reply = Response::text_reply("final answer");
    assert!(!reply.has_tool_use());
    assert_eq!(reply.text(), "final answer");

    let calls = Response::tool_calls(vec![ContentBlock::tool_use(
        "1",
        "calculate",
        serde_json::json!({"operation": "1+1"}),
    )]);
    assert!(calls.has_tool_use());
    assert_eq!(calls.stop_reason, StopReason::ToolUse);
}

#[test]
fn test_usage_add() {
    let mut total = Usage::default();
    total.add(Usage {
        input_tokens: 10,
        output_tokens: 4,
    });
    total.add(Usage {
        input_tokens: 5,
        output_tokens: 1,
    });
    assert_eq!(
        total,
        Usage {
            input_tokens: 15,
            output_tokens: 5
        }
    );
}
