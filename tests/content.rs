use serde_json::json;
use sheet_agent::api::{ContentItem, MessageRole, ThreadMessage};
use sheet_agent::content::{collect_run_output, OutputItem};
use sheet_agent::ui::terminate_line;

fn message(role: MessageRole, run_id: Option<&str>, content: Vec<ContentItem>) -> ThreadMessage {
    ThreadMessage {
        id: format!("msg_{}", content.len()),
        role,
        run_id: run_id.map(str::to_string),
        content,
    }
}

#[test]
fn test_content_items_deserialize_into_closed_set() {
    let items: Vec<ContentItem> = serde_json::from_value(json!([
        {"type": "text", "text": {"value": "Revenue grew 12%.", "annotations": []}},
        {"type": "image_file", "image_file": {"file_id": "assistant-cyL16cbs"}},
        {"type": "image_url", "image_url": {"url": "https://example.com/x.png"}}
    ]))
    .unwrap();

    assert_eq!(
        items,
        vec![
            ContentItem::text("Revenue grew 12%."),
            ContentItem::image("assistant-cyL16cbs"),
            ContentItem::Unsupported,
        ]
    );
}

#[test]
fn test_thread_message_deserializes() {
    let message: ThreadMessage = serde_json::from_value(json!({
        "id": "msg_1",
        "object": "thread.message",
        "role": "assistant",
        "run_id": "run_1",
        "content": [{"type": "text", "text": {"value": "hi"}}]
    }))
    .unwrap();

    assert_eq!(message.role, MessageRole::Assistant);
    assert_eq!(message.run_id.as_deref(), Some("run_1"));
}

#[test]
fn test_every_item_classified_and_unsupported_skipped() {
    let messages = vec![message(
        MessageRole::Assistant,
        Some("run_1"),
        vec![
            ContentItem::text("Here is the chart."),
            ContentItem::Unsupported,
            ContentItem::image("file-one"),
        ],
    )];

    let output = collect_run_output(&messages, "run_1");

    assert_eq!(
        output.items,
        vec![
            OutputItem::Text("Here is the chart.".to_string()),
            OutputItem::Image("file-one".to_string()),
        ]
    );
    assert_eq!(output.image_ids(), vec!["file-one".to_string()]);
}

#[test]
fn test_collects_consecutive_run_messages_in_chronological_order() {
    // newest first, as the service lists them
    let messages = vec![
        message(MessageRole::Assistant, Some("run_2"), vec![ContentItem::text("second")]),
        message(MessageRole::Assistant, Some("run_2"), vec![ContentItem::text("first")]),
        message(MessageRole::User, None, vec![ContentItem::text("question")]),
        message(MessageRole::Assistant, Some("run_1"), vec![ContentItem::text("old answer")]),
    ];

    let output = collect_run_output(&messages, "run_2");

    assert_eq!(
        output.items,
        vec![
            OutputItem::Text("first".to_string()),
            OutputItem::Text("second".to_string()),
        ]
    );
}

#[test]
fn test_skips_newer_foreign_messages_before_first_match() {
    let messages = vec![
        message(MessageRole::User, None, vec![ContentItem::text("follow-up")]),
        message(MessageRole::Assistant, Some("run_1"), vec![ContentItem::image("img")]),
        message(MessageRole::User, None, vec![ContentItem::text("question")]),
    ];

    let output = collect_run_output(&messages, "run_1");
    assert_eq!(output.items, vec![OutputItem::Image("img".to_string())]);
}

#[test]
fn test_stops_at_first_non_matching_message() {
    let messages = vec![
        message(MessageRole::Assistant, Some("run_3"), vec![ContentItem::text("latest")]),
        message(MessageRole::Assistant, Some("run_2"), vec![ContentItem::text("previous")]),
        message(MessageRole::Assistant, Some("run_3"), vec![ContentItem::text("unreachable")]),
    ];

    let output = collect_run_output(&messages, "run_3");
    assert_eq!(output.items, vec![OutputItem::Text("latest".to_string())]);
}

#[test]
fn test_no_matching_messages_yields_empty_output() {
    let messages = vec![message(MessageRole::User, None, vec![ContentItem::text("hello")])];

    let output = collect_run_output(&messages, "run_9");
    assert!(output.is_empty());
    assert!(output.image_ids().is_empty());
}

#[test]
fn test_agent_text_printed_verbatim() {
    assert_eq!(terminate_line("| a | b |   "), "| a | b |   \n");
    assert_eq!(terminate_line("total: 10\n\n"), "total: 10\n\n");
    assert_eq!(terminate_line("  indented\n"), "  indented\n");
}
