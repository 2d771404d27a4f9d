use sentry_issue_mcp::api_client::{Event, EventEntry, Issue, IssueHash, StackFrame};
use serde_json::json;

#[test]
fn test_issue_deserialize_count_as_string() {
    let json = json!({
        "title": "Test Issue",
        "status": "unresolved",
        "level": "error",
        "firstSeen": "2024-01-01T00:00:00Z",
        "lastSeen": "2024-01-02T00:00:00Z",
        "count": "42"
    });
    let issue: Issue = serde_json::from_value(json).unwrap();
    assert_eq!(issue.title, "Test Issue");
    assert_eq!(issue.status, "unresolved");
    assert_eq!(issue.level, "error");
    assert_eq!(issue.first_seen, "2024-01-01T00:00:00Z");
    assert_eq!(issue.last_seen, "2024-01-02T00:00:00Z");
    assert_eq!(issue.count, 42);
}

#[test]
fn test_issue_deserialize_count_as_number() {
    let json = json!({
        "title": "Test Issue",
        "status": "resolved",
        "level": "warning",
        "firstSeen": "t1",
        "lastSeen": "t2",
        "count": 5
    });
    let issue: Issue = serde_json::from_value(json).unwrap();
    assert_eq!(issue.count, 5);
}

#[test]
fn test_issue_deserialize_non_numeric_count_fails() {
    let json = json!({
        "title": "Test Issue",
        "status": "unresolved",
        "level": "error",
        "firstSeen": "t1",
        "lastSeen": "t2",
        "count": "lots"
    });
    assert!(serde_json::from_value::<Issue>(json).is_err());
}

#[test]
fn test_issue_deserialize_missing_title_fails() {
    let json = json!({
        "status": "unresolved",
        "level": "error",
        "firstSeen": "t1",
        "lastSeen": "t2",
        "count": "1"
    });
    assert!(serde_json::from_value::<Issue>(json).is_err());
}

#[test]
fn test_issue_deserialize_ignores_extra_fields() {
    let json = json!({
        "id": "12345",
        "shortId": "PROJ-1",
        "title": "Test Issue",
        "status": "unresolved",
        "level": "error",
        "firstSeen": "t1",
        "lastSeen": "t2",
        "count": "1",
        "entries": [],
        "permalink": "https://example.sentry.io/issues/12345/"
    });
    let issue: Issue = serde_json::from_value(json).unwrap();
    assert_eq!(issue.title, "Test Issue");
}

#[test]
fn test_event_entry_exception_tagged() {
    let json = json!({
        "type": "exception",
        "data": {"values": [{"type": "ValueError", "value": "bad input"}]}
    });
    let entry: EventEntry = serde_json::from_value(json).unwrap();
    let EventEntry::Exception { data } = entry else {
        panic!("Expected exception entry");
    };
    assert_eq!(data.values.len(), 1);
    assert_eq!(data.values[0].exception_type, "ValueError");
    assert_eq!(data.values[0].value, "bad input");
    assert!(data.values[0].stacktrace.is_none());
}

#[test]
fn test_event_entry_other_types_collapse() {
    for entry_type in ["breadcrumbs", "request", "message"] {
        let json = json!({"type": entry_type, "data": {"whatever": true}});
        let entry: EventEntry = serde_json::from_value(json).unwrap();
        assert!(matches!(entry, EventEntry::Other));
    }
}

#[test]
fn test_event_entry_missing_exception_value_fails() {
    let json = json!({
        "type": "exception",
        "data": {"values": [{"type": "ValueError"}]}
    });
    assert!(serde_json::from_value::<EventEntry>(json).is_err());
}

#[test]
fn test_event_deserialize_default_entries() {
    let event: Event = serde_json::from_value(json!({})).unwrap();
    assert!(event.entries.is_empty());
}

#[test]
fn test_stack_frame_all_fields() {
    let json = json!({
        "filename": "app.py",
        "lineNo": 42,
        "function": "main",
        "context": [[41, "def main():"], [42, "    raise ValueError()"]]
    });
    let frame: StackFrame = serde_json::from_value(json).unwrap();
    assert_eq!(frame.filename.as_deref(), Some("app.py"));
    assert_eq!(frame.line_no, Some(42));
    assert_eq!(frame.function.as_deref(), Some("main"));
    assert_eq!(frame.context.len(), 2);
    assert_eq!(frame.context[1].1, "    raise ValueError()");
}

#[test]
fn test_stack_frame_fields_optional() {
    let frame: StackFrame = serde_json::from_value(json!({})).unwrap();
    assert!(frame.filename.is_none());
    assert!(frame.line_no.is_none());
    assert!(frame.function.is_none());
    assert!(frame.context.is_empty());
}

#[test]
fn test_hashes_deserialize() {
    let json = json!([
        {"id": "deadbeef", "latestEvent": {"entries": [
            {"type": "exception", "data": {"values": [
                {"type": "KeyError", "value": "'user'", "stacktrace": {"frames": [
                    {"filename": "views.py", "lineNo": 10, "function": "handler"}
                ]}}
            ]}}
        ]}}
    ]);
    let hashes: Vec<IssueHash> = serde_json::from_value(json).unwrap();
    assert_eq!(hashes.len(), 1);
    assert_eq!(hashes[0].latest_event.entries.len(), 1);
}

#[test]
fn test_hashes_missing_latest_event_fails() {
    let json = json!([{"id": "deadbeef"}]);
    assert!(serde_json::from_value::<Vec<IssueHash>>(json).is_err());
}
