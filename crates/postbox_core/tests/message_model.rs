use chrono::{TimeZone, Utc};
use postbox_core::{CreateMessageRequest, ErrorBody, Message, MessageResponse};

#[test]
fn message_response_uses_camel_case_wire_fields() {
    let stamped_at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    let response = MessageResponse::from(Message {
        id: 7,
        content: "hello".to_string(),
        created_at: stamped_at,
        updated_at: stamped_at,
    });

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["content"], "hello");
    assert_eq!(json["createdAt"], "2023-11-14T22:13:20.123Z");
    assert_eq!(json["updatedAt"], json["createdAt"]);
    assert!(json.get("created_at").is_none());

    let decoded: MessageResponse = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, response);
}

#[test]
fn create_request_tolerates_missing_content_field() {
    let request: CreateMessageRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(request.content, None);

    let request: CreateMessageRequest =
        serde_json::from_str(r#"{"content":"hello"}"#).unwrap();
    assert_eq!(request, CreateMessageRequest::new("hello"));
}

#[test]
fn error_body_serializes_code_and_message() {
    let body = ErrorBody {
        error: "not_found".to_string(),
        message: "message not found with id: 3".to_string(),
    };

    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "error": "not_found",
            "message": "message not found with id: 3"
        })
    );
}
