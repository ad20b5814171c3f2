use super::*;
use crate::net::types::{Form, FormEvent, Subscriber, WidgetSubscription};

// =============================================================
// Helpers
// =============================================================

fn data_frame(id: &str, form_event: serde_json::Value) -> Frame {
    Frame::new(FrameKind::Data)
        .with_id(id)
        .with_payload(serde_json::json!({"data": {"formEvent": form_event}}))
}

// =============================================================
// Frame kinds
// =============================================================

#[test]
fn connection_error_frame_classifies_as_connection_error() {
    assert_eq!(classify(&Frame::new(FrameKind::ConnectionError)), Some(Action::HandleConnectionError));
}

#[test]
fn complete_frame_classifies_as_complete() {
    assert_eq!(classify(&Frame::new(FrameKind::Complete)), Some(Action::HandleComplete));
}

#[test]
fn error_frame_carries_payload_text() {
    let frame = Frame::new(FrameKind::Error)
        .with_id("42")
        .with_payload(serde_json::json!("An error has occured while retrieving the content from the server"));
    assert_eq!(
        classify(&frame),
        Some(Action::HandleError {
            message: "An error has occured while retrieving the content from the server".to_owned()
        })
    );
}

#[test]
fn housekeeping_frames_dispatch_nothing() {
    for kind in [
        FrameKind::ConnectionAck,
        FrameKind::KeepAlive,
        FrameKind::ConnectionInit,
        FrameKind::Start,
        FrameKind::Stop,
        FrameKind::ConnectionTerminate,
    ] {
        assert_eq!(classify(&Frame::new(kind)), None, "{kind:?}");
    }
}

// =============================================================
// Data frames
// =============================================================

#[test]
fn form_refreshed_data_frame_classifies_as_form_event() {
    let frame = data_frame(
        "42",
        serde_json::json!({
            "__typename": "FormRefreshedEventPayload",
            "form": {"id": "form", "label": "New Label", "pages": []}
        }),
    );
    assert_eq!(
        classify(&frame),
        Some(Action::HandleData(FormEvent::FormRefreshed {
            form: Form { id: "form".to_owned(), label: "New Label".to_owned(), pages: vec![] }
        }))
    );
}

#[test]
fn subscribers_updated_data_frame_classifies_as_form_event() {
    let frame = data_frame(
        "51",
        serde_json::json!({
            "__typename": "SubscribersUpdatedEventPayload",
            "subscribers": [{"username": "jdoe"}]
        }),
    );
    assert_eq!(
        classify(&frame),
        Some(Action::HandleData(FormEvent::SubscribersUpdated {
            subscribers: vec![Subscriber { username: "jdoe".to_owned() }]
        }))
    );
}

#[test]
fn widget_subscriptions_updated_data_frame_classifies_as_form_event() {
    let frame = data_frame(
        "54",
        serde_json::json!({
            "__typename": "WidgetSubscriptionsUpdatedEventPayload",
            "widgetSubscriptions": [{"widgetId": "some widget", "subscribers": [{"username": "jdoe"}]}]
        }),
    );
    assert_eq!(
        classify(&frame),
        Some(Action::HandleData(FormEvent::WidgetSubscriptionsUpdated {
            widget_subscriptions: vec![WidgetSubscription {
                widget_id: "some widget".to_owned(),
                subscribers: vec![Subscriber { username: "jdoe".to_owned() }],
            }]
        }))
    );
}

#[test]
fn unknown_typename_dispatches_ignored_event() {
    let frame = data_frame("1", serde_json::json!({"__typename": "SomethingNewEventPayload"}));
    assert_eq!(classify(&frame), Some(Action::HandleData(FormEvent::Unknown)));
}

#[test]
fn data_frame_without_payload_is_subscription_ack() {
    assert_eq!(classify(&Frame::new(FrameKind::Data).with_id("1")), None);
}

#[test]
fn data_frame_with_errors_instead_of_event_classifies_as_error() {
    let frame = Frame::new(FrameKind::Data)
        .with_id("1")
        .with_payload(serde_json::json!({"data": null, "errors": [{"message": "Object not found"}, {"message": "ignored"}]}));
    assert_eq!(classify(&frame), Some(Action::HandleError { message: "Object not found".to_owned() }));
}

#[test]
fn data_frame_with_event_and_partial_errors_still_dispatches_event() {
    let frame = Frame::new(FrameKind::Data).with_id("1").with_payload(serde_json::json!({
        "data": {"formEvent": {"__typename": "SubscribersUpdatedEventPayload", "subscribers": []}},
        "errors": [{"message": "partial"}]
    }));
    assert_eq!(classify(&frame), Some(Action::HandleData(FormEvent::SubscribersUpdated { subscribers: vec![] })));
}

#[test]
fn data_frame_with_neither_event_nor_errors_dispatches_nothing() {
    let frame = Frame::new(FrameKind::Data).with_id("1").with_payload(serde_json::json!({"data": null}));
    assert_eq!(classify(&frame), None);
}

#[test]
fn data_frame_with_malformed_form_dispatches_nothing() {
    let frame = data_frame("1", serde_json::json!({"__typename": "FormRefreshedEventPayload", "form": 3}));
    assert_eq!(classify(&frame), None);
}

// =============================================================
// Text entry point
// =============================================================

#[test]
fn classify_text_decodes_and_classifies() {
    let action = classify_text(r#"{"type":"error","id":"42","payload":"nope"}"#);
    assert_eq!(action, Some(Action::HandleError { message: "nope".to_owned() }));
}

#[test]
fn classify_text_drops_malformed_json() {
    assert_eq!(classify_text("{"), None);
}

#[test]
fn classify_text_drops_unknown_frame_type() {
    assert_eq!(classify_text(r#"{"type":"next","id":"1"}"#), None);
}

// =============================================================
// Error text extraction
// =============================================================

#[test]
fn error_message_prefers_message_then_error_key() {
    assert_eq!(error_message(&serde_json::json!({"message": "m", "error": "e"})), "m");
    assert_eq!(error_message(&serde_json::json!({"error": "e"})), "e");
}

#[test]
fn error_message_uses_first_list_entry() {
    assert_eq!(error_message(&serde_json::json!([{"message": "first"}, {"message": "second"}])), "first");
    assert_eq!(error_message(&serde_json::json!([])), "unknown error");
}

#[test]
fn error_message_falls_back_to_json_text() {
    assert_eq!(error_message(&serde_json::json!({"code": 7})), r#"{"code":7}"#);
    assert_eq!(error_message(&serde_json::Value::Null), "unknown error");
}
