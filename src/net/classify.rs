//! Frame classification: which reducer action a pushed frame becomes.
//!
//! One subscription socket multiplexes distinct event kinds. The frame `type`
//! picks the action family; for `data` frames the embedded `__typename`
//! picks the form event. Frames that carry nothing for the panel map to
//! `None`, never to an error.

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;

use serde_json::Value;
use tracing::{debug, warn};

use crate::net::types::{DataPayload, Frame, FrameKind};
use crate::state::properties::Action;

/// Fallback error text when the server sends an error without a description.
const UNKNOWN_ERROR_MESSAGE: &str = "unknown error";

/// Map a decoded frame to the action it should dispatch, if any.
#[must_use]
pub fn classify(frame: &Frame) -> Option<Action> {
    match frame.kind {
        FrameKind::Data => classify_data(frame),
        FrameKind::Error => Some(Action::HandleError { message: error_message(&frame.payload) }),
        FrameKind::ConnectionError => Some(Action::HandleConnectionError),
        FrameKind::Complete => Some(Action::HandleComplete),
        FrameKind::ConnectionAck
        | FrameKind::KeepAlive
        | FrameKind::ConnectionInit
        | FrameKind::Start
        | FrameKind::Stop
        | FrameKind::ConnectionTerminate => None,
    }
}

/// Decode raw frame text and classify it. Malformed frames are logged and dropped.
#[must_use]
pub fn classify_text(text: &str) -> Option<Action> {
    match frames::decode_frame(text) {
        Ok(frame) => classify(&frame),
        Err(e) => {
            warn!(error = %e, "dropping undecodable frame");
            None
        }
    }
}

fn classify_data(frame: &Frame) -> Option<Action> {
    // A data frame without payload acknowledges the subscription.
    if frame.payload.is_null() {
        return None;
    }

    let payload = match serde_json::from_value::<DataPayload>(frame.payload.clone()) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, id = ?frame.id, "dropping data frame with malformed form event");
            return None;
        }
    };

    match payload.data.and_then(|data| data.form_event) {
        Some(event) => {
            if !payload.errors.is_empty() {
                warn!(errors = payload.errors.len(), id = ?frame.id, "form event arrived with partial errors");
            }
            debug!(typename = event.typename(), id = ?frame.id, "form event received");
            Some(Action::HandleData(event))
        }
        None => {
            // A result without an event but with errors means the operation failed server-side.
            let first = payload.errors.first()?;
            let message = error_message(first);
            warn!(error = %message, id = ?frame.id, "data frame carried errors instead of a form event");
            Some(Action::HandleError { message })
        }
    }
}

/// Error text from an error frame payload.
///
/// The payload is normally a plain string. Structured payloads contribute
/// their `message` (or `error`) field; a list contributes its first entry.
pub(crate) fn error_message(payload: &Value) -> String {
    match payload {
        Value::String(text) => text.clone(),
        Value::Null => UNKNOWN_ERROR_MESSAGE.to_owned(),
        Value::Array(items) => items.first().map_or_else(|| UNKNOWN_ERROR_MESSAGE.to_owned(), error_message),
        Value::Object(_) => pick_str(payload, &["message", "error"]).map_or_else(|| payload.to_string(), str::to_owned),
        Value::Bool(_) | Value::Number(_) => payload.to_string(),
    }
}

pub(crate) fn pick_str<'a>(data: &'a Value, keys: &[&str]) -> Option<&'a str> {
    for key in keys {
        if let Some(value) = data.get(key).and_then(Value::as_str) {
            return Some(value);
        }
    }
    None
}
