//! Frame model and JSON codec for the properties push channel.
//!
//! This crate owns the wire representation of the `graphql-ws` operation
//! messages exchanged over the subscription socket. Payloads stay flexible
//! (`serde_json::Value`); typed decoding of the payload belongs to the
//! consumer, which knows which subscription it opened.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned by [`decode_frame`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw text is not a JSON object with the expected shape.
    #[error("failed to decode frame: {0}")]
    Decode(#[from] serde_json::Error),
    /// The `type` string on the wire does not map to a known [`FrameKind`].
    #[error("unknown frame type: {0}")]
    UnknownType(String),
}

/// Operation message type carried in the `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Client asks the server to open the connection.
    ConnectionInit,
    /// Server accepted the connection.
    ConnectionAck,
    /// Server keep-alive.
    KeepAlive,
    /// Client starts an operation.
    Start,
    /// Client stops an operation.
    Stop,
    /// Client closes the connection.
    ConnectionTerminate,
    /// Result (or acknowledgement) of an operation.
    Data,
    /// Operation failed; payload describes the failure.
    Error,
    /// Channel-level failure, no detail.
    ConnectionError,
    /// Server finished the operation; no further data follows.
    Complete,
}

impl FrameKind {
    /// Wire spelling of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionInit => "connection_init",
            Self::ConnectionAck => "connection_ack",
            Self::KeepAlive => "ka",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::ConnectionTerminate => "connection_terminate",
            Self::Data => "data",
            Self::Error => "error",
            Self::ConnectionError => "connection_error",
            Self::Complete => "complete",
        }
    }

    /// Parse a kind from its wire spelling.
    fn from_wire(value: &str) -> Result<Self, CodecError> {
        match value {
            "connection_init" => Ok(Self::ConnectionInit),
            "connection_ack" => Ok(Self::ConnectionAck),
            "ka" => Ok(Self::KeepAlive),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "connection_terminate" => Ok(Self::ConnectionTerminate),
            "data" => Ok(Self::Data),
            "error" => Ok(Self::Error),
            "connection_error" => Ok(Self::ConnectionError),
            "complete" => Ok(Self::Complete),
            other => Err(CodecError::UnknownType(other.to_owned())),
        }
    }

    /// Kinds after which the server sends nothing more for the operation.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Error | Self::ConnectionError | Self::Complete)
    }

    /// Kinds sent by the server.
    #[must_use]
    pub fn is_inbound(self) -> bool {
        matches!(
            self,
            Self::ConnectionAck | Self::KeepAlive | Self::Data | Self::Error | Self::ConnectionError | Self::Complete
        )
    }
}

/// A single message on the push channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Operation message type.
    pub kind: FrameKind,
    /// Operation identifier chosen by the client, if the message carries one.
    pub id: Option<String>,
    /// Arbitrary JSON payload; `Value::Null` when absent.
    pub payload: Value,
}

impl Frame {
    /// Frame with no id and no payload.
    #[must_use]
    pub fn new(kind: FrameKind) -> Self {
        Self { kind, id: None, payload: Value::Null }
    }

    /// Set the operation id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Encode a frame into its JSON text form.
#[must_use]
pub fn encode_frame(frame: &Frame) -> String {
    let wire = WireFrame {
        kind: frame.kind.as_str().to_owned(),
        id: frame.id.clone(),
        payload: if frame.payload.is_null() { None } else { Some(frame.payload.clone()) },
    };
    // Serializing a struct of strings and a `Value` into a String cannot fail.
    serde_json::to_string(&wire).unwrap_or_default()
}

/// Decode JSON text into a frame.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed JSON or a missing `type`, and
/// [`CodecError::UnknownType`] for a `type` outside the protocol vocabulary.
pub fn decode_frame(text: &str) -> Result<Frame, CodecError> {
    let wire: WireFrame = serde_json::from_str(text)?;
    Ok(Frame {
        kind: FrameKind::from_wire(&wire.kind)?,
        id: wire.id,
        payload: wire.payload.unwrap_or(Value::Null),
    })
}

#[derive(Serialize, Deserialize)]
struct WireFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
