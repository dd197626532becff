//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of an outbound message failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// An inbound frame was malformed JSON, or its payload didn't match
    /// the shape its kind requires.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// An inbound frame had no integer `kind` field. Non-fatal: the
    /// dispatch layer drops such frames with a diagnostic, the same as
    /// an unknown kind.
    #[error("frame has no integer kind field")]
    MissingKind,

    /// An inbound frame carried a kind code outside the inbound
    /// vocabulary. Non-fatal: the dispatch layer drops such frames with
    /// a diagnostic.
    #[error("unknown message kind: {0}")]
    UnknownKind(u64),
}
