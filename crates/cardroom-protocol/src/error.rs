//! Error types for the protocol layer.
//!
//! When you see a `ProtocolError`, the problem is in turning frames into
//! typed events (or back), never in networking or game state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, a known frame type whose payload
    /// has the wrong shape, or a card with an unknown suit.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame's `type` discriminator names no frame this client knows.
    ///
    /// Kept apart from [`Decode`](Self::Decode) so the session can log it
    /// as a protocol oddity and move on.
    #[error("unknown frame type: {0:?}")]
    UnknownType(String),

    /// The frame is valid JSON but violates protocol rules, e.g. it is not
    /// an object, has no `type`, or names an unknown game variant.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
