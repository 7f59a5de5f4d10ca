//! Unified error type for the Cardroom client.

use cardroom_protocol::ProtocolError;
use cardroom_state::{InteractionError, StateError};
use cardroom_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Code using the `cardroom` meta-crate deals with this one type. The
/// `#[from]` conversions let `?` lift sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CardroomError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid frame).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A reconciler invariant violation.
    #[error(transparent)]
    State(#[from] StateError),

    /// A gesture broke a local selection rule.
    #[error(transparent)]
    Interaction(#[from] InteractionError),

    /// The request/response action submission failed to complete.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server refused an action submitted over HTTP.
    #[error("action rejected: {0}")]
    ActionRejected(String),

    /// A session was started without a required parameter.
    #[error("missing session parameter: {0}")]
    MissingSessionParams(&'static str),
}
