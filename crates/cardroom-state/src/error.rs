//! Error types for the state layer.

use cardroom_protocol::PlayerId;

/// A canonical state that breaks one of its invariants.
///
/// The reconciler never refuses server state: the server is authoritative.
/// These are reported alongside the applied state so the session can log
/// them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The game is active but nobody holds the turn.
    #[error("game is active but has no current player")]
    NoCurrentPlayer,

    /// The turn belongs to a player with no record.
    #[error("current player {0} has no player record")]
    UnknownCurrentPlayer(PlayerId),
}

/// A gesture that breaks a local rule.
///
/// Transient and fully recoverable: the user sees it briefly, nothing is
/// sent, nothing is logged as a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InteractionError {
    /// Selecting one more card would exceed `max_selectable_cards`.
    #[error("you can select at most {max} card(s)")]
    SelectionLimit { max: usize },
}
