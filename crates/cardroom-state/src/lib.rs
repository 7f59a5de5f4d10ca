//! Canonical client-side game state for Cardroom.
//!
//! - **[`Reconciler`]**: owns the one canonical [`GameState`], applying
//!   server snapshots (replace) and deltas (merge), and derives whose turn
//!   it is.
//! - **[`HandOrder`]**: the local player's own arrangement of their hand,
//!   kept stable across refreshes that don't change its contents.
//! - **[`Selection`]**: hand cards chosen but not yet submitted, bounded
//!   by the server's `max_selectable_cards`.
//!
//! # Architecture
//!
//! ```text
//! Protocol (ServerEvent) → State (Reconciler) → renderers / interaction
//! ```
//!
//! Everything here is synchronous. The reconciler is driven one event at
//! a time by its owner, and every apply publishes a fresh
//! `Arc<GameState>`, so readers never see a half-applied update.

mod error;
mod game;
mod hand;
mod reconciler;
mod selection;

pub use error::{InteractionError, StateError};
pub use game::{DEFAULT_MAX_SELECTABLE, GameOutcome, GameState, PlayerView};
pub use hand::{CardId, HandOrder};
pub use reconciler::{Applied, Reconciler};
pub use selection::Selection;
