//! Wire protocol for Cardroom.
//!
//! This crate defines the "language" the client and the game server speak:
//!
//! - **Types** ([`PlayerId`], [`Card`], [`Variant`], [`Status`], …):
//!   the values that appear inside frames, normalized once at decode time.
//! - **Events** ([`ServerEvent`], [`decode_event`]): inbound frames,
//!   validated and turned into typed events.
//! - **Messages** ([`ClientMessage`], [`GameAction`]): what the client
//!   sends back.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how values are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the state
//! reconciler (canonical game state). It doesn't know about connections
//! or game rules. It only knows what a well-formed frame looks like.
//!
//! ```text
//! Transport (bytes) → Protocol (ServerEvent) → State (GameState)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod action;
mod codec;
mod error;
mod event;
mod message;
mod types;
mod wire;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use action::{ActionType, GameAction};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use event::{NoticeKind, ServerEvent, decode_event};
pub use message::{ActionRequest, ClientMessage, RejectionBody, StartRequest};
pub use types::{Card, PlayerId, Rank, RoomCode, Status, Suit, Variant};
pub use wire::{ActionOutcome, PlayerRecord, StatePatch, Winner};
