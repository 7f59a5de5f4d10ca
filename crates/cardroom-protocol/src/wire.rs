//! Payload shapes carried inside server frames.
//!
//! These mirror what the server actually writes, with every field the
//! server may omit made optional. Whether a field was *present* matters to
//! the reconciler (present-but-null `current_player` clears the turn,
//! absent keeps it), so such fields are decoded as `Option<Option<T>>`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{Card, PlayerId, Status};

/// Decodes a field that was present in the frame, keeping an explicit
/// `null` distinguishable from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// One player's record as the server sends it.
///
/// Appears both inside state objects (keyed by id, with `hand`) and in the
/// lobby `players` list (with `isHost`, no hand).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(default)]
    pub id: Option<PlayerId>,
    #[serde(default, alias = "username")]
    pub name: Option<String>,
    #[serde(default, alias = "isHost")]
    pub is_host: Option<bool>,
    #[serde(default)]
    pub hand: Option<Vec<Card>>,
    #[serde(default)]
    pub hand_size: Option<usize>,
    #[serde(default)]
    pub score: Option<i64>,
}

/// A full or partial game state object.
///
/// A snapshot and a delta share this shape; they differ only in how the
/// reconciler applies them. Keys not named here (piles, melds, bids,
/// spoons, `deck`, `direction`, …) land in `variant_state` untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatePatch {
    /// The server's lifecycle name, written under `state`.
    #[serde(default)]
    pub state: Option<Status>,
    /// Same as `state`; some payloads use this key instead.
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub players: Option<BTreeMap<PlayerId, PlayerRecord>>,
    #[serde(default, deserialize_with = "present")]
    pub current_player: Option<Option<PlayerId>>,
    #[serde(default, deserialize_with = "present")]
    pub last_action: Option<Option<Value>>,
    #[serde(default)]
    pub max_selectable_cards: Option<usize>,
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(flatten)]
    pub variant_state: Map<String, Value>,
}

impl StatePatch {
    /// The reported status, whichever key carried it.
    pub fn reported_status(&self) -> Option<Status> {
        self.state.or(self.status)
    }
}

/// The `result` block of a `game_update` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// The `winner` block of a `game_over` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub id: PlayerId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub wins: Option<u32>,
}
