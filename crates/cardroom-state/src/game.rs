//! The canonical game state and its player records.

use std::collections::BTreeMap;

use cardroom_protocol::{Card, PlayerId, PlayerRecord, Status, Variant, Winner};
use serde_json::{Map, Value};

use crate::StateError;

/// Selection bound used when the server doesn't declare one.
pub const DEFAULT_MAX_SELECTABLE: usize = 1;

/// One player as the client sees them, normalized.
///
/// `hand` holds cards only for the local player; everyone else is
/// represented by `hand_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: Option<String>,
    pub is_host: bool,
    pub hand: Vec<Card>,
    pub hand_size: usize,
    pub score: Option<i64>,
}

impl PlayerView {
    /// Normalizes a wire record. The map key is the id, whatever the
    /// record itself says.
    pub fn from_record(id: PlayerId, record: PlayerRecord) -> Self {
        Self {
            id,
            name: record.name,
            is_host: record.is_host.unwrap_or(false),
            hand: record.hand.unwrap_or_default(),
            hand_size: record.hand_size.unwrap_or(0),
            score: record.score,
        }
    }
}

/// How a finished game came out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub scores: BTreeMap<PlayerId, i64>,
    pub winner: Option<Winner>,
}

/// The canonical, server-observed game state.
///
/// Values of this type are never edited in place once published: every
/// apply builds a new one, so a reader holding an `Arc<GameState>` never
/// sees a half-merged update.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub players: BTreeMap<PlayerId, PlayerView>,
    pub current_player: Option<PlayerId>,
    /// Piles, melds, bids, spoons and the like. Passed through untouched.
    pub variant_state: Map<String, Value>,
    pub last_action: Option<Value>,
    pub status: Status,
    pub max_selectable_cards: usize,
    pub variant: Option<Variant>,
    /// Set once the server reports the game over.
    pub outcome: Option<GameOutcome>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            players: BTreeMap::new(),
            current_player: None,
            variant_state: Map::new(),
            last_action: None,
            status: Status::Lobby,
            max_selectable_cards: DEFAULT_MAX_SELECTABLE,
            variant: None,
            outcome: None,
        }
    }
}

impl GameState {
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerView> {
        self.players.get(id)
    }

    /// The given player's hand, empty if they have no record.
    pub fn hand_of(&self, id: &PlayerId) -> &[Card] {
        self.players
            .get(id)
            .map(|p| p.hand.as_slice())
            .unwrap_or_default()
    }

    /// A variant-specific value by key, e.g. `"next_rank"`.
    pub fn variant_value(&self, key: &str) -> Option<&Value> {
        self.variant_state.get(key)
    }

    /// Checks the turn invariants.
    ///
    /// Player keys are unique by construction.
    pub fn check(&self) -> Result<(), StateError> {
        match &self.current_player {
            None if self.status == Status::Active => {
                Err(StateError::NoCurrentPlayer)
            }
            Some(id) if !self.players.is_empty() && !self.players.contains_key(id) => {
                Err(StateError::UnknownCurrentPlayer(id.clone()))
            }
            _ => Ok(()),
        }
    }
}
