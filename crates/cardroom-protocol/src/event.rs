//! Inbound frames and the typed events they decode into.
//!
//! Decoding is the one place the client checks frame shapes. A frame
//! comes in as `{"type": "...", ...}`; [`decode_event`] picks the frame by
//! its `type`, validates and normalizes its payload, and hands back a
//! [`ServerEvent`]. Consumers never look at raw JSON.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::{
    ActionOutcome, Codec, PlayerId, PlayerRecord, ProtocolError, StatePatch,
    Variant, Winner,
};

/// Room-level chatter the server interleaves with game frames.
///
/// Recognized so it is not mistaken for protocol garbage, but the core
/// does not interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Chat,
    PlayerJoined,
    HostUpdate,
}

/// A decoded, normalized server event.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// A complete server-asserted state (reply to `get_state`).
    Snapshot {
        state: StatePatch,
        variant: Option<Variant>,
    },

    /// A partial update broadcast after some player's action.
    Delta {
        patch: StatePatch,
        /// The action that produced this update (`"discard_card"`).
        tag: Option<String>,
        /// Who performed it.
        actor: Option<PlayerId>,
        /// Set when the server reports the action failed.
        rejection: Option<String>,
    },

    /// A game began; `state` is its initial full state.
    GameStarted { state: StatePatch, variant: Variant },

    /// The game ended.
    GameOver {
        scores: BTreeMap<PlayerId, i64>,
        winner: Option<Winner>,
    },

    /// The server reported an error. Never alters game state.
    Error { message: String },

    /// A player left; `game_ended` is set when that ended the game.
    PlayerLeft { player: PlayerId, game_ended: bool },

    /// Chat, join or host-change notices for the room.
    RoomNotice {
        kind: NoticeKind,
        from: Option<String>,
        message: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Wire frames
// ---------------------------------------------------------------------------

/// Body shared by the room notice frames.
#[derive(Debug, Deserialize)]
struct NoticeBody {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Every inbound frame, tagged by `type`.
///
/// `#[serde(tag = "type", rename_all = "snake_case")]` means
/// `{"type": "game_update", "action": "snap", ...}` decodes into
/// `ServerFrame::GameUpdate { action: Some("snap"), .. }`.
/// `#[serde(other)]` catches every tag not listed so it can be reported
/// as [`ProtocolError::UnknownType`] instead of a generic decode failure.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerFrame {
    GameState {
        #[serde(default)]
        state: Option<StatePatch>,
        #[serde(default)]
        players: Option<Vec<PlayerRecord>>,
        #[serde(default)]
        game_type: Option<String>,
    },
    GameUpdate {
        #[serde(default)]
        action: Option<String>,
        #[serde(default)]
        player_id: Option<PlayerId>,
        #[serde(default)]
        result: Option<ActionOutcome>,
        #[serde(default)]
        game_state: Option<StatePatch>,
    },
    GameStarted {
        game_type: String,
        #[serde(default)]
        state: Option<StatePatch>,
    },
    GameOver {
        #[serde(default)]
        scores: BTreeMap<PlayerId, i64>,
        #[serde(default)]
        winner: Option<Winner>,
    },
    Error {
        #[serde(default)]
        message: Option<String>,
    },
    PlayerLeft {
        #[serde(alias = "player_id")]
        player: PlayerId,
        #[serde(default)]
        game_ended: bool,
    },
    Chat(NoticeBody),
    PlayerJoined(NoticeBody),
    HostUpdate(NoticeBody),
    #[serde(other)]
    Unknown,
}

/// Decodes one raw frame into a [`ServerEvent`].
///
/// # Errors
/// - [`ProtocolError::Decode`]: not JSON, or a known frame with a bad
///   payload.
/// - [`ProtocolError::InvalidMessage`]: not an object, no string `type`,
///   or an unknown `game_type` on `game_started`.
/// - [`ProtocolError::UnknownType`]: a `type` this client doesn't know.
pub fn decode_event<C: Codec>(
    codec: &C,
    frame: &[u8],
) -> Result<ServerEvent, ProtocolError> {
    let value: Value = codec.decode(frame)?;

    let tag = match value.get("type") {
        Some(Value::String(tag)) => tag.clone(),
        Some(_) => {
            return Err(ProtocolError::InvalidMessage(
                "frame `type` is not a string".into(),
            ));
        }
        None if value.is_object() => {
            return Err(ProtocolError::InvalidMessage(
                "frame has no `type`".into(),
            ));
        }
        None => {
            return Err(ProtocolError::InvalidMessage(
                "frame is not a JSON object".into(),
            ));
        }
    };

    let frame: ServerFrame =
        serde_json::from_value(value).map_err(ProtocolError::Decode)?;

    match frame {
        ServerFrame::GameState {
            state,
            players,
            game_type,
        } => {
            let mut state = state.unwrap_or_default();
            // No game running: the inner state is `{}` and the lobby list
            // is the only roster.
            if state.players.is_none() {
                if let Some(list) = players {
                    state.players = Some(roster_from_list(list));
                }
            }
            let variant = game_type
                .as_deref()
                .or(state.game_type.as_deref())
                .and_then(parse_variant_lenient);
            Ok(ServerEvent::Snapshot { state, variant })
        }

        ServerFrame::GameUpdate {
            action,
            player_id,
            result,
            game_state,
        } => {
            let rejection = result.filter(|r| !r.success).map(|r| {
                r.message.unwrap_or_else(|| "action failed".to_string())
            });
            Ok(ServerEvent::Delta {
                patch: game_state.unwrap_or_default(),
                tag: action,
                actor: player_id,
                rejection,
            })
        }

        ServerFrame::GameStarted { game_type, state } => {
            let variant = game_type
                .parse::<Variant>()
                .map_err(ProtocolError::InvalidMessage)?;
            Ok(ServerEvent::GameStarted {
                state: state.unwrap_or_default(),
                variant,
            })
        }

        ServerFrame::GameOver { scores, winner } => {
            Ok(ServerEvent::GameOver { scores, winner })
        }

        ServerFrame::Error { message } => Ok(ServerEvent::Error {
            message: message.unwrap_or_else(|| "server error".to_string()),
        }),

        ServerFrame::PlayerLeft { player, game_ended } => {
            Ok(ServerEvent::PlayerLeft { player, game_ended })
        }

        ServerFrame::Chat(body) => Ok(notice(NoticeKind::Chat, body)),
        ServerFrame::PlayerJoined(body) => {
            Ok(notice(NoticeKind::PlayerJoined, body))
        }
        ServerFrame::HostUpdate(body) => {
            Ok(notice(NoticeKind::HostUpdate, body))
        }

        ServerFrame::Unknown => Err(ProtocolError::UnknownType(tag)),
    }
}

fn notice(kind: NoticeKind, body: NoticeBody) -> ServerEvent {
    ServerEvent::RoomNotice {
        kind,
        from: body.username,
        message: body.message,
    }
}

/// Keys a lobby list by player id; entries without an id are dropped.
fn roster_from_list(
    list: Vec<PlayerRecord>,
) -> BTreeMap<PlayerId, PlayerRecord> {
    list.into_iter()
        .filter_map(|record| record.id.clone().map(|id| (id, record)))
        .collect()
}

/// Snapshots may name a variant this client doesn't support; that only
/// costs the interaction table, so it is logged rather than fatal.
fn parse_variant_lenient(name: &str) -> Option<Variant> {
    match name.parse::<Variant>() {
        Ok(variant) => Some(variant),
        Err(e) => {
            tracing::warn!(error = %e, "snapshot names an unknown variant");
            None
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
