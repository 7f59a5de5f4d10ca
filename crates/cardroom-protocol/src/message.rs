//! Outbound messages: channel frames and request/response bodies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ActionType, GameAction, PlayerId, RoomCode, Variant};

/// A frame the client pushes over the persistent channel.
///
/// Tagged by `type` like inbound frames:
/// `ClientMessage::Chat { message }` → `{"type":"chat","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Asks for a full snapshot. The server never pushes one unprompted.
    GetState,

    GameAction {
        room_code: RoomCode,
        player_id: PlayerId,
        action_type: ActionType,
        action_data: Map<String, Value>,
    },

    /// Intentional departure.
    LeaveRoom,

    Chat { message: String },

    StartGame {
        room_code: RoomCode,
        game_type: Variant,
    },
}

impl ClientMessage {
    /// Wraps an action as a channel frame for this room and player.
    pub fn action(room: &RoomCode, player: &PlayerId, action: GameAction) -> Self {
        let (action_type, action_data) = action.into_parts();
        Self::GameAction {
            room_code: room.clone(),
            player_id: player.clone(),
            action_type,
            action_data,
        }
    }

    /// The `type` tag this message is sent under.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GetState => "get_state",
            Self::GameAction { .. } => "game_action",
            Self::LeaveRoom => "leave_room",
            Self::Chat { .. } => "chat",
            Self::StartGame { .. } => "start_game",
        }
    }
}

/// Body of the request/response action submission.
///
/// Carries the same fields as [`ClientMessage::GameAction`], untagged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRequest {
    pub room_code: RoomCode,
    pub player_id: PlayerId,
    pub action_type: ActionType,
    pub action_data: Map<String, Value>,
}

impl ActionRequest {
    pub fn new(room: &RoomCode, player: &PlayerId, action: GameAction) -> Self {
        let (action_type, action_data) = action.into_parts();
        Self {
            room_code: room.clone(),
            player_id: player.clone(),
            action_type,
            action_data,
        }
    }
}

/// Body of the request/response game start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartRequest {
    pub room_code: RoomCode,
    pub game_type: Variant,
}

/// Error body the request/response endpoints return on failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectionBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl RejectionBody {
    /// The human-readable reason, whether `detail` was a string or not.
    pub fn reason(&self) -> Option<String> {
        match &self.detail {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unit_messages_encode_as_bare_tags() {
        assert_eq!(
            serde_json::to_value(ClientMessage::GetState).unwrap(),
            json!({"type": "get_state"})
        );
        assert_eq!(
            serde_json::to_value(ClientMessage::LeaveRoom).unwrap(),
            json!({"type": "leave_room"})
        );
    }

    #[test]
    fn test_game_action_frame_shape() {
        let action = GameAction::new(ActionType::DiscardCard).with("card_index", 0);
        let msg = ClientMessage::action(
            &RoomCode::new("ABCD"),
            &PlayerId::from("1"),
            action,
        );
        assert_eq!(msg.kind(), "game_action");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "game_action",
                "room_code": "ABCD",
                "player_id": "1",
                "action_type": "discard_card",
                "action_data": {"card_index": 0}
            })
        );
    }

    #[test]
    fn test_start_game_frame_uses_variant_wire_name() {
        let msg = ClientMessage::StartGame {
            room_code: RoomCode::new("ABCD"),
            game_type: Variant::KingsCorner,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "start_game", "room_code": "ABCD", "game_type": "kings_corner"})
        );
    }

    #[test]
    fn test_action_request_is_untagged() {
        let req = ActionRequest::new(
            &RoomCode::new("ABCD"),
            &PlayerId::from("7"),
            GameAction::new(ActionType::Knock),
        );
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "room_code": "ABCD",
                "player_id": "7",
                "action_type": "knock",
                "action_data": {}
            })
        );
    }

    #[test]
    fn test_rejection_reason_from_string_or_structure() {
        let s: RejectionBody =
            serde_json::from_value(json!({"detail": "Not your turn"})).unwrap();
        assert_eq!(s.reason().as_deref(), Some("Not your turn"));

        let v: RejectionBody =
            serde_json::from_value(json!({"detail": [{"msg": "field required"}]}))
                .unwrap();
        assert!(v.reason().unwrap().contains("field required"));

        let none: RejectionBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(none.reason(), None);
    }
}
