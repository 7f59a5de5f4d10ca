//! Outbound game actions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Every action the server accepts, by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    DrawCard,
    DiscardCard,
    PlayCard,
    PlayCards,
    LayMeld,
    AddToMeld,
    MovePile,
    EndTurn,
    MakeBid,
    AskForCards,
    Challenge,
    Snap,
    Knock,
    PassCard,
    GrabSpoon,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DrawCard => "draw_card",
            Self::DiscardCard => "discard_card",
            Self::PlayCard => "play_card",
            Self::PlayCards => "play_cards",
            Self::LayMeld => "lay_meld",
            Self::AddToMeld => "add_to_meld",
            Self::MovePile => "move_pile",
            Self::EndTurn => "end_turn",
            Self::MakeBid => "make_bid",
            Self::AskForCards => "ask_for_cards",
            Self::Challenge => "challenge",
            Self::Snap => "snap",
            Self::Knock => "knock",
            Self::PassCard => "pass_card",
            Self::GrabSpoon => "grab_spoon",
        }
    }

    /// Whether dispatching this action uses up the current selection.
    ///
    /// Asks and challenges leave the selection in place for a follow-up.
    pub fn consumes_selection(self) -> bool {
        matches!(
            self,
            Self::DiscardCard
                | Self::PlayCard
                | Self::PlayCards
                | Self::LayMeld
                | Self::AddToMeld
                | Self::PassCard
        )
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A one-shot request to the server: an action type and its payload.
///
/// Built once and never mutated after it leaves the builder chain.
///
/// ```rust
/// use cardroom_protocol::{ActionType, GameAction};
///
/// let action = GameAction::new(ActionType::DiscardCard).with("card_index", 0);
/// assert_eq!(action.action_type(), ActionType::DiscardCard);
/// assert_eq!(action.payload()["card_index"], 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GameAction {
    action_type: ActionType,
    payload: Map<String, Value>,
}

impl GameAction {
    /// An action with an empty payload.
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            payload: Map::new(),
        }
    }

    /// Adds one payload field.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn consumes_selection(&self) -> bool {
        self.action_type.consumes_selection()
    }

    pub fn into_parts(self) -> (ActionType, Map<String, Value>) {
        (self.action_type, self.payload)
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.action_type, Value::Object(self.payload.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_wire_names_match_as_str() {
        for ty in [
            ActionType::DrawCard,
            ActionType::AddToMeld,
            ActionType::AskForCards,
            ActionType::GrabSpoon,
        ] {
            let json = serde_json::to_value(ty).unwrap();
            assert_eq!(json, ty.as_str());
        }
    }

    #[test]
    fn test_selection_consuming_actions() {
        assert!(ActionType::DiscardCard.consumes_selection());
        assert!(ActionType::LayMeld.consumes_selection());
        assert!(!ActionType::AskForCards.consumes_selection());
        assert!(!ActionType::Challenge.consumes_selection());
        assert!(!ActionType::DrawCard.consumes_selection());
    }

    #[test]
    fn test_builder_collects_payload() {
        let action = GameAction::new(ActionType::AddToMeld)
            .with("card_index", 2)
            .with("meld_index", 0);
        assert_eq!(action.payload().len(), 2);
        assert_eq!(action.payload()["meld_index"], 0);
        assert_eq!(action.to_string(), r#"add_to_meld{"card_index":2,"meld_index":0}"#);
    }
}
