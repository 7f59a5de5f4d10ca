use cardroom_protocol::{ActionType, GameAction, Variant};
use cardroom_state::GameState;

use crate::{Command, CommandKind, DropContext, VariantActions, ZoneKind};

/// Spades: bid, then play one card per trick to the center.
pub struct Spades;

impl VariantActions for Spades {
    fn variant(&self) -> Variant {
        Variant::Spades
    }

    fn zone_kinds(&self) -> &'static [ZoneKind] {
        &[ZoneKind::Center]
    }

    fn build_drop(&self, drop: &DropContext<'_>) -> Option<GameAction> {
        let index = drop.first_card()?;
        Some(GameAction::new(ActionType::PlayCard).with("card_index", index))
    }

    fn command_kinds(&self) -> &'static [CommandKind] {
        &[CommandKind::Bid]
    }

    fn build_command(
        &self,
        command: &Command,
        _state: &GameState,
    ) -> Option<GameAction> {
        match command {
            Command::Bid(bid) => {
                Some(GameAction::new(ActionType::MakeBid).with("bid", *bid))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use cardroom_protocol::PlayerId;
    use serde_json::json;

    use super::*;
    use crate::ZoneRef;
    use crate::variants::testing::{drop_ctx, state_with_hand};

    #[test]
    fn test_center_drop_plays_card_by_index() {
        let state = state_with_hand(
            json!([{"suit": "spades", "rank": "2"}, {"suit": "clubs", "rank": "9"}]),
            json!({}),
        );
        let me = PlayerId::from("1");
        let target = ZoneRef::new(ZoneKind::Center);
        let action = Spades
            .build_drop(&drop_ctx(&[1], None, &target, &state, &me))
            .unwrap();
        assert_eq!(action.payload()["card_index"], 1);
    }

    #[test]
    fn test_bid_command() {
        let action = Spades
            .build_command(&Command::Bid(4), &GameState::default())
            .unwrap();
        assert_eq!(action.action_type(), ActionType::MakeBid);
        assert_eq!(action.payload()["bid"], 4);
    }
}
