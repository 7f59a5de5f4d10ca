use cardroom_protocol::{ActionType, GameAction, Variant};
use cardroom_state::GameState;

use crate::{Command, CommandKind, DropContext, VariantActions, ZoneKind};

/// Rummy: lay the selection down as a new meld, extend an existing meld
/// with one card, or discard to end the turn.
///
/// A meld zone without an id is the "new meld" area; a meld zone whose
/// id is a number is that existing meld.
pub struct Rummy;

impl VariantActions for Rummy {
    fn variant(&self) -> Variant {
        Variant::Rummy
    }

    fn zone_kinds(&self) -> &'static [ZoneKind] {
        &[ZoneKind::Meld, ZoneKind::Discard]
    }

    fn build_drop(&self, drop: &DropContext<'_>) -> Option<GameAction> {
        match drop.target.kind {
            ZoneKind::Meld => match drop.target.id.as_deref() {
                None => {
                    if drop.cards.is_empty() {
                        return None;
                    }
                    Some(
                        GameAction::new(ActionType::LayMeld)
                            .with("card_indices", drop.cards.to_vec()),
                    )
                }
                Some(id) => {
                    let meld_index: usize = id.parse().ok()?;
                    Some(
                        GameAction::new(ActionType::AddToMeld)
                            .with("card_index", drop.first_card()?)
                            .with("meld_index", meld_index),
                    )
                }
            },
            ZoneKind::Discard => Some(
                GameAction::new(ActionType::DiscardCard)
                    .with("card_index", drop.first_card()?),
            ),
            _ => None,
        }
    }

    fn command_kinds(&self) -> &'static [CommandKind] {
        &[CommandKind::Draw]
    }

    fn build_command(
        &self,
        command: &Command,
        _state: &GameState,
    ) -> Option<GameAction> {
        match command {
            Command::Draw { from_discard } => Some(
                GameAction::new(ActionType::DrawCard)
                    .with("from_discard", *from_discard),
            ),
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

    fn hand() -> serde_json::Value {
        json!([
            {"suit": "hearts", "rank": "5"},
            {"suit": "hearts", "rank": "6"},
            {"suit": "hearts", "rank": "7"}
        ])
    }

    #[test]
    fn test_drop_on_new_meld_lays_selection() {
        let state = state_with_hand(hand(), json!({"melds": []}));
        let me = PlayerId::from("1");
        let target = ZoneRef::new(ZoneKind::Meld);
        let action = Rummy
            .build_drop(&drop_ctx(&[2, 0, 1], None, &target, &state, &me))
            .unwrap();
        assert_eq!(action.action_type(), ActionType::LayMeld);
        assert_eq!(action.payload()["card_indices"], json!([2, 0, 1]));
    }

    #[test]
    fn test_drop_on_existing_meld_adds_one_card() {
        let state = state_with_hand(hand(), json!({}));
        let me = PlayerId::from("1");
        let target = ZoneRef::with_id(ZoneKind::Meld, "3");
        let action = Rummy
            .build_drop(&drop_ctx(&[1], None, &target, &state, &me))
            .unwrap();
        assert_eq!(action.action_type(), ActionType::AddToMeld);
        assert_eq!(action.payload()["card_index"], 1);
        assert_eq!(action.payload()["meld_index"], 3);
    }

    #[test]
    fn test_bad_meld_id_maps_to_nothing() {
        let state = state_with_hand(hand(), json!({}));
        let me = PlayerId::from("1");
        let target = ZoneRef::with_id(ZoneKind::Meld, "left");
        assert_eq!(
            Rummy.build_drop(&drop_ctx(&[1], None, &target, &state, &me)),
            None
        );
    }

    #[test]
    fn test_draw_from_discard() {
        let action = Rummy
            .build_command(&Command::Draw { from_discard: true }, &GameState::default())
            .unwrap();
        assert_eq!(action.payload()["from_discard"], true);
    }
}
