use cardroom_protocol::{ActionType, GameAction, Variant};

use crate::{DropContext, VariantActions, ZoneKind};

/// Go Fish: drop a card on another player to ask them for its rank.
///
/// Asking doesn't consume the selection.
pub struct GoFish;

impl VariantActions for GoFish {
    fn variant(&self) -> Variant {
        Variant::GoFish
    }

    fn zone_kinds(&self) -> &'static [ZoneKind] {
        &[ZoneKind::Player]
    }

    fn build_drop(&self, drop: &DropContext<'_>) -> Option<GameAction> {
        let target = drop.target.id.as_deref()?;
        if target == drop.local_player.as_str() {
            return None;
        }
        let rank = drop.card(drop.first_card()?)?.rank()?;
        Some(
            GameAction::new(ActionType::AskForCards)
                .with("target_player_id", target)
                .with("rank", rank.as_str()),
        )
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
    fn test_drop_on_opponent_asks_for_rank() {
        let state = state_with_hand(
            json!([{"suit": "hearts", "rank": "4"}, {"suit": "spades", "rank": "Q"}]),
            json!({}),
        );
        let me = PlayerId::from("1");
        let target = ZoneRef::with_id(ZoneKind::Player, "2");
        let action = GoFish
            .build_drop(&drop_ctx(&[1], None, &target, &state, &me))
            .unwrap();
        assert_eq!(action.action_type(), ActionType::AskForCards);
        assert_eq!(action.payload()["target_player_id"], "2");
        assert_eq!(action.payload()["rank"], "Q");
        assert!(!action.consumes_selection());
    }

    #[test]
    fn test_cannot_ask_yourself() {
        let state = state_with_hand(json!([{"suit": "hearts", "rank": "4"}]), json!({}));
        let me = PlayerId::from("1");
        let target = ZoneRef::with_id(ZoneKind::Player, "1");
        assert_eq!(
            GoFish.build_drop(&drop_ctx(&[0], None, &target, &state, &me)),
            None
        );
    }
}
