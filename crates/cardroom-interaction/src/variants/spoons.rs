use cardroom_protocol::{ActionType, GameAction, Variant};
use cardroom_state::GameState;

use crate::{Command, CommandKind, DropContext, VariantActions, ZoneKind};

/// Spoons: pass one card along; grab a spoon when anyone collects four of
/// a kind.
pub struct Spoons;

impl VariantActions for Spoons {
    fn variant(&self) -> Variant {
        Variant::Spoons
    }

    fn zone_kinds(&self) -> &'static [ZoneKind] {
        &[ZoneKind::Discard]
    }

    fn build_drop(&self, drop: &DropContext<'_>) -> Option<GameAction> {
        Some(
            GameAction::new(ActionType::PassCard)
                .with("card_index", drop.first_card()?),
        )
    }

    fn command_kinds(&self) -> &'static [CommandKind] {
        &[CommandKind::GrabSpoon]
    }

    fn build_command(
        &self,
        command: &Command,
        _state: &GameState,
    ) -> Option<GameAction> {
        matches!(command, Command::GrabSpoon)
            .then(|| GameAction::new(ActionType::GrabSpoon))
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
    fn test_drop_on_discard_passes_card() {
        let state = state_with_hand(
            json!([{"suit": "hearts", "rank": "3"}, {"suit": "clubs", "rank": "3"}]),
            json!({"spoons": 1}),
        );
        let me = PlayerId::from("1");
        let target = ZoneRef::new(ZoneKind::Discard);
        let action = Spoons
            .build_drop(&drop_ctx(&[1], None, &target, &state, &me))
            .unwrap();
        assert_eq!(action.action_type(), ActionType::PassCard);
        assert_eq!(action.payload()["card_index"], 1);
    }

    #[test]
    fn test_no_card_means_no_pass() {
        let state = GameState::default();
        let me = PlayerId::from("1");
        let target = ZoneRef::new(ZoneKind::Discard);
        assert_eq!(
            Spoons.build_drop(&drop_ctx(&[], None, &target, &state, &me)),
            None
        );
    }
}
