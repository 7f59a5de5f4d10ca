use cardroom_protocol::{ActionType, GameAction, Variant};
use cardroom_state::GameState;

use crate::{Command, CommandKind, DropContext, VariantActions, ZoneKind};

/// Snap: flip the top of your pile onto the center, race to call snap.
pub struct Snap;

impl VariantActions for Snap {
    fn variant(&self) -> Variant {
        Variant::Snap
    }

    fn zone_kinds(&self) -> &'static [ZoneKind] {
        &[ZoneKind::Center]
    }

    fn build_drop(&self, _drop: &DropContext<'_>) -> Option<GameAction> {
        // The server always plays the top card; no index is sent.
        Some(GameAction::new(ActionType::PlayCard))
    }

    fn command_kinds(&self) -> &'static [CommandKind] {
        &[CommandKind::Snap]
    }

    fn build_command(
        &self,
        command: &Command,
        _state: &GameState,
    ) -> Option<GameAction> {
        matches!(command, Command::Snap).then(|| GameAction::new(ActionType::Snap))
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
    fn test_center_drop_plays_with_empty_payload() {
        let state = state_with_hand(json!([{"suit": "hearts", "rank": "4"}]), json!({}));
        let me = PlayerId::from("1");
        let target = ZoneRef::new(ZoneKind::Center);
        let action = Snap
            .build_drop(&drop_ctx(&[0], None, &target, &state, &me))
            .unwrap();
        assert_eq!(action.action_type(), ActionType::PlayCard);
        assert!(action.payload().is_empty());
    }

    #[test]
    fn test_snap_command() {
        let state = GameState::default();
        let action = Snap.build_command(&Command::Snap, &state).unwrap();
        assert_eq!(action.action_type(), ActionType::Snap);
    }
}
