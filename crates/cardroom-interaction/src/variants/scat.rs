use cardroom_protocol::{ActionType, GameAction, Variant};
use cardroom_state::GameState;

use crate::{Command, CommandKind, DropContext, VariantActions, ZoneKind};

/// Scat (thirty-one): draw, discard one, knock when confident.
pub struct Scat;

impl VariantActions for Scat {
    fn variant(&self) -> Variant {
        Variant::Scat
    }

    fn zone_kinds(&self) -> &'static [ZoneKind] {
        &[ZoneKind::Discard]
    }

    fn build_drop(&self, drop: &DropContext<'_>) -> Option<GameAction> {
        Some(
            GameAction::new(ActionType::DiscardCard)
                .with("card_index", drop.first_card()?),
        )
    }

    fn command_kinds(&self) -> &'static [CommandKind] {
        &[CommandKind::Draw, CommandKind::Knock]
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
            Command::Knock => Some(GameAction::new(ActionType::Knock)),
            _ => None,
        }
    }
}
