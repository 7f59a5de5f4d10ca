use cardroom_protocol::{ActionType, GameAction, Variant};
use cardroom_state::GameState;

use crate::{Command, CommandKind, DropContext, VariantActions, ZoneKind};

/// Kings Corner: play hand cards onto foundation and corner piles, or
/// move a whole pile onto another.
///
/// Zones carry the server's pile ids (`"foundation_0"`, `"corner_3"`).
pub struct KingsCorner;

impl VariantActions for KingsCorner {
    fn variant(&self) -> Variant {
        Variant::KingsCorner
    }

    fn zone_kinds(&self) -> &'static [ZoneKind] {
        &[ZoneKind::Foundation, ZoneKind::Corner]
    }

    fn build_drop(&self, drop: &DropContext<'_>) -> Option<GameAction> {
        let target = drop.target.id.as_deref()?;
        match drop.origin {
            Some(origin) => {
                let source = origin.id.as_deref()?;
                if source == target {
                    return None;
                }
                Some(
                    GameAction::new(ActionType::MovePile)
                        .with("source_pile_id", source)
                        .with("target_pile_id", target),
                )
            }
            None => Some(
                GameAction::new(ActionType::PlayCard)
                    .with("card_index", drop.first_card()?)
                    .with("pile_id", target),
            ),
        }
    }

    fn command_kinds(&self) -> &'static [CommandKind] {
        &[CommandKind::Draw, CommandKind::EndTurn]
    }

    fn build_command(
        &self,
        command: &Command,
        _state: &GameState,
    ) -> Option<GameAction> {
        match command {
            // Kings Corner has no discard pile; the flag is meaningless.
            Command::Draw { .. } => Some(GameAction::new(ActionType::DrawCard)),
            Command::EndTurn => Some(GameAction::new(ActionType::EndTurn)),
            _ => None,
        }
    }
}
