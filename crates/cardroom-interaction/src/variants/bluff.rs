use cardroom_protocol::{ActionType, GameAction, Variant};
use cardroom_state::GameState;
use serde_json::Value;

use crate::{Command, CommandKind, DropContext, VariantActions, ZoneKind};

/// Bluff: play cards face down to the center claiming the rank in turn;
/// anyone may challenge the last claim.
pub struct Bluff;

impl VariantActions for Bluff {
    fn variant(&self) -> Variant {
        Variant::Bluff
    }

    fn zone_kinds(&self) -> &'static [ZoneKind] {
        &[ZoneKind::Center]
    }

    fn build_drop(&self, drop: &DropContext<'_>) -> Option<GameAction> {
        if drop.cards.is_empty() {
            return None;
        }
        // The claim is the rank the table is on; the first card's own rank
        // stands in before the server has announced one.
        let claimed = match drop.state.variant_value("next_rank") {
            Some(Value::String(rank)) => rank.clone(),
            _ => drop
                .card(drop.first_card()?)?
                .rank()?
                .as_str()
                .to_string(),
        };
        Some(
            GameAction::new(ActionType::PlayCards)
                .with("card_indices", drop.cards.to_vec())
                .with("claimed_rank", claimed),
        )
    }

    fn command_kinds(&self) -> &'static [CommandKind] {
        &[CommandKind::Challenge]
    }

    fn build_command(
        &self,
        command: &Command,
        _state: &GameState,
    ) -> Option<GameAction> {
        matches!(command, Command::Challenge)
            .then(|| GameAction::new(ActionType::Challenge))
    }
}
