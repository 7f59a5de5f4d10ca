//! One module per game. Each contributes a
//! [`VariantActions`](crate::VariantActions) impl.

mod bluff;
mod go_fish;
mod kings_corner;
mod rummy;
mod scat;
mod snap;
mod spades;
mod spoons;

pub use bluff::Bluff;
pub use go_fish::GoFish;
pub use kings_corner::KingsCorner;
pub use rummy::Rummy;
pub use scat::Scat;
pub use snap::Snap;
pub use spades::Spades;
pub use spoons::Spoons;

use crate::ActionTable;

pub(crate) fn register_all(table: &mut ActionTable) {
    table.register(Snap);
    table.register(GoFish);
    table.register(Rummy);
    table.register(Spades);
    table.register(Scat);
    table.register(Bluff);
    table.register(KingsCorner);
    table.register(Spoons);
}

#[cfg(test)]
pub(crate) mod testing {
    use cardroom_protocol::{PlayerId, StatePatch};
    use cardroom_state::GameState;
    use serde_json::{Value, json};

    use crate::{DropContext, ZoneRef};

    /// A state where player "1" holds `hand` (wire-format cards).
    pub fn state_with_hand(hand: Value, extra: Value) -> GameState {
        let mut object = json!({
            "state": "playing",
            "current_player": "1",
            "players": {"1": {"hand": hand}, "2": {"hand_size": 4}}
        });
        if let (Some(base), Value::Object(extra)) = (object.as_object_mut(), extra) {
            base.extend(extra);
        }
        let patch: StatePatch = serde_json::from_value(object).unwrap();
        let mut rec = cardroom_state::Reconciler::new(PlayerId::from("1"));
        rec.apply_snapshot(patch, None);
        (**rec.state().unwrap()).clone()
    }

    pub fn drop_ctx<'a>(
        cards: &'a [usize],
        origin: Option<&'a ZoneRef>,
        target: &'a ZoneRef,
        state: &'a GameState,
        me: &'a PlayerId,
    ) -> DropContext<'a> {
        DropContext {
            cards,
            origin,
            target,
            state,
            local_player: me,
        }
    }
}
