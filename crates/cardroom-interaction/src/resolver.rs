//! The interaction resolver: turns a gesture into a game action, a local
//! selection or reorder, or nothing.
//!
//! Rules, first match wins:
//!
//! 1. Hand → hand drop: reorder the displayed hand. Never sent.
//! 2. Drop on a board zone: look the (variant, zone kind) pair up in the
//!    [`ActionTable`]. Unmapped pairs do nothing.
//! 3. Click on a face-up hand card on your turn: toggle it in the
//!    selection, bounded by `max_selectable_cards`. Going over the bound
//!    is an [`InteractionError`].
//! 4. Anything off-turn or on a face-down card: ignored, not an error.
//!
//! The server stays authoritative. These checks only keep the client from
//! sending actions the server is certain to reject.

use std::sync::Arc;

use cardroom_protocol::{GameAction, Variant};
use cardroom_state::{GameState, InteractionError, Reconciler};
use tracing::debug;

use crate::{
    ActionTable, Command, DropContext, Gesture, GestureKind, Place, ZoneRef,
};

/// What a resolved gesture or command amounts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Send this action.
    Dispatch(GameAction),
    /// The selection changed.
    SelectionChanged,
    /// The displayed hand order changed.
    Reordered,
    /// Nothing happens.
    Ignored(Ignored),
}

/// Why a gesture resolved to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// No state has arrived yet.
    NoState,
    NotYourTurn,
    FaceDown,
    /// The variant has no action for this target.
    NoMapping,
    /// A hand position that doesn't exist.
    OutOfRange,
    /// A gesture shape no rule covers, e.g. a click on a zone.
    Unsupported,
}

/// Resolves gestures against the reconciler's current state.
#[derive(Debug, Default)]
pub struct Resolver {
    table: ActionTable,
    fallback_variant: Option<Variant>,
}

impl Resolver {
    pub fn new(table: ActionTable) -> Self {
        Self {
            table,
            fallback_variant: None,
        }
    }

    /// The variant to assume until the server names one.
    #[must_use]
    pub fn with_variant(mut self, variant: Option<Variant>) -> Self {
        self.fallback_variant = variant;
        self
    }

    /// Resolves one gesture, updating the reconciler's selection or hand
    /// order as a side effect.
    ///
    /// # Errors
    /// Returns [`InteractionError::SelectionLimit`] when a click would
    /// select more cards than allowed.
    pub fn resolve(
        &self,
        gesture: &Gesture,
        rec: &mut Reconciler,
    ) -> Result<Resolution, InteractionError> {
        let resolution = match (gesture.kind, &gesture.source, &gesture.target)
        {
            (GestureKind::Drop, Place::Hand(from), Some(Place::Hand(to))) => {
                if rec.reorder_hand(*from, *to) {
                    Resolution::Reordered
                } else {
                    Resolution::Ignored(Ignored::OutOfRange)
                }
            }
            (GestureKind::Drop, source, Some(Place::Zone(target))) => {
                self.resolve_drop(source, target, rec)
            }
            (GestureKind::Click, Place::Hand(position), _) => {
                self.resolve_click(*position, rec)?
            }
            _ => Resolution::Ignored(Ignored::Unsupported),
        };
        debug!(?gesture, ?resolution, "gesture resolved");
        Ok(resolution)
    }

    /// Resolves a command. Races (`snap`, `challenge`, `grab_spoon`) skip
    /// the turn check.
    pub fn resolve_command(
        &self,
        command: &Command,
        rec: &mut Reconciler,
    ) -> Resolution {
        let resolution = self.command_resolution(command, rec);
        debug!(?command, ?resolution, "command resolved");
        resolution
    }

    fn command_resolution(
        &self,
        command: &Command,
        rec: &mut Reconciler,
    ) -> Resolution {
        let Some(state) = rec.state().map(Arc::clone) else {
            return Resolution::Ignored(Ignored::NoState);
        };
        if !command.kind().allowed_off_turn() && !rec.is_local_turn() {
            return Resolution::Ignored(Ignored::NotYourTurn);
        }
        let Some(variant) = self.variant(&state) else {
            return Resolution::Ignored(Ignored::NoMapping);
        };
        match self.table.map_command(variant, command, &state) {
            Some(action) => dispatch(action, rec),
            None => Resolution::Ignored(Ignored::NoMapping),
        }
    }

    fn resolve_drop(
        &self,
        source: &Place,
        target: &ZoneRef,
        rec: &mut Reconciler,
    ) -> Resolution {
        let Some(state) = rec.state().map(Arc::clone) else {
            return Resolution::Ignored(Ignored::NoState);
        };
        if !rec.is_local_turn() {
            return Resolution::Ignored(Ignored::NotYourTurn);
        }
        let Some(variant) = self.variant(&state) else {
            return Resolution::Ignored(Ignored::NoMapping);
        };
        if !self.table.accepts(variant, target.kind) {
            return Resolution::Ignored(Ignored::NoMapping);
        }

        let (cards, origin) = match source {
            Place::Hand(position) => {
                let index = match face_up_index(*position, rec) {
                    Ok(index) => index,
                    Err(ignored) => return Resolution::Ignored(ignored),
                };
                // Dragging a selected card carries the whole selection.
                let cards = if rec.selection().contains(index) {
                    rec.selection().indices().to_vec()
                } else {
                    vec![index]
                };
                (cards, None)
            }
            Place::Zone(zone) => (Vec::new(), Some(zone)),
        };

        let drop = DropContext {
            cards: &cards,
            origin,
            target,
            state: &state,
            local_player: rec.local_player(),
        };
        let mapped = self.table.map_drop(variant, &drop);
        match mapped {
            Some(action) => dispatch(action, rec),
            None => Resolution::Ignored(Ignored::NoMapping),
        }
    }

    fn resolve_click(
        &self,
        position: usize,
        rec: &mut Reconciler,
    ) -> Result<Resolution, InteractionError> {
        if rec.state().is_none() {
            return Ok(Resolution::Ignored(Ignored::NoState));
        }
        if !rec.is_local_turn() {
            return Ok(Resolution::Ignored(Ignored::NotYourTurn));
        }
        let index = match face_up_index(position, rec) {
            Ok(index) => index,
            Err(ignored) => return Ok(Resolution::Ignored(ignored)),
        };
        rec.toggle_selection(index)?;
        Ok(Resolution::SelectionChanged)
    }

    fn variant(&self, state: &GameState) -> Option<Variant> {
        state.variant.or(self.fallback_variant)
    }
}

/// Maps a display position to a server index, refusing face-down cards.
fn face_up_index(position: usize, rec: &Reconciler) -> Result<usize, Ignored> {
    let hand = rec.local_hand();
    let index = rec
        .hand_order()
        .server_index(position, hand)
        .ok_or(Ignored::OutOfRange)?;
    match hand.get(index) {
        Some(card) if card.is_face_up() => Ok(index),
        Some(_) => Err(Ignored::FaceDown),
        None => Err(Ignored::OutOfRange),
    }
}

fn dispatch(action: GameAction, rec: &mut Reconciler) -> Resolution {
    if action.consumes_selection() {
        rec.clear_selection();
    }
    Resolution::Dispatch(action)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use cardroom_protocol::{ActionType, PlayerId, StatePatch};
    use serde_json::{Value, json};

    use super::*;
    use crate::ZoneKind;

    fn reconciler(current: &str, hand: Value, extra: Value) -> Reconciler {
        let mut object = json!({
            "state": "playing",
            "current_player": current,
            "max_selectable_cards": 2,
            "players": {"1": {"hand": hand}, "2": {"hand_size": 3}}
        });
        if let (Some(base), Value::Object(extra)) = (object.as_object_mut(), extra) {
            base.extend(extra);
        }
        let patch: StatePatch = serde_json::from_value(object).unwrap();
        let mut rec = Reconciler::new(PlayerId::from("1"));
        rec.apply_snapshot(patch, None);
        rec
    }

    fn three_cards() -> Value {
        json!([
            {"suit": "hearts", "rank": "5"},
            {"suit": "spades", "rank": "K", "show_back": true},
            {"suit": "clubs", "rank": "9"}
        ])
    }

    fn resolver(variant: Variant) -> Resolver {
        Resolver::new(ActionTable::standard()).with_variant(Some(variant))
    }

    // =====================================================================
    // Rule 1: reorder
    // =====================================================================

    #[test]
    fn test_hand_to_hand_drop_reorders_without_action() {
        let mut rec = reconciler("2", three_cards(), json!({}));
        let r = resolver(Variant::Rummy);
        let res = r
            .resolve(&Gesture::drop(Place::Hand(0), Place::Hand(2)), &mut rec)
            .unwrap();
        assert_eq!(res, Resolution::Reordered);
        assert_eq!(rec.hand_order().entries()[2].to_string(), "hearts_5_0");
    }

    #[test]
    fn test_reorder_out_of_range_is_ignored() {
        let mut rec = reconciler("1", three_cards(), json!({}));
        let res = resolver(Variant::Rummy)
            .resolve(&Gesture::drop(Place::Hand(0), Place::Hand(7)), &mut rec)
            .unwrap();
        assert_eq!(res, Resolution::Ignored(Ignored::OutOfRange));
    }

    // =====================================================================
    // Rule 2: zone drops
    // =====================================================================

    #[test]
    fn test_drop_on_unmapped_zone_is_a_no_op() {
        let mut rec = reconciler("1", three_cards(), json!({}));
        let res = resolver(Variant::Scat)
            .resolve(
                &Gesture::drop(Place::Hand(0), Place::Zone(ZoneRef::new(ZoneKind::Meld))),
                &mut rec,
            )
            .unwrap();
        assert_eq!(res, Resolution::Ignored(Ignored::NoMapping));
    }

    #[test]
    fn test_dragging_selected_card_carries_selection() {
        let mut rec = reconciler("1", three_cards(), json!({}));
        let r = resolver(Variant::Rummy);
        r.resolve(&Gesture::click(Place::Hand(2)), &mut rec).unwrap();
        r.resolve(&Gesture::click(Place::Hand(0)), &mut rec).unwrap();

        let res = r
            .resolve(
                &Gesture::drop(Place::Hand(0), Place::Zone(ZoneRef::new(ZoneKind::Meld))),
                &mut rec,
            )
            .unwrap();
        let Resolution::Dispatch(action) = res else {
            panic!("expected Dispatch, got {res:?}");
        };
        assert_eq!(action.action_type(), ActionType::LayMeld);
        assert_eq!(action.payload()["card_indices"], json!([2, 0]));
        assert!(rec.selection().is_empty());
    }

    #[test]
    fn test_selection_survives_server_resorting_the_hand() {
        let hand = json!([
            {"suit": "hearts", "rank": "5"},
            {"suit": "hearts", "rank": "6"},
            {"suit": "clubs", "rank": "K"}
        ]);
        let mut rec = reconciler("1", hand, json!({}));
        let r = resolver(Variant::Rummy);
        r.resolve(&Gesture::click(Place::Hand(0)), &mut rec).unwrap();
        r.resolve(&Gesture::click(Place::Hand(1)), &mut rec).unwrap();

        let resorted: StatePatch = serde_json::from_value(json!({
            "players": {"1": {"hand": [
                {"suit": "clubs", "rank": "K"},
                {"suit": "hearts", "rank": "5"},
                {"suit": "hearts", "rank": "6"}
            ]}}
        }))
        .unwrap();
        rec.apply_delta(resorted);

        let res = r
            .resolve(
                &Gesture::drop(Place::Hand(0), Place::Zone(ZoneRef::new(ZoneKind::Meld))),
                &mut rec,
            )
            .unwrap();
        let Resolution::Dispatch(action) = res else {
            panic!("expected Dispatch, got {res:?}");
        };
        assert_eq!(action.payload()["card_indices"], json!([1, 2]));
        let melded: Vec<String> = [1, 2]
            .iter()
            .map(|&i| rec.local_hand()[i].key())
            .collect();
        assert_eq!(melded, ["hearts_5", "hearts_6"]);
    }

    #[test]
    fn test_dragging_unselected_card_plays_only_it() {
        let mut rec = reconciler("1", three_cards(), json!({}));
        let r = resolver(Variant::Rummy);
        r.resolve(&Gesture::click(Place::Hand(2)), &mut rec).unwrap();

        let res = r
            .resolve(
                &Gesture::drop(Place::Hand(0), Place::Zone(ZoneRef::new(ZoneKind::Discard))),
                &mut rec,
            )
            .unwrap();
        let Resolution::Dispatch(action) = res else {
            panic!("expected Dispatch");
        };
        assert_eq!(action.payload()["card_index"], 0);
    }

    #[test]
    fn test_non_consuming_action_keeps_selection() {
        let mut rec = reconciler("1", three_cards(), json!({}));
        let r = resolver(Variant::GoFish);
        r.resolve(&Gesture::click(Place::Hand(0)), &mut rec).unwrap();

        let res = r
            .resolve(
                &Gesture::drop(
                    Place::Hand(0),
                    Place::Zone(ZoneRef::with_id(ZoneKind::Player, "2")),
                ),
                &mut rec,
            )
            .unwrap();
        assert!(matches!(res, Resolution::Dispatch(_)));
        assert_eq!(rec.selection().indices(), [0]);
    }

    #[test]
    fn test_drop_uses_server_index_after_reorder() {
        let mut rec = reconciler("1", three_cards(), json!({}));
        let r = resolver(Variant::Spades);
        r.resolve(&Gesture::drop(Place::Hand(2), Place::Hand(0)), &mut rec)
            .unwrap();

        let res = r
            .resolve(
                &Gesture::drop(Place::Hand(0), Place::Zone(ZoneRef::new(ZoneKind::Center))),
                &mut rec,
            )
            .unwrap();
        let Resolution::Dispatch(action) = res else {
            panic!("expected Dispatch");
        };
        assert_eq!(action.payload()["card_index"], 2);
    }

    #[test]
    fn test_state_variant_wins_over_fallback() {
        let mut rec = reconciler("1", three_cards(), json!({"game_type": "kings_corner"}));
        let res = resolver(Variant::Snap)
            .resolve(
                &Gesture::drop(
                    Place::Hand(0),
                    Place::Zone(ZoneRef::with_id(ZoneKind::Foundation, "foundation_1")),
                ),
                &mut rec,
            )
            .unwrap();
        let Resolution::Dispatch(action) = res else {
            panic!("expected Dispatch");
        };
        assert_eq!(action.payload()["pile_id"], "foundation_1");
    }

    // =====================================================================
    // Rule 3: selection
    // =====================================================================

    #[test]
    fn test_click_toggles_selection() {
        let mut rec = reconciler("1", three_cards(), json!({}));
        let r = resolver(Variant::Rummy);
        assert_eq!(
            r.resolve(&Gesture::click(Place::Hand(0)), &mut rec).unwrap(),
            Resolution::SelectionChanged
        );
        assert_eq!(rec.selection().indices(), [0]);
        r.resolve(&Gesture::click(Place::Hand(0)), &mut rec).unwrap();
        assert!(rec.selection().is_empty());
    }

    #[test]
    fn test_click_past_bound_is_an_error() {
        let mut rec = reconciler(
            "1",
            json!([
                {"suit": "hearts", "rank": "5"},
                {"suit": "hearts", "rank": "6"},
                {"suit": "hearts", "rank": "7"}
            ]),
            json!({}),
        );
        let r = resolver(Variant::Rummy);
        r.resolve(&Gesture::click(Place::Hand(0)), &mut rec).unwrap();
        r.resolve(&Gesture::click(Place::Hand(1)), &mut rec).unwrap();
        let err = r
            .resolve(&Gesture::click(Place::Hand(2)), &mut rec)
            .unwrap_err();
        assert_eq!(err, InteractionError::SelectionLimit { max: 2 });
        assert_eq!(rec.selection().indices(), [0, 1]);
    }

    // =====================================================================
    // Rule 4: off-turn and face-down
    // =====================================================================

    #[test]
    fn test_off_turn_gestures_are_ignored() {
        let mut rec = reconciler("2", three_cards(), json!({}));
        let r = resolver(Variant::Rummy);
        assert_eq!(
            r.resolve(&Gesture::click(Place::Hand(0)), &mut rec).unwrap(),
            Resolution::Ignored(Ignored::NotYourTurn)
        );
        assert_eq!(
            r.resolve(
                &Gesture::drop(Place::Hand(0), Place::Zone(ZoneRef::new(ZoneKind::Discard))),
                &mut rec
            )
            .unwrap(),
            Resolution::Ignored(Ignored::NotYourTurn)
        );
    }

    #[test]
    fn test_face_down_cards_are_ignored() {
        let mut rec = reconciler("1", three_cards(), json!({}));
        let r = resolver(Variant::Rummy);
        assert_eq!(
            r.resolve(&Gesture::click(Place::Hand(1)), &mut rec).unwrap(),
            Resolution::Ignored(Ignored::FaceDown)
        );
        assert!(rec.selection().is_empty());
    }

    #[test]
    fn test_nothing_resolves_before_state() {
        let mut rec = Reconciler::new(PlayerId::from("1"));
        let r = resolver(Variant::Snap);
        assert_eq!(
            r.resolve(&Gesture::click(Place::Hand(0)), &mut rec).unwrap(),
            Resolution::Ignored(Ignored::NoState)
        );
        assert_eq!(
            r.resolve_command(&Command::Snap, &mut rec),
            Resolution::Ignored(Ignored::NoState)
        );
    }

    // =====================================================================
    // Commands
    // =====================================================================

    #[test]
    fn test_races_bypass_turn_gate() {
        let mut rec = reconciler("2", three_cards(), json!({}));
        let res = resolver(Variant::Snap).resolve_command(&Command::Snap, &mut rec);
        assert_eq!(res, Resolution::Dispatch(GameAction::new(ActionType::Snap)));
    }

    #[test]
    fn test_turn_commands_wait_for_turn() {
        let mut rec = reconciler("2", three_cards(), json!({}));
        let r = resolver(Variant::Scat);
        assert_eq!(
            r.resolve_command(&Command::Knock, &mut rec),
            Resolution::Ignored(Ignored::NotYourTurn)
        );

        let mut rec = reconciler("1", three_cards(), json!({}));
        assert_eq!(
            r.resolve_command(&Command::Knock, &mut rec),
            Resolution::Dispatch(GameAction::new(ActionType::Knock))
        );
    }

    #[test]
    fn test_command_unknown_to_variant_is_ignored() {
        let mut rec = reconciler("1", three_cards(), json!({}));
        assert_eq!(
            resolver(Variant::GoFish).resolve_command(&Command::Knock, &mut rec),
            Resolution::Ignored(Ignored::NoMapping)
        );
    }
}
