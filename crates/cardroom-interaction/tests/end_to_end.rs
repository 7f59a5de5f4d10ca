//! Snapshot → click → drop → action, the full local path of a turn.

use cardroom_interaction::{
    ActionTable, Gesture, Place, Resolution, Resolver, ZoneKind, ZoneRef,
};
use cardroom_protocol::{
    ActionType, GameAction, JsonCodec, PlayerId, ServerEvent, decode_event,
};
use cardroom_state::Reconciler;
use serde_json::json;

fn snapshot(rec: &mut Reconciler, frame: serde_json::Value) {
    let bytes = serde_json::to_vec(&frame).unwrap();
    let ServerEvent::Snapshot { state, variant } =
        decode_event(&JsonCodec, &bytes).unwrap()
    else {
        panic!("expected a snapshot");
    };
    rec.apply_snapshot(state, variant);
}

#[test]
fn test_click_then_drop_on_discard_sends_discard_and_clears_selection() {
    let mut rec = Reconciler::new(PlayerId::from("1"));
    let resolver = Resolver::new(ActionTable::standard());

    // Opponents hold nothing; the local player holds one face-up card.
    snapshot(
        &mut rec,
        json!({
            "type": "game_state",
            "game_type": "rummy",
            "state": {
                "state": "playing",
                "current_player": "1",
                "players": {
                    "1": {"hand": [{"suit": "diamonds", "rank": "8"}], "hand_size": 1},
                    "2": {"hand": [], "hand_size": 0}
                }
            }
        }),
    );
    assert!(rec.is_local_turn());

    let res = resolver
        .resolve(&Gesture::click(Place::Hand(0)), &mut rec)
        .unwrap();
    assert_eq!(res, Resolution::SelectionChanged);
    assert_eq!(rec.selection().indices(), [0]);

    let res = resolver
        .resolve(
            &Gesture::drop(Place::Hand(0), Place::Zone(ZoneRef::new(ZoneKind::Discard))),
            &mut rec,
        )
        .unwrap();
    assert_eq!(
        res,
        Resolution::Dispatch(
            GameAction::new(ActionType::DiscardCard).with("card_index", 0)
        )
    );
    assert!(rec.selection().is_empty());
}

#[test]
fn test_kings_corner_pile_move_from_board() {
    let mut rec = Reconciler::new(PlayerId::from("1"));
    let resolver = Resolver::new(ActionTable::standard());
    snapshot(
        &mut rec,
        json!({
            "type": "game_state",
            "game_type": "kings_corner",
            "state": {
                "state": "playing",
                "current_player": "1",
                "players": {"1": {"hand": [{"suit": "hearts", "rank": "K"}]}},
                "piles": {"foundation_0": [], "corner_0": []},
                "pile_types": {"foundation_0": "foundation", "corner_0": "corner"}
            }
        }),
    );

    let res = resolver
        .resolve(
            &Gesture::drop(
                Place::Zone(ZoneRef::with_id(ZoneKind::Foundation, "foundation_0")),
                Place::Zone(ZoneRef::with_id(ZoneKind::Corner, "corner_0")),
            ),
            &mut rec,
        )
        .unwrap();
    assert_eq!(
        res,
        Resolution::Dispatch(
            GameAction::new(ActionType::MovePile)
                .with("source_pile_id", "foundation_0")
                .with("target_pile_id", "corner_0")
        )
    );
}
