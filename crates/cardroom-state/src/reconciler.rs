//! The state reconciler: merges server snapshots and deltas into the one
//! canonical [`GameState`].
//!
//! # Snapshot vs delta
//!
//! A snapshot replaces everything. A delta is merged into the prior state:
//!
//! 1. `status` and `last_action` take the delta's value when present.
//! 2. Each player present in the delta replaces that player's record
//!    wholesale. Partial records are never field-merged.
//! 3. Every record is normalized: missing hand → `[]`, missing hand size
//!    → `0`, id → the map key.
//! 4. `current_player` comes from the delta if present (an explicit
//!    `null` clears it), otherwise it is kept.
//! 5. `is_local_turn` is recomputed.
//! 6. If the local player just lost the turn, the selection is cleared.
//!
//! A delta that arrives before any snapshot is applied as a snapshot.
//!
//! The reconciler also owns the two pieces of local-only state that must
//! follow the canonical state: the [`Selection`] and the [`HandOrder`].

use std::collections::BTreeMap;
use std::sync::Arc;

use cardroom_protocol::{
    Card, PlayerId, PlayerRecord, StatePatch, Status, Variant, Winner,
};
use tracing::{debug, warn};

use crate::{
    DEFAULT_MAX_SELECTABLE, GameOutcome, GameState, HandOrder,
    InteractionError, PlayerView, Selection, StateError,
};

/// What an apply changed, for the caller's logging and notices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applied {
    /// `is_local_turn` flipped.
    pub turn_changed: bool,
    /// The local hand's contents changed and its order was rebuilt.
    pub hand_reset: bool,
    /// The new state breaks a turn invariant. It was applied anyway.
    pub violation: Option<StateError>,
}

/// Owner of the canonical state for one local player.
#[derive(Debug)]
pub struct Reconciler {
    local_player: PlayerId,
    state: Option<Arc<GameState>>,
    is_local_turn: bool,
    selection: Selection,
    hand_order: HandOrder,
}

impl Reconciler {
    pub fn new(local_player: PlayerId) -> Self {
        Self {
            local_player,
            state: None,
            is_local_turn: false,
            selection: Selection::new(),
            hand_order: HandOrder::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    pub fn local_player(&self) -> &PlayerId {
        &self.local_player
    }

    /// The canonical state, once the first snapshot has arrived.
    pub fn state(&self) -> Option<&Arc<GameState>> {
        self.state.as_ref()
    }

    /// Whether the local player holds the turn.
    ///
    /// Derived after every apply; this is the only place it is computed.
    pub fn is_local_turn(&self) -> bool {
        self.is_local_turn
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn hand_order(&self) -> &HandOrder {
        &self.hand_order
    }

    /// The local player's hand in server order.
    pub fn local_hand(&self) -> &[Card] {
        self.state
            .as_deref()
            .map(|s| s.hand_of(&self.local_player))
            .unwrap_or_default()
    }

    /// The current selection bound.
    pub fn max_selectable(&self) -> usize {
        self.state
            .as_deref()
            .map_or(DEFAULT_MAX_SELECTABLE, |s| s.max_selectable_cards)
    }

    // -----------------------------------------------------------------------
    // Server-driven applies
    // -----------------------------------------------------------------------

    /// Replaces the state wholesale.
    ///
    /// `variant` is the one the frame named; when it names none, the
    /// previously known variant is kept.
    pub fn apply_snapshot(
        &mut self,
        patch: StatePatch,
        variant: Option<Variant>,
    ) -> Applied {
        let known = self.state.as_deref().and_then(|s| s.variant);
        let next = snapshot_state(patch, variant.or(known));
        debug!(
            players = next.players.len(),
            status = %next.status,
            "snapshot applied"
        );
        self.publish(next)
    }

    /// Merges a partial update into the prior state.
    pub fn apply_delta(&mut self, patch: StatePatch) -> Applied {
        let Some(prior) = self.state.as_deref() else {
            debug!("delta before any snapshot, applying as snapshot");
            return self.apply_snapshot(patch, None);
        };

        let mut next = prior.clone();
        merge_delta(&mut next, patch);
        debug!(status = %next.status, "delta applied");
        self.publish(next)
    }

    /// A new game began with the given initial state.
    pub fn apply_game_started(
        &mut self,
        patch: StatePatch,
        variant: Variant,
    ) -> Applied {
        let next = snapshot_state(patch, Some(variant));
        debug!(%variant, "game started");
        self.publish(next)
    }

    /// The game ended. Nobody holds the turn afterwards.
    pub fn apply_game_over(
        &mut self,
        scores: BTreeMap<PlayerId, i64>,
        winner: Option<Winner>,
    ) -> Applied {
        let mut next = self.state.as_deref().cloned().unwrap_or_default();
        next.status = Status::Over;
        next.current_player = None;
        next.outcome = Some(GameOutcome { scores, winner });
        self.publish(next)
    }

    /// Removes a departed player's record.
    pub fn apply_player_left(
        &mut self,
        player: &PlayerId,
        game_ended: bool,
    ) -> Applied {
        let mut next = self.state.as_deref().cloned().unwrap_or_default();
        next.players.remove(player);
        if game_ended {
            next.status = Status::Over;
            next.current_player = None;
        }
        debug!(%player, game_ended, "player removed");
        self.publish(next)
    }

    // -----------------------------------------------------------------------
    // Local-only changes
    // -----------------------------------------------------------------------

    /// Toggles a hand card (by server index) in the selection.
    ///
    /// # Errors
    /// Returns [`InteractionError::SelectionLimit`] when selecting would
    /// exceed the server's bound.
    pub fn toggle_selection(
        &mut self,
        index: usize,
    ) -> Result<(), InteractionError> {
        let max = self.max_selectable();
        self.selection.toggle(index, max)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Moves a card within the displayed hand. Positions are display
    /// positions, not server indices.
    pub fn reorder_hand(&mut self, from: usize, to: usize) -> bool {
        self.hand_order.move_entry(from, to)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    /// Installs `next` as the canonical state and updates everything
    /// derived from it.
    fn publish(&mut self, next: GameState) -> Applied {
        let was_turn = self.is_local_turn;
        let is_turn = next.current_player.as_ref() == Some(&self.local_player);

        let hand = next.hand_of(&self.local_player);
        let order = self.hand_order.reconcile(hand);
        let hand_reset = order != self.hand_order;
        if hand_reset {
            // Indices now point into a different hand.
            self.selection.clear();
        } else {
            let prior = self
                .state
                .as_deref()
                .map(|s| s.hand_of(&self.local_player))
                .unwrap_or_default();
            follow_server_order(&mut self.selection, prior, hand);
        }
        self.hand_order = order;
        if was_turn && !is_turn {
            self.selection.clear();
        }
        if self.selection.len() > next.max_selectable_cards {
            debug!(
                selected = self.selection.len(),
                max = next.max_selectable_cards,
                "selection bound lowered, clearing selection"
            );
            self.selection.clear();
        }

        let violation = next.check().err();
        if let Some(e) = &violation {
            warn!(error = %e, "server state breaks a turn invariant");
        }

        self.is_local_turn = is_turn;
        self.state = Some(Arc::new(next));

        Applied {
            turn_changed: was_turn != is_turn,
            hand_reset,
            violation,
        }
    }
}

/// Re-points selected indices at the same cards after the server sent the
/// hand in a different order.
fn follow_server_order(selection: &mut Selection, prior: &[Card], hand: &[Card]) {
    if selection.is_empty() || prior == hand {
        return;
    }
    let ids = HandOrder::from_hand(prior);
    selection.remap(|index| {
        let id = ids.entries().get(index)?;
        HandOrder::locate(id, hand)
    });
}

fn snapshot_state(patch: StatePatch, variant: Option<Variant>) -> GameState {
    let status = patch.reported_status().unwrap_or_default();
    let variant = variant.or_else(|| parse_variant(patch.game_type.as_deref()));
    GameState {
        players: normalize_players(patch.players.unwrap_or_default()),
        current_player: patch.current_player.flatten(),
        variant_state: patch.variant_state,
        last_action: patch.last_action.flatten(),
        status,
        max_selectable_cards: patch
            .max_selectable_cards
            .unwrap_or(DEFAULT_MAX_SELECTABLE),
        variant,
        outcome: None,
    }
}

fn merge_delta(next: &mut GameState, patch: StatePatch) {
    if let Some(status) = patch.reported_status() {
        next.status = status;
    }
    if let Some(last_action) = patch.last_action {
        next.last_action = last_action;
    }
    if let Some(players) = patch.players {
        next.players.extend(normalize_players(players));
    }
    if let Some(current) = patch.current_player {
        next.current_player = current;
    }
    if let Some(max) = patch.max_selectable_cards {
        next.max_selectable_cards = max;
    }
    if let Some(variant) = parse_variant(patch.game_type.as_deref()) {
        next.variant = Some(variant);
    }
    next.variant_state.extend(patch.variant_state);
}

fn normalize_players(
    records: BTreeMap<PlayerId, PlayerRecord>,
) -> BTreeMap<PlayerId, PlayerView> {
    records
        .into_iter()
        .map(|(id, record)| (id.clone(), PlayerView::from_record(id, record)))
        .collect()
}

fn parse_variant(name: Option<&str>) -> Option<Variant> {
    name.and_then(|n| n.parse().ok())
}

// =========================================================================
// Tests
// =========================================================================
