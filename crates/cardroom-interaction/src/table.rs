//! The variant action table: which drops and commands each game accepts,
//! and the action each one builds.
//!
//! Every variant implements [`VariantActions`] in its own module under
//! `variants/`. The table only looks rules up; it never branches on a
//! particular variant. Adding a game means adding an entry.

use std::collections::HashMap;

use cardroom_protocol::{Card, GameAction, PlayerId, Variant};
use cardroom_state::GameState;

use crate::{Command, CommandKind, ZoneKind, ZoneRef, variants};

/// Everything a builder may look at when mapping a drop.
#[derive(Debug, Clone, Copy)]
pub struct DropContext<'a> {
    /// Server hand indices being played, in pick order. Empty when the
    /// drag started on a board zone.
    pub cards: &'a [usize],
    /// The zone the drag started on, if it didn't start in the hand.
    pub origin: Option<&'a ZoneRef>,
    pub target: &'a ZoneRef,
    pub state: &'a GameState,
    pub local_player: &'a PlayerId,
}

impl DropContext<'_> {
    /// The card the gesture is primarily about.
    pub fn first_card(&self) -> Option<usize> {
        self.cards.first().copied()
    }

    /// A card in the local hand by server index.
    pub fn card(&self, index: usize) -> Option<&Card> {
        self.state.hand_of(self.local_player).get(index)
    }
}

/// The rules one variant contributes to the table.
///
/// `zone_kinds` and `command_kinds` declare what the variant accepts. The
/// builders are only called for kinds the variant declared and may still
/// return `None` when the gesture lacks something the action needs.
pub trait VariantActions: Send + Sync + 'static {
    fn variant(&self) -> Variant;

    /// Zone kinds this variant accepts drops on.
    fn zone_kinds(&self) -> &'static [ZoneKind];

    /// Builds the action for a drop on one of `zone_kinds`.
    fn build_drop(&self, drop: &DropContext<'_>) -> Option<GameAction>;

    /// Commands this variant understands. Default: none.
    fn command_kinds(&self) -> &'static [CommandKind] {
        &[]
    }

    /// Builds the action for one of `command_kinds`.
    fn build_command(
        &self,
        _command: &Command,
        _state: &GameState,
    ) -> Option<GameAction> {
        None
    }
}

/// Lookup from variant to its rules.
pub struct ActionTable {
    variants: HashMap<Variant, Box<dyn VariantActions>>,
}

impl ActionTable {
    /// A table with no variants.
    pub fn empty() -> Self {
        Self {
            variants: HashMap::new(),
        }
    }

    /// A table with every built-in variant.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        variants::register_all(&mut table);
        table
    }

    /// Adds a variant's rules.
    ///
    /// Returns `false` and leaves the table alone if the variant already
    /// has rules: entries are added, never replaced.
    pub fn register(&mut self, rules: impl VariantActions) -> bool {
        let variant = rules.variant();
        if self.variants.contains_key(&variant) {
            return false;
        }
        self.variants.insert(variant, Box::new(rules));
        true
    }

    pub fn contains(&self, variant: Variant) -> bool {
        self.variants.contains_key(&variant)
    }

    /// Whether `variant` accepts drops on `kind`.
    pub fn accepts(&self, variant: Variant, kind: ZoneKind) -> bool {
        self.variants
            .get(&variant)
            .is_some_and(|rules| rules.zone_kinds().contains(&kind))
    }

    /// Maps a drop to an action, or `None` when the pair is unmapped.
    pub fn map_drop(
        &self,
        variant: Variant,
        drop: &DropContext<'_>,
    ) -> Option<GameAction> {
        let rules = self.variants.get(&variant)?;
        if !rules.zone_kinds().contains(&drop.target.kind) {
            return None;
        }
        rules.build_drop(drop)
    }

    /// Maps a command to an action, or `None` when the pair is unmapped.
    pub fn map_command(
        &self,
        variant: Variant,
        command: &Command,
        state: &GameState,
    ) -> Option<GameAction> {
        let rules = self.variants.get(&variant)?;
        if !rules.command_kinds().contains(&command.kind()) {
            return None;
        }
        rules.build_command(command, state)
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ActionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut variants: Vec<_> = self.variants.keys().collect();
        variants.sort();
        f.debug_struct("ActionTable")
            .field("variants", &variants)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use cardroom_protocol::ActionType;

    use super::*;

    struct Always;

    impl VariantActions for Always {
        fn variant(&self) -> Variant {
            Variant::Snap
        }
        fn zone_kinds(&self) -> &'static [ZoneKind] {
            &[ZoneKind::Discard]
        }
        fn build_drop(&self, _drop: &DropContext<'_>) -> Option<GameAction> {
            Some(GameAction::new(ActionType::Knock))
        }
    }

    #[test]
    fn test_standard_table_covers_every_variant() {
        let table = ActionTable::standard();
        for variant in Variant::ALL {
            assert!(table.contains(variant), "{variant} missing");
        }
    }

    #[test]
    fn test_register_never_replaces() {
        let mut table = ActionTable::standard();
        assert!(!table.register(Always));
        assert!(!table.accepts(Variant::Snap, ZoneKind::Discard));

        let mut empty = ActionTable::empty();
        assert!(empty.register(Always));
        assert!(empty.accepts(Variant::Snap, ZoneKind::Discard));
    }

    #[test]
    fn test_undeclared_zone_maps_to_nothing() {
        let mut table = ActionTable::empty();
        table.register(Always);
        let state = GameState::default();
        let me = PlayerId::from("1");
        let target = ZoneRef::new(ZoneKind::Center);
        let drop = DropContext {
            cards: &[0],
            origin: None,
            target: &target,
            state: &state,
            local_player: &me,
        };
        assert_eq!(table.map_drop(Variant::Snap, &drop), None);
        assert_eq!(table.map_drop(Variant::Rummy, &drop), None);
    }
}
