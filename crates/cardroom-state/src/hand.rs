//! Player-controlled ordering of the local hand.
//!
//! The server hands out the local player's cards as an array in its own
//! order. Players rearrange them by dragging, and the server never hears
//! about it. [`HandOrder`] keeps that arrangement as a list of stable card
//! identifiers and survives state refreshes that don't change what is in
//! the hand.
//!
//! ```text
//! server hand:  [7♥, A♠, 7♥]
//! identifiers:  hearts_7_0, spades_A_0, hearts_7_1
//! after a drag: spades_A_0, hearts_7_0, hearts_7_1
//! ```
//!
//! Duplicate cards (multi-deck games) are told apart by the occurrence
//! suffix: the n-th copy of a card in server order is occurrence n.

use std::collections::BTreeMap;
use std::fmt;

use cardroom_protocol::Card;

/// A stable local identifier for one card in the hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId {
    key: String,
    occurrence: usize,
}

impl CardId {
    /// The canonical card key, without the occurrence (`"hearts_7"`).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn occurrence(&self) -> usize {
        self.occurrence
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.key, self.occurrence)
    }
}

/// The local display order of the player's hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandOrder {
    entries: Vec<CardId>,
}

impl HandOrder {
    /// Identifiers for `hand` in the server's order.
    pub fn from_hand(hand: &[Card]) -> Self {
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        let entries = hand
            .iter()
            .map(|card| {
                let key = card.key();
                let count = seen.entry(key.clone()).or_insert(0);
                let id = CardId {
                    key,
                    occurrence: *count,
                };
                *count += 1;
                id
            })
            .collect();
        Self { entries }
    }

    /// Reconciles this order against a new server hand.
    ///
    /// Returns `self` unchanged when the hand holds the same cards (in any
    /// order). Otherwise cards were drawn, played or discarded, and the
    /// order is rebuilt from the server's sequence.
    ///
    /// "The same cards" means the same keys the same number of times, so
    /// every entry always resolves to a position in `hand`.
    pub fn reconcile(&self, hand: &[Card]) -> Self {
        if self.matches(hand) {
            self.clone()
        } else {
            Self::from_hand(hand)
        }
    }

    /// Whether `reconcile` would keep this order for `hand`.
    pub fn matches(&self, hand: &[Card]) -> bool {
        self.entries.len() == hand.len()
            && key_counts_of(&self.entries) == key_counts(hand)
    }

    pub fn entries(&self) -> &[CardId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves the entry at display position `from` to position `to`.
    ///
    /// Returns `false` (and changes nothing) when either position is out
    /// of range.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() || to >= self.entries.len() {
            return false;
        }
        if from != to {
            let entry = self.entries.remove(from);
            self.entries.insert(to, entry);
        }
        true
    }

    /// Maps a display position to the index of that card in `hand`.
    ///
    /// Outbound actions reference cards by server index, so this is how a
    /// gesture on the displayed hand becomes a payload.
    pub fn server_index(&self, position: usize, hand: &[Card]) -> Option<usize> {
        Self::locate(self.entries.get(position)?, hand)
    }

    /// The index of the card `id` names in `hand`, if it is there.
    pub fn locate(id: &CardId, hand: &[Card]) -> Option<usize> {
        hand.iter()
            .enumerate()
            .filter(|(_, card)| card.key() == id.key)
            .nth(id.occurrence)
            .map(|(index, _)| index)
    }

    /// The hand in display order, each card paired with its server index.
    pub fn arrange<'a>(&self, hand: &'a [Card]) -> Vec<(usize, &'a Card)> {
        (0..self.entries.len())
            .filter_map(|pos| {
                let index = self.server_index(pos, hand)?;
                hand.get(index).map(|card| (index, card))
            })
            .collect()
    }
}

fn key_counts(hand: &[Card]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for card in hand {
        *counts.entry(card.key()).or_insert(0) += 1;
    }
    counts
}

fn key_counts_of(entries: &[CardId]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.key.clone()).or_insert(0) += 1;
    }
    counts
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use cardroom_protocol::{Rank, Suit};

    use super::*;

    fn a() -> Card {
        Card::new(Suit::Spades, Rank::Ace)
    }
    fn b() -> Card {
        Card::new(Suit::Hearts, Rank::Seven)
    }
    fn c() -> Card {
        Card::new(Suit::Clubs, Rank::King)
    }
    fn d() -> Card {
        Card::new(Suit::Diamonds, Rank::Two)
    }

    fn ids(order: &HandOrder) -> Vec<String> {
        order.entries().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_from_hand_numbers_duplicates_by_occurrence() {
        let order = HandOrder::from_hand(&[b(), a(), b()]);
        assert_eq!(ids(&order), ["hearts_7_0", "spades_A_0", "hearts_7_1"]);
    }

    #[test]
    fn test_reconcile_same_cards_any_order_keeps_prior_order() {
        let prior = HandOrder::from_hand(&[a(), b(), c()]);
        for hand in [[a(), b(), c()], [c(), a(), b()], [b(), c(), a()]] {
            assert_eq!(prior.reconcile(&hand), prior);
        }
    }

    #[test]
    fn test_reconcile_keeps_manual_reordering() {
        let mut prior = HandOrder::from_hand(&[a(), b(), c()]);
        assert!(prior.move_entry(2, 0));
        let after = prior.reconcile(&[a(), b(), c()]);
        assert_eq!(ids(&after), ["clubs_K_0", "spades_A_0", "hearts_7_0"]);
    }

    #[test]
    fn test_reconcile_changed_cards_resets_to_server_order() {
        let mut prior = HandOrder::from_hand(&[a(), b(), c()]);
        prior.move_entry(0, 2);
        let after = prior.reconcile(&[d(), a(), b()]);
        assert_eq!(after, HandOrder::from_hand(&[d(), a(), b()]));
    }

    #[test]
    fn test_reconcile_count_change_resets() {
        let prior = HandOrder::from_hand(&[a(), b()]);
        let after = prior.reconcile(&[a(), b(), b()]);
        assert_eq!(ids(&after), ["spades_A_0", "hearts_7_0", "hearts_7_1"]);
    }

    #[test]
    fn test_reconcile_same_keys_different_multiplicity_resets() {
        let prior = HandOrder::from_hand(&[a(), a(), b()]);
        let after = prior.reconcile(&[a(), b(), b()]);
        assert_eq!(after, HandOrder::from_hand(&[a(), b(), b()]));
    }

    #[test]
    fn test_move_entry_out_of_range_is_refused() {
        let mut order = HandOrder::from_hand(&[a(), b()]);
        let before = order.clone();
        assert!(!order.move_entry(0, 5));
        assert_eq!(order, before);
    }

    #[test]
    fn test_server_index_follows_identity_not_position() {
        let hand = [a(), b(), c()];
        let mut order = HandOrder::from_hand(&hand);
        order.move_entry(2, 0);
        assert_eq!(order.server_index(0, &hand), Some(2));
        assert_eq!(order.server_index(1, &hand), Some(0));
        assert_eq!(order.server_index(3, &hand), None);

        // The server reshuffles its array; identities still resolve.
        let reshuffled = [c(), b(), a()];
        let order = order.reconcile(&reshuffled);
        assert_eq!(order.server_index(0, &reshuffled), Some(0));
        assert_eq!(order.server_index(1, &reshuffled), Some(2));
    }

    #[test]
    fn test_arrange_pairs_cards_with_server_indices() {
        let hand = [a(), b()];
        let mut order = HandOrder::from_hand(&hand);
        order.move_entry(1, 0);
        let arranged = order.arrange(&hand);
        assert_eq!(arranged, vec![(1, &b()), (0, &a())]);
    }

    #[test]
    fn test_face_down_cards_share_one_key() {
        let order = HandOrder::from_hand(&[Card::Back, Card::Back]);
        assert_eq!(ids(&order), ["back_0", "back_1"]);
    }
}
