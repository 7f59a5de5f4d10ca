//! The local player's chosen, not yet submitted, hand cards.

use crate::InteractionError;

/// Selected hand cards, by server hand index, in the order they were
/// picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `index` if absent, removes it if present.
    ///
    /// # Errors
    /// Returns [`InteractionError::SelectionLimit`] when adding would take
    /// the selection past `max`. The selection is left unchanged.
    pub fn toggle(&mut self, index: usize, max: usize) -> Result<(), InteractionError> {
        if let Some(pos) = self.indices.iter().position(|&i| i == index) {
            self.indices.remove(pos);
            return Ok(());
        }
        if self.indices.len() >= max {
            return Err(InteractionError::SelectionLimit { max });
        }
        self.indices.push(index);
        Ok(())
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The first selected index, if any.
    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Rewrites every index through `f`, keeping pick order. Indices `f`
    /// maps to `None` are dropped.
    pub fn remap(&mut self, mut f: impl FnMut(usize) -> Option<usize>) {
        self.indices = self.indices.iter().filter_map(|&i| f(i)).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut sel = Selection::new();
        sel.toggle(2, 3).unwrap();
        assert_eq!(sel.indices(), [2]);
        sel.toggle(2, 3).unwrap();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_toggle_past_bound_is_an_error_and_changes_nothing() {
        let mut sel = Selection::new();
        sel.toggle(0, 1).unwrap();
        let err = sel.toggle(1, 1).unwrap_err();
        assert_eq!(err, InteractionError::SelectionLimit { max: 1 });
        assert_eq!(sel.indices(), [0]);
    }

    #[test]
    fn test_deselect_is_allowed_at_the_bound() {
        let mut sel = Selection::new();
        sel.toggle(0, 1).unwrap();
        sel.toggle(0, 1).unwrap();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_keeps_pick_order() {
        let mut sel = Selection::new();
        for i in [4, 1, 3] {
            sel.toggle(i, 5).unwrap();
        }
        assert_eq!(sel.indices(), [4, 1, 3]);
        assert_eq!(sel.first(), Some(4));
    }

    #[test]
    fn test_remap_keeps_pick_order_and_drops_unmapped() {
        let mut sel = Selection::new();
        for i in [2, 0, 1] {
            sel.toggle(i, 3).unwrap();
        }
        sel.remap(|i| (i != 0).then_some(i + 10));
        assert_eq!(sel.indices(), [12, 11]);
    }
}
