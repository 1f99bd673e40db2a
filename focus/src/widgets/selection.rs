//! Selection state for checkable item containers.

use std::collections::HashSet;
use std::hash::Hash;

/// How many items may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Items cannot be selected.
    #[default]
    None,
    /// At most one item (radio-button style).
    Single,
    /// Any number of items (checkbox style).
    Multi,
}

impl SelectionMode {
    /// Mode named by a `checkable` descriptor value. Anything other than
    /// `"single"` or `"multiple"` disables selection.
    pub fn from_checkable(value: &str) -> Self {
        match value {
            "single" => Self::Single,
            "multiple" => Self::Multi,
            _ => Self::None,
        }
    }
}

/// Tracks selected items by their keys.
#[derive(Debug, Clone)]
pub struct Selection<K: Clone + Eq + Hash> {
    pub mode: SelectionMode,
    pub selected: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self::new(SelectionMode::None)
    }
}

impl<K: Clone + Eq + Hash> Selection<K> {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: HashSet::new(),
        }
    }

    /// Toggle selection for a key. Returns true if the selection changed.
    pub fn toggle(&mut self, key: K) -> bool {
        match self.mode {
            SelectionMode::None => false,
            SelectionMode::Single => {
                let was_selected = self.selected.contains(&key);
                self.selected.clear();
                if !was_selected {
                    self.selected.insert(key);
                }
                true
            }
            SelectionMode::Multi => {
                if !self.selected.remove(&key) {
                    self.selected.insert(key);
                }
                true
            }
        }
    }

    /// Select a key. In single mode every other key is deselected first.
    pub fn select(&mut self, key: K) -> bool {
        match self.mode {
            SelectionMode::None => false,
            SelectionMode::Single => {
                if self.selected.len() == 1 && self.selected.contains(&key) {
                    return false;
                }
                self.selected.clear();
                self.selected.insert(key)
            }
            SelectionMode::Multi => self.selected.insert(key),
        }
    }

    pub fn deselect(&mut self, key: &K) -> bool {
        self.selected.remove(key)
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The selected key in single mode.
    pub fn get_single(&self) -> Option<&K> {
        self.selected.iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_toggle_replaces() {
        let mut sel = Selection::new(SelectionMode::Single);
        sel.toggle(1);
        sel.toggle(2);
        assert_eq!(sel.len(), 1);
        assert!(sel.is_selected(&2));
        assert_eq!(sel.get_single(), Some(&2));
        sel.toggle(2);
        assert!(sel.is_empty());
        assert_eq!(sel.get_single(), None);
    }

    #[test]
    fn none_mode_ignores_everything() {
        let mut sel = Selection::new(SelectionMode::None);
        assert!(!sel.toggle(1));
        assert!(!sel.select(1));
        assert!(sel.is_empty());
    }

    #[test]
    fn checkable_values() {
        assert_eq!(SelectionMode::from_checkable("single"), SelectionMode::Single);
        assert_eq!(SelectionMode::from_checkable("multiple"), SelectionMode::Multi);
        assert_eq!(SelectionMode::from_checkable("yes"), SelectionMode::None);
    }
}
