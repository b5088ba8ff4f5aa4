use std::collections::BTreeSet;

use kpp_core::SelectionMode;

/// Ids whose highlight changed as the result of one selection operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionChange {
    pub selected: Vec<String>,
    pub deselected: Vec<String>,
}

impl SelectionChange {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.deselected.is_empty()
    }

    /// Every id that changed, paired with its new highlight state.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.deselected
            .iter()
            .map(|id| (id.as_str(), false))
            .chain(self.selected.iter().map(|id| (id.as_str(), true)))
    }
}

/// The set of highlighted checkpoint ids.
///
/// Ids survive filtering: a selected checkpoint that drops out of the view is
/// still selected when it comes back.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    mode: SelectionMode,
    ids: BTreeSet<String>,
}

impl Selection {
    #[must_use]
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ids: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Flips membership of `id`. In single mode, selecting an id also drops
    /// whatever was selected before.
    pub fn toggle(&mut self, id: &str) -> SelectionChange {
        let mut change = SelectionChange::default();

        if self.ids.remove(id) {
            change.deselected.push(id.to_string());
            return change;
        }

        if self.mode == SelectionMode::Single {
            change.deselected.extend(std::mem::take(&mut self.ids));
        }
        self.ids.insert(id.to_string());
        change.selected.push(id.to_string());
        change
    }

    /// Empties the set, returning the ids that were selected.
    pub fn clear(&mut self) -> Vec<String> {
        std::mem::take(&mut self.ids).into_iter().collect()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
