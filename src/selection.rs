// File: ./src/selection.rs
// Set of conference names currently enabled for display.
use std::collections::HashSet;

/// Checkbox state of a tree node over its conference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Checked,
    Unchecked,
    Indeterminate,
}

impl CheckState {
    pub fn symbol(&self) -> &'static str {
        match self {
            CheckState::Checked => "[x]",
            CheckState::Unchecked => "[ ]",
            CheckState::Indeterminate => "[-]",
        }
    }
}

/// Names are not validated against any taxonomy; a name the taxonomy does
/// not know can be selected, it just has no place in the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn names(&self) -> &HashSet<String> {
        &self.selected
    }

    /// Non-empty and every member selected.
    pub fn is_all_selected(&self, list: &[String]) -> bool {
        !list.is_empty() && list.iter().all(|c| self.selected.contains(c))
    }

    /// At least one, but not every, member selected.
    pub fn is_partially_selected(&self, list: &[String]) -> bool {
        list.iter().any(|c| self.selected.contains(c)) && !self.is_all_selected(list)
    }

    pub fn check_state(&self, list: &[String]) -> CheckState {
        if self.is_all_selected(list) {
            CheckState::Checked
        } else if self.is_partially_selected(list) {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    /// Adds or removes every name in `list`; names outside it are untouched.
    pub fn set_many(&mut self, list: &[String], included: bool) {
        for name in list {
            if included {
                self.selected.insert(name.clone());
            } else {
                self.selected.remove(name);
            }
        }
    }

    /// Flips one name. Returns whether it is selected afterwards.
    pub fn toggle_one(&mut self, name: &str) -> bool {
        if self.selected.remove(name) {
            false
        } else {
            self.selected.insert(name.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
