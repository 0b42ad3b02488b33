// File: src/controller.rs
//! Central state controller for the dashboard.
//!
//! Owns the loaded conferences, the taxonomy indices, the selection, the
//! search query and the tree expand flags. UI layers never mutate these
//! directly: every event handler calls one of the methods below, and every
//! mutating method returns the freshly recomputed display list.
use crate::loader::Dataset;
use crate::model::{ConferenceInstance, TaxonomyIndex};
use crate::selection::{CheckState, Selection};
use crate::store::{ConferenceStore, FilterOptions};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct TaxonomyView {
    pub name: String,
    pub index: TaxonomyIndex,
}

/// One visible line of the selection tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    ParentArea { name: String, color_index: usize },
    Area { title: String, code: String },
    Conference { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub node: TreeNode,
    pub depth: usize,
    pub check: CheckState,
    /// `None` for leaves.
    pub expanded: Option<bool>,
}

impl TreeRow {
    pub fn label(&self) -> &str {
        match &self.node {
            TreeNode::ParentArea { name, .. } => name,
            TreeNode::Area { title, .. } => title,
            TreeNode::Conference { name } => name,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardController {
    store: ConferenceStore,
    taxonomies: Vec<TaxonomyView>,
    active_taxonomy: usize,
    selection: Selection,
    search_query: String,
    expanded_parents: HashSet<String>,
    expanded_areas: HashSet<String>,
    hide_next_tier: bool,
    loaded: bool,
}

impl DashboardController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Until a dataset arrives the dashboard is loading and displays nothing.
    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    /// Installs a loaded dataset. Selection starts as every conference the
    /// active taxonomy knows about.
    pub fn apply_dataset(
        &mut self,
        dataset: Dataset,
        preferred_taxonomy: Option<&str>,
        now: DateTime<Utc>,
    ) -> Vec<ConferenceInstance> {
        self.store = ConferenceStore::new(dataset.conferences);
        self.taxonomies = dataset
            .taxonomies
            .into_iter()
            .map(|t| TaxonomyView {
                index: TaxonomyIndex::build(&t.rows),
                name: t.name,
            })
            .collect();

        let preferred = preferred_taxonomy
            .and_then(|name| self.taxonomies.iter().position(|t| t.name == name))
            .unwrap_or(0);
        self.loaded = true;
        self.activate_taxonomy(preferred);

        if let Some(view) = self.taxonomies.get(self.active_taxonomy) {
            let missing = self.store.unclassified(&view.index);
            if !missing.is_empty() {
                log::warn!(
                    "{} conference(s) have no area in '{}' and cannot be shown: {}",
                    missing.len(),
                    view.name,
                    missing.join(", ")
                );
            }
        }

        self.displayed(now)
    }

    fn activate_taxonomy(&mut self, idx: usize) {
        self.active_taxonomy = idx;
        self.expanded_parents.clear();
        self.expanded_areas.clear();
        self.selection = match self.taxonomies.get(idx) {
            Some(view) => Selection::from_names(view.index.all_conference_names().iter().cloned()),
            None => Selection::new(),
        };
        if let Some(view) = self.taxonomies.get(idx) {
            log::info!(
                "Active taxonomy '{}': {} conferences selected",
                view.name,
                self.selection.len()
            );
        }
    }

    /// Recomputes the display list against `now`.
    pub fn displayed(&self, now: DateTime<Utc>) -> Vec<ConferenceInstance> {
        if !self.loaded {
            return Vec::new();
        }
        self.store.filter_and_sort(FilterOptions {
            selection: &self.selection,
            search_term: &self.search_query,
            now,
            taxonomy: self.taxonomy(),
            hide_next_tier: self.hide_next_tier,
        })
    }

    // --- Queries ---

    pub fn store(&self) -> &ConferenceStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn hide_next_tier(&self) -> bool {
        self.hide_next_tier
    }

    pub fn taxonomy(&self) -> Option<&TaxonomyIndex> {
        self.taxonomies.get(self.active_taxonomy).map(|t| &t.index)
    }

    pub fn taxonomy_name(&self) -> Option<&str> {
        self.taxonomies
            .get(self.active_taxonomy)
            .map(|t| t.name.as_str())
    }

    pub fn taxonomy_names(&self) -> Vec<&str> {
        self.taxonomies.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn conferences_in_parent_area(&self, parent_area: &str) -> Vec<String> {
        self.taxonomy()
            .map(|t| t.conferences_by_parent_area(parent_area))
            .unwrap_or_default()
    }

    pub fn conferences_in_area(&self, area_title: &str) -> Vec<String> {
        self.taxonomy()
            .map(|t| t.conferences_by_area_title(area_title).to_vec())
            .unwrap_or_default()
    }

    pub fn is_parent_expanded(&self, parent_area: &str) -> bool {
        self.expanded_parents.contains(parent_area)
    }

    pub fn is_area_expanded(&self, area_title: &str) -> bool {
        self.expanded_areas.contains(area_title)
    }

    /// Flattens the visible part of the parent-area → area → conference tree.
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        let Some(index) = self.taxonomy() else {
            return Vec::new();
        };
        let mut rows = Vec::new();

        for (color_index, parent) in index.parent_areas().iter().enumerate() {
            let parent_confs = index.conferences_by_parent_area(&parent.name);
            let parent_open = self.is_parent_expanded(&parent.name);
            rows.push(TreeRow {
                node: TreeNode::ParentArea {
                    name: parent.name.clone(),
                    color_index,
                },
                depth: 0,
                check: self.selection.check_state(&parent_confs),
                expanded: Some(parent_open),
            });
            if !parent_open {
                continue;
            }

            for area in &parent.areas {
                let area_confs = index.conferences_by_area_title(&area.area_title);
                let area_open = self.is_area_expanded(&area.area_title);
                rows.push(TreeRow {
                    node: TreeNode::Area {
                        title: area.area_title.clone(),
                        code: area.area.clone(),
                    },
                    depth: 1,
                    check: self.selection.check_state(area_confs),
                    expanded: Some(area_open),
                });
                if !area_open {
                    continue;
                }

                for conf in area_confs {
                    let check = if self.selection.contains(conf) {
                        CheckState::Checked
                    } else {
                        CheckState::Unchecked
                    };
                    rows.push(TreeRow {
                        node: TreeNode::Conference { name: conf.clone() },
                        depth: 2,
                        check,
                        expanded: None,
                    });
                }
            }
        }
        rows
    }

    // --- Mutations ---

    pub fn set_search_query(&mut self, query: &str, now: DateTime<Utc>) -> Vec<ConferenceInstance> {
        self.search_query = query.to_string();
        self.displayed(now)
    }

    pub fn set_many(
        &mut self,
        list: &[String],
        included: bool,
        now: DateTime<Utc>,
    ) -> Vec<ConferenceInstance> {
        self.selection.set_many(list, included);
        self.displayed(now)
    }

    pub fn toggle_conference(&mut self, name: &str, now: DateTime<Utc>) -> Vec<ConferenceInstance> {
        self.selection.toggle_one(name);
        self.displayed(now)
    }

    /// Checkbox click on a group: selects the whole list unless it is already
    /// fully selected, in which case it clears it.
    fn toggle_group(&mut self, list: Vec<String>, now: DateTime<Utc>) -> Vec<ConferenceInstance> {
        let include = !self.selection.is_all_selected(&list);
        self.set_many(&list, include, now)
    }

    pub fn toggle_parent_area(&mut self, parent_area: &str, now: DateTime<Utc>) -> Vec<ConferenceInstance> {
        let list = self.conferences_in_parent_area(parent_area);
        self.toggle_group(list, now)
    }

    pub fn toggle_area(&mut self, area_title: &str, now: DateTime<Utc>) -> Vec<ConferenceInstance> {
        let list = self.conferences_in_area(area_title);
        self.toggle_group(list, now)
    }

    /// Toggles the checkbox of whatever node a tree row shows.
    pub fn toggle_row(&mut self, row: &TreeRow, now: DateTime<Utc>) -> Vec<ConferenceInstance> {
        match &row.node {
            TreeNode::ParentArea { name, .. } => self.toggle_parent_area(name, now),
            TreeNode::Area { title, .. } => self.toggle_area(title, now),
            TreeNode::Conference { name } => self.toggle_conference(name, now),
        }
    }

    /// Selects every taxonomy conference, or clears the selection if all are selected.
    pub fn toggle_all(&mut self, now: DateTime<Utc>) -> Vec<ConferenceInstance> {
        let all: Vec<String> = self
            .taxonomy()
            .map(|t| t.all_conference_names().to_vec())
            .unwrap_or_default();
        if self.selection.is_all_selected(&all) {
            self.selection.clear();
            self.displayed(now)
        } else {
            self.set_many(&all, true, now)
        }
    }

    pub fn toggle_expand_parent(&mut self, parent_area: &str) {
        if !self.expanded_parents.remove(parent_area) {
            self.expanded_parents.insert(parent_area.to_string());
        }
    }

    pub fn toggle_expand_area(&mut self, area_title: &str) {
        if !self.expanded_areas.remove(area_title) {
            self.expanded_areas.insert(area_title.to_string());
        }
    }

    /// Expands or collapses a tree row. Returns false for leaves.
    pub fn set_row_expanded(&mut self, row: &TreeRow, expanded: bool) -> bool {
        let (set, key) = match &row.node {
            TreeNode::ParentArea { name, .. } => (&mut self.expanded_parents, name),
            TreeNode::Area { title, .. } => (&mut self.expanded_areas, title),
            TreeNode::Conference { .. } => return false,
        };
        if expanded {
            set.insert(key.clone());
        } else {
            set.remove(key);
        }
        true
    }

    pub fn set_hide_next_tier(&mut self, hide: bool, now: DateTime<Utc>) -> Vec<ConferenceInstance> {
        self.hide_next_tier = hide;
        self.displayed(now)
    }

    /// Switches to another taxonomy by position, resetting selection and tree state.
    pub fn select_taxonomy(&mut self, idx: usize, now: DateTime<Utc>) -> Vec<ConferenceInstance> {
        if idx < self.taxonomies.len() && idx != self.active_taxonomy {
            self.activate_taxonomy(idx);
        }
        self.displayed(now)
    }

    pub fn cycle_taxonomy(&mut self, now: DateTime<Utc>) -> Vec<ConferenceInstance> {
        if self.taxonomies.is_empty() {
            return self.displayed(now);
        }
        let next = (self.active_taxonomy + 1) % self.taxonomies.len();
        self.select_taxonomy(next, now)
    }
}
