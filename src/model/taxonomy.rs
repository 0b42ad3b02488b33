// File: ./src/model/taxonomy.rs
//! Conference → area → parent-area classification.
//!
//! Rows come from a tabular source; [`TaxonomyIndex::build`] derives the
//! ordered parent-area/area tree and the per-area conference lists in a single
//! order-preserving pass.
use std::collections::{HashMap, HashSet};

/// Parent-area used when a row leaves `ParentArea` empty.
pub const OTHER_PARENT_AREA: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaxonomyRow {
    pub conference_title: String,
    pub area: String,
    pub area_title: String,
    pub parent_area: String,
    pub next_tier: Option<bool>,
    pub year: Option<String>,
    pub note: Option<String>,
}

impl TaxonomyRow {
    pub fn new(conference_title: &str, area: &str, area_title: &str, parent_area: &str) -> Self {
        let parent_area = if parent_area.trim().is_empty() {
            OTHER_PARENT_AREA.to_string()
        } else {
            parent_area.to_string()
        };
        Self {
            conference_title: conference_title.to_string(),
            area: area.to_string(),
            area_title: area_title.to_string(),
            parent_area,
            ..Default::default()
        }
    }
}

/// An area as listed under its parent. `area` is the short code of the first row seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaEntry {
    pub area: String,
    pub area_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentAreaEntry {
    pub name: String,
    pub areas: Vec<AreaEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct TaxonomyIndex {
    parents: Vec<ParentAreaEntry>,
    parent_pos: HashMap<String, usize>,
    conferences_by_area: HashMap<String, Vec<String>>,
    all_conference_names: Vec<String>,
    all_conference_set: HashSet<String>,
    next_tier: HashMap<String, bool>,
}

impl TaxonomyIndex {
    pub fn build(rows: &[TaxonomyRow]) -> Self {
        let mut index = Self::default();
        for row in rows {
            index.insert(row);
        }
        log::debug!(
            "Taxonomy index: {} parent areas, {} areas, {} conferences",
            index.parents.len(),
            index.conferences_by_area.len(),
            index.all_conference_names.len()
        );
        index
    }

    fn insert(&mut self, row: &TaxonomyRow) {
        let pos = match self.parent_pos.get(&row.parent_area) {
            Some(&p) => p,
            None => {
                self.parents.push(ParentAreaEntry {
                    name: row.parent_area.clone(),
                    areas: Vec::new(),
                });
                let p = self.parents.len() - 1;
                self.parent_pos.insert(row.parent_area.clone(), p);
                p
            }
        };

        // First occurrence of an area title under a parent wins.
        let parent = &mut self.parents[pos];
        if !parent.areas.iter().any(|a| a.area_title == row.area_title) {
            parent.areas.push(AreaEntry {
                area: row.area.clone(),
                area_title: row.area_title.clone(),
            });
        }

        let confs = self
            .conferences_by_area
            .entry(row.area_title.clone())
            .or_default();
        if !confs.contains(&row.conference_title) {
            confs.push(row.conference_title.clone());
        }

        if self.all_conference_set.insert(row.conference_title.clone()) {
            self.all_conference_names.push(row.conference_title.clone());
        }

        if let Some(flag) = row.next_tier {
            self.next_tier.insert(row.conference_title.clone(), flag);
        }
    }

    pub fn parent_areas(&self) -> &[ParentAreaEntry] {
        &self.parents
    }

    pub fn areas_of(&self, parent_area: &str) -> &[AreaEntry] {
        self.parent_pos
            .get(parent_area)
            .map(|&p| self.parents[p].areas.as_slice())
            .unwrap_or(&[])
    }

    pub fn conferences_by_area_title(&self, area_title: &str) -> &[String] {
        self.conferences_by_area
            .get(area_title)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Concatenation of the conference lists of every area under `parent_area`.
    /// A conference filed under two of its areas appears twice.
    pub fn conferences_by_parent_area(&self, parent_area: &str) -> Vec<String> {
        self.areas_of(parent_area)
            .iter()
            .flat_map(|a| self.conferences_by_area_title(&a.area_title).iter().cloned())
            .collect()
    }

    /// Every conference title seen, in first-seen order.
    pub fn all_conference_names(&self) -> &[String] {
        &self.all_conference_names
    }

    pub fn contains(&self, conference: &str) -> bool {
        self.all_conference_set.contains(conference)
    }

    pub fn is_next_tier(&self, conference: &str) -> bool {
        self.next_tier.get(conference).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(conf: &str, area: &str, title: &str, parent: &str) -> TaxonomyRow {
        TaxonomyRow::new(conf, area, title, parent)
    }

    #[test]
    fn test_area_dedup_keeps_first_code() {
        let idx = TaxonomyIndex::build(&[
            row("AAAI", "ai", "Artificial Intelligence", "AI"),
            row("IJCAI", "AI2", "Artificial Intelligence", "AI"),
        ]);
        let areas = idx.areas_of("AI");
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].area, "ai");
        assert_eq!(
            idx.conferences_by_area_title("Artificial Intelligence"),
            &["AAAI".to_string(), "IJCAI".to_string()]
        );
    }

    #[test]
    fn test_missing_parent_defaults_to_other() {
        let idx = TaxonomyIndex::build(&[row("X", "x", "Misc", "")]);
        assert_eq!(idx.parent_areas()[0].name, OTHER_PARENT_AREA);
        assert_eq!(idx.areas_of("Other").len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let idx = TaxonomyIndex::build(&[
            row("B", "sy", "Systems", "CS"),
            row("A", "ai", "AI", "CS"),
            row("C", "bio", "Biology", "Life"),
            row("A", "sy", "Systems", "CS"),
        ]);
        let parents: Vec<&str> = idx.parent_areas().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(parents, vec!["CS", "Life"]);
        let titles: Vec<&str> = idx
            .areas_of("CS")
            .iter()
            .map(|a| a.area_title.as_str())
            .collect();
        assert_eq!(titles, vec!["Systems", "AI"]);
        assert_eq!(idx.all_conference_names(), &["B", "A", "C"]);
        assert_eq!(idx.conferences_by_parent_area("CS"), vec!["B", "A", "A"]);
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let idx = TaxonomyIndex::build(&[
            row("OSDI", "os", "Operating Systems", "Systems"),
            row("OSDI", "os", "Operating Systems", "Systems"),
        ]);
        assert_eq!(idx.conferences_by_area_title("Operating Systems").len(), 1);
        assert_eq!(idx.all_conference_names().len(), 1);
    }

    #[test]
    fn test_unknown_lookups_are_empty() {
        let idx = TaxonomyIndex::build(&[]);
        assert!(idx.is_empty());
        assert!(idx.areas_of("nope").is_empty());
        assert!(idx.conferences_by_area_title("nope").is_empty());
        assert!(idx.conferences_by_parent_area("nope").is_empty());
        assert!(!idx.contains("nope"));
    }

    #[test]
    fn test_next_tier_last_row_wins() {
        let mut a = row("MSR", "se", "Software Engineering", "Systems");
        a.next_tier = Some(false);
        let mut b = row("MSR", "se", "Software Engineering", "Systems");
        b.next_tier = Some(true);
        let idx = TaxonomyIndex::build(&[a, b]);
        assert!(idx.is_next_tier("MSR"));
        assert!(!idx.is_next_tier("ICSE"));
    }
}
