// File: src/store.rs
use crate::model::{ConferenceInstance, TaxonomyIndex};
use crate::selection::Selection;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Immutable list of conference editions as loaded from the structured source.
#[derive(Debug, Clone, Default)]
pub struct ConferenceStore {
    pub conferences: Vec<ConferenceInstance>,
}

pub struct FilterOptions<'a> {
    pub selection: &'a Selection,
    pub search_term: &'a str,
    pub now: DateTime<Utc>,
    /// When set together with `hide_next_tier`, conferences the taxonomy
    /// flags as next-tier are dropped.
    pub taxonomy: Option<&'a TaxonomyIndex>,
    pub hide_next_tier: bool,
}

/// Upcoming deadlines first, soonest first; passed, missing and malformed
/// deadlines after, all equal to one another.
pub fn compare_deadlines(
    a: &ConferenceInstance,
    b: &ConferenceInstance,
    now: DateTime<Utc>,
) -> Ordering {
    let da = a.deadline_instant().filter(|d| *d > now);
    let db = b.deadline_instant().filter(|d| *d > now);
    match (da, db) {
        (Some(x), Some(y)) => x.cmp(&y),
        (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
    }
}

impl ConferenceStore {
    pub fn new(conferences: Vec<ConferenceInstance>) -> Self {
        Self { conferences }
    }

    pub fn len(&self) -> usize {
        self.conferences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conferences.is_empty()
    }

    /// Names present in the store but absent from `taxonomy`. Such editions can
    /// never be displayed through the default selection.
    pub fn unclassified(&self, taxonomy: &TaxonomyIndex) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for c in &self.conferences {
            if !taxonomy.contains(&c.name) && !out.contains(&c.name.as_str()) {
                out.push(&c.name);
            }
        }
        out
    }

    /// The displayed list: selected, matching the search term, sorted by deadline.
    ///
    /// The sort is stable, so editions that compare equal keep source order.
    pub fn filter_and_sort(&self, options: FilterOptions) -> Vec<ConferenceInstance> {
        let mut result: Vec<ConferenceInstance> = self
            .conferences
            .iter()
            .filter(|c| options.selection.contains(&c.name))
            .filter(|c| c.matches_search_term(options.search_term))
            .filter(|c| {
                !(options.hide_next_tier
                    && options.taxonomy.is_some_and(|t| t.is_next_tier(&c.name)))
            })
            .cloned()
            .collect();

        result.sort_by(|a, b| compare_deadlines(a, b, options.now));
        result
    }

    pub fn upcoming_count(&self, now: DateTime<Utc>) -> usize {
        self.conferences.iter().filter(|c| c.is_upcoming(now)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DateField, TaxonomyRow};
    use chrono::Duration;

    fn conf(name: &str, deadline: Option<DateTime<Utc>>) -> ConferenceInstance {
        let c = ConferenceInstance::new(name, Some(2026));
        match deadline {
            Some(d) => c.with_deadline(d),
            None => c,
        }
    }

    fn names(list: &[ConferenceInstance]) -> Vec<&str> {
        list.iter().map(|c| c.name.as_str()).collect()
    }

    fn opts<'a>(sel: &'a Selection, q: &'a str, now: DateTime<Utc>) -> FilterOptions<'a> {
        FilterOptions {
            selection: sel,
            search_term: q,
            now,
            taxonomy: None,
            hide_next_tier: false,
        }
    }

    #[test]
    fn test_sort_upcoming_then_passed() {
        let now = Utc::now();
        let store = ConferenceStore::new(vec![
            conf("C", Some(now - Duration::days(1))),
            conf("B", Some(now + Duration::days(2))),
            conf("A", Some(now + Duration::days(1))),
        ]);
        let sel = Selection::from_names(["A", "B", "C"]);
        let out = store.filter_and_sort(opts(&sel, "", now));
        assert_eq!(names(&out), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_passed_and_missing_keep_source_order() {
        let now = Utc::now();
        let mut broken = conf("Broken", None);
        broken.deadline = Some(DateField::parse("n/a"));
        let store = ConferenceStore::new(vec![
            conf("Old", Some(now - Duration::days(30))),
            broken,
            conf("None", None),
            conf("Older", Some(now - Duration::days(300))),
            conf("Soon", Some(now + Duration::hours(3))),
        ]);
        let sel = Selection::from_names(["Old", "Broken", "None", "Older", "Soon"]);
        let out = store.filter_and_sort(opts(&sel, "", now));
        assert_eq!(names(&out), vec!["Soon", "Old", "Broken", "None", "Older"]);
    }

    #[test]
    fn test_filter_requires_selection_and_search() {
        let now = Utc::now();
        let store = ConferenceStore::new(vec![
            conf("ICML", None),
            conf("ICSE", None),
            conf("SOSP", None),
        ]);
        let sel = Selection::from_names(["ICML", "SOSP"]);

        assert_eq!(names(&store.filter_and_sort(opts(&sel, "", now))), vec!["ICML", "SOSP"]);
        assert_eq!(names(&store.filter_and_sort(opts(&sel, "ic", now))), vec!["ICML"]);
        assert!(store.filter_and_sort(opts(&sel, "icse", now)).is_empty());
    }

    #[test]
    fn test_duplicate_editions_survive_filter() {
        let now = Utc::now();
        let store = ConferenceStore::new(vec![conf("FSE", None), conf("FSE", None)]);
        let sel = Selection::from_names(["FSE"]);
        assert_eq!(store.filter_and_sort(opts(&sel, "", now)).len(), 2);
    }

    #[test]
    fn test_hide_next_tier() {
        let now = Utc::now();
        let mut row = TaxonomyRow::new("MSR", "se", "Software Engineering", "Systems");
        row.next_tier = Some(true);
        let idx = TaxonomyIndex::build(&[
            row,
            TaxonomyRow::new("ICSE", "se", "Software Engineering", "Systems"),
        ]);
        let store = ConferenceStore::new(vec![conf("MSR", None), conf("ICSE", None)]);
        let sel = Selection::from_names(idx.all_conference_names().iter().cloned());

        let mut o = opts(&sel, "", now);
        o.taxonomy = Some(&idx);
        assert_eq!(store.filter_and_sort(o).len(), 2);

        let mut o = opts(&sel, "", now);
        o.taxonomy = Some(&idx);
        o.hide_next_tier = true;
        assert_eq!(names(&store.filter_and_sort(o)), vec!["ICSE"]);
    }

    #[test]
    fn test_unclassified_lists_each_name_once() {
        let idx = TaxonomyIndex::build(&[TaxonomyRow::new("A", "a", "Alpha", "CS")]);
        let store = ConferenceStore::new(vec![conf("A", None), conf("Z", None), conf("Z", None)]);
        assert_eq!(store.unclassified(&idx), vec!["Z"]);
    }
}
