use std::collections::BTreeSet;

use catalog::{Catalog, MapAsset};
use foundation::ids::AssetId;
use serde::{Deserialize, Serialize};

/// Ordered set of selected map assets.
///
/// Ordering contract:
/// - Iteration yields ids in insertion order.
/// - Re-inserting a removed id appends it at the end; the old position is
///   not restored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<AssetId>", into = "Vec<AssetId>")]
pub struct SelectionSet {
    order: Vec<AssetId>,
    members: BTreeSet<AssetId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.members.contains(id)
    }

    /// True if any of `ids` is selected.
    pub fn any_of<'a>(&self, ids: impl IntoIterator<Item = &'a AssetId>) -> bool {
        ids.into_iter().any(|id| self.contains(id))
    }

    /// Appends `id` if absent.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, id: AssetId) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, id: &AssetId) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.order.retain(|x| x != id);
        true
    }

    /// Removes `id` if present, appends it otherwise. Returns whether `id`
    /// is selected afterwards.
    pub fn toggle(&mut self, id: AssetId) -> bool {
        if self.remove(&id) {
            false
        } else {
            self.insert(id);
            true
        }
    }

    /// Appends every id not already selected, in the given order.
    ///
    /// Returns the number of ids added.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = AssetId>) -> usize {
        ids.into_iter().filter(|id| self.insert(id.clone())).count()
    }

    /// Removes exactly the given ids; the rest keep their relative order.
    ///
    /// Returns the number of ids removed.
    pub fn deselect_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a AssetId>) -> usize {
        let before = self.members.len();
        for id in ids {
            self.members.remove(id);
        }
        let removed = before - self.members.len();
        if removed > 0 {
            let members = &self.members;
            self.order.retain(|x| members.contains(x));
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetId> + '_ {
        self.order.iter()
    }

    pub fn ids(&self) -> &[AssetId] {
        &self.order
    }

    /// Selected assets in selection order. Ids the catalog doesn't know are
    /// skipped.
    pub fn selected_objects<'a>(&self, catalog: &'a Catalog) -> Vec<&'a MapAsset> {
        self.order.iter().filter_map(|id| catalog.asset(id)).collect()
    }
}

impl From<Vec<AssetId>> for SelectionSet {
    fn from(ids: Vec<AssetId>) -> Self {
        let mut s = Self::new();
        s.select_all(ids);
        s
    }
}

impl From<SelectionSet> for Vec<AssetId> {
    fn from(s: SelectionSet) -> Self {
        s.order
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionSet;
    use catalog::Catalog;
    use foundation::ids::AssetId;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn a(id: &str) -> AssetId {
        AssetId::from(id)
    }

    fn ids(s: &SelectionSet) -> Vec<&str> {
        s.iter().map(AssetId::as_str).collect()
    }

    #[test]
    fn insert_remove_contains_and_len() {
        let mut s = SelectionSet::new();
        assert!(s.is_empty());
        assert!(s.insert(a("ma1")));
        assert!(!s.insert(a("ma1")));
        assert_eq!(s.len(), 1);
        assert!(s.contains(&a("ma1")));
        assert!(s.remove(&a("ma1")));
        assert!(!s.remove(&a("ma1")));
        assert!(s.is_empty());
    }

    #[test]
    fn deselecting_keeps_selection_order() {
        let mut s = SelectionSet::new();
        s.toggle(a("ma2"));
        s.toggle(a("ma1"));
        s.toggle(a("ma5"));
        s.toggle(a("ma1"));
        assert_eq!(ids(&s), vec!["ma2", "ma5"]);
    }

    #[test]
    fn readding_appends_at_end() {
        let mut s = SelectionSet::from(vec![a("ma1"), a("ma2"), a("ma3")]);
        s.toggle(a("ma1"));
        s.toggle(a("ma1"));
        assert_eq!(ids(&s), vec!["ma2", "ma3", "ma1"]);
    }

    #[test]
    fn select_all_appends_only_new_ids() {
        let mut s = SelectionSet::from(vec![a("ma3")]);
        let added = s.select_all([a("ma1"), a("ma3"), a("ma2")]);
        assert_eq!(added, 2);
        assert_eq!(ids(&s), vec!["ma3", "ma1", "ma2"]);
    }

    #[test]
    fn deselect_all_removes_exactly_given_ids() {
        let mut s = SelectionSet::from(vec![a("ma1"), a("ma2"), a("ma3"), a("ma4")]);
        let removed = s.deselect_all(&[a("ma3"), a("ma1"), a("ma9")]);
        assert_eq!(removed, 2);
        assert_eq!(ids(&s), vec!["ma2", "ma4"]);
    }

    #[test]
    fn any_of_drives_stack_highlight() {
        let s = SelectionSet::from(vec![a("ma5")]);
        assert!(s.any_of(&[a("ma1"), a("ma5")]));
        assert!(!s.any_of(&[a("ma1"), a("ma2")]));
    }

    #[test]
    fn selected_objects_follow_selection_order() {
        let catalog = Catalog::seed().unwrap();
        let s = SelectionSet::from(vec![a("ma4"), a("missing"), a("ma1")]);
        let titles: Vec<&str> = s
            .selected_objects(&catalog)
            .iter()
            .map(|x| x.id.as_str())
            .collect();
        assert_eq!(titles, vec!["ma4", "ma1"]);
    }

    #[test]
    fn serializes_as_ordered_list() {
        let s = SelectionSet::from(vec![a("ma2"), a("ma1")]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"["ma2","ma1"]"#);
        let back: SelectionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    fn id_strategy() -> impl Strategy<Value = AssetId> {
        (0u8..12).prop_map(|n| AssetId::new(format!("ma{n}")))
    }

    proptest! {
        #[test]
        fn toggle_twice_on_empty_is_empty(id in id_strategy()) {
            let mut s = SelectionSet::new();
            prop_assert!(s.toggle(id.clone()));
            prop_assert_eq!(s.ids(), &[id.clone()][..]);
            prop_assert!(!s.toggle(id));
            prop_assert!(s.is_empty());
        }

        #[test]
        fn select_all_is_idempotent(
            start in proptest::collection::vec(id_strategy(), 0..8),
            group in proptest::collection::vec(id_strategy(), 0..8),
        ) {
            let mut once = SelectionSet::from(start);
            once.select_all(group.clone());
            let mut twice = once.clone();
            prop_assert_eq!(twice.select_all(group), 0);
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn never_holds_duplicates(ops in proptest::collection::vec(id_strategy(), 0..32)) {
            let mut s = SelectionSet::new();
            for id in ops {
                s.toggle(id);
            }
            let mut seen = std::collections::BTreeSet::new();
            for id in s.iter() {
                prop_assert!(seen.insert(id.clone()));
            }
            prop_assert_eq!(seen.len(), s.len());
        }
    }
}
