//! Predicate filter chain.
//!
//! Every filter here is a pure function of (records, state): records are
//! only ever removed, never reordered.

use std::collections::BTreeMap;

use catalog::{Lesson, MapAsset};
use foundation::ids::UserId;
use serde::{Deserialize, Serialize};

use crate::facets::{FacetGroup, FacetKey};
use crate::sort::SortBy;
use crate::thematic::ThematicCollection;

/// Which map assets are in view.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Every asset, regardless of owner or visibility.
    #[default]
    Combined,
    /// Public assets only, regardless of owner.
    Global,
    /// The current user's uploads, public or private.
    Personal,
}

impl Scope {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" => Some(Scope::Combined),
            "global" => Some(Scope::Global),
            "personal" => Some(Scope::Personal),
            _ => None,
        }
    }

    pub fn admits(&self, asset: &MapAsset, user: &UserId) -> bool {
        match self {
            Scope::Combined => true,
            Scope::Global => asset.is_public(),
            Scope::Personal => asset.is_owned_by(user),
        }
    }
}

/// Serializable query state for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub thematic: bool,
    pub scope: Scope,
    /// Selected values per facet group. Absent or empty means unconstrained.
    pub facets: BTreeMap<FacetKey, Vec<String>>,
    pub sort: SortBy,
}

impl FilterState {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Normalized query, or `None` when the query imposes no constraint.
    pub fn effective_query(&self) -> Option<String> {
        let q = self.query.trim();
        if q.is_empty() {
            None
        } else {
            Some(q.to_lowercase())
        }
    }

    pub fn selected(&self, key: FacetKey) -> &[String] {
        self.facets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_facet_selections(&self) -> bool {
        self.facets.values().any(|v| !v.is_empty())
    }

    /// Adds `value` to group `key` if absent, removes it if present.
    ///
    /// Only values present in the group's derived options are accepted;
    /// returns `false` (no change) otherwise.
    pub fn toggle_facet(&mut self, groups: &[FacetGroup], key: FacetKey, value: &str) -> bool {
        let known = groups
            .iter()
            .find(|g| g.key == key)
            .is_some_and(|g| g.contains(value));
        if !known {
            return false;
        }

        let values = self.facets.entry(key).or_default();
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
        } else {
            values.push(value.to_string());
        }
        if values.is_empty() {
            self.facets.remove(&key);
        }
        true
    }

    /// Drops selections whose value no longer appears in `groups`.
    pub fn retain_known(&mut self, groups: &[FacetGroup]) {
        self.facets.retain(|key, values| {
            let Some(group) = groups.iter().find(|g| g.key == *key) else {
                return false;
            };
            values.retain(|v| group.contains(v));
            !values.is_empty()
        });
    }

    pub fn clear_facets(&mut self) {
        self.facets.clear();
    }

    /// The "clear all filters" affordance: query, thematic toggle and facets.
    /// Scope and sort are view preferences and survive a reset.
    pub fn reset(&mut self) {
        self.query.clear();
        self.thematic = false;
        self.facets.clear();
    }
}

/// Case-insensitive substring test. An empty query matches everything.
pub fn text_matches(haystack: &str, query: Option<&str>) -> bool {
    match query {
        None => true,
        Some(q) => haystack.to_lowercase().contains(q),
    }
}

/// Searchable text of a lesson: title, author and tags.
pub fn lesson_search_text(lesson: &Lesson) -> String {
    let mut out = String::with_capacity(lesson.title.len() + lesson.author.len() + 32);
    out.push_str(&lesson.title);
    out.push(' ');
    out.push_str(&lesson.author);
    for tag in &lesson.tags {
        out.push(' ');
        out.push_str(tag);
    }
    out
}

/// Searchable text of an asset: title, author, tags and description.
pub fn asset_search_text(asset: &MapAsset) -> String {
    let mut out = String::with_capacity(
        asset.title.len() + asset.author.len() + asset.description.len() + 32,
    );
    out.push_str(&asset.title);
    out.push(' ');
    out.push_str(&asset.author);
    for tag in &asset.tags {
        out.push(' ');
        out.push_str(tag);
    }
    out.push(' ');
    out.push_str(&asset.description);
    out
}

/// OR within a group, AND across groups.
pub fn facets_match(lesson: &Lesson, facets: &BTreeMap<FacetKey, Vec<String>>) -> bool {
    facets.iter().all(|(key, values)| {
        values.is_empty() || values.iter().any(|v| v == key.value_of(lesson))
    })
}

/// Thematic and facet predicates only; the text predicate is applied by the
/// caller so it can choose between substring and fuzzy matching.
pub fn lesson_passes_structural(
    lesson: &Lesson,
    state: &FilterState,
    collection: &ThematicCollection,
) -> bool {
    (!state.thematic || collection.matches_tags(&lesson.tags))
        && facets_match(lesson, &state.facets)
}

/// Full substring chain for lessons: thematic, free text, facets.
pub fn filter_lessons<'a>(
    lessons: &'a [Lesson],
    state: &FilterState,
    collection: &ThematicCollection,
) -> Vec<&'a Lesson> {
    let query = state.effective_query();
    lessons
        .iter()
        .filter(|l| lesson_passes_structural(l, state, collection))
        .filter(|l| text_matches(&lesson_search_text(l), query.as_deref()))
        .collect()
}

/// Full chain for map assets: scope, thematic, free text.
pub fn filter_assets<'a>(
    assets: &'a [MapAsset],
    state: &FilterState,
    collection: &ThematicCollection,
    user: &UserId,
) -> Vec<&'a MapAsset> {
    let query = state.effective_query();
    assets
        .iter()
        .filter(|a| state.scope.admits(a, user))
        .filter(|a| !state.thematic || collection.matches_tags(&a.tags))
        .filter(|a| text_matches(&asset_search_text(a), query.as_deref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::lesson_facets;
    use catalog::seed::{seed_assets, seed_lessons};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn ids(lessons: &[&Lesson]) -> Vec<String> {
        lessons.iter().map(|l| l.id.to_string()).collect()
    }

    fn asset_ids(assets: &[&MapAsset]) -> Vec<String> {
        assets.iter().map(|a| a.id.to_string()).collect()
    }

    fn user() -> UserId {
        UserId::from("user_01")
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let lessons = seed_lessons();
        let state = FilterState::with_query("   ");
        let out = filter_lessons(&lessons, &state, &ThematicCollection::roman_empire());
        assert_eq!(ids(&out), vec!["l1", "l2", "l3", "l4"]);
    }

    #[test]
    fn rome_query_returns_only_rome_lessons() {
        let lessons = seed_lessons();
        let state = FilterState::with_query("ROME");
        let out = filter_lessons(&lessons, &state, &ThematicCollection::roman_empire());
        assert_eq!(ids(&out), vec!["l1"]);
        for l in out {
            assert!(lesson_search_text(l).to_lowercase().contains("rome"));
        }
    }

    #[test]
    fn facets_or_within_and_across_groups() {
        let lessons = seed_lessons();
        let groups = lesson_facets(&lessons);
        let mut state = FilterState::default();
        let collection = ThematicCollection::roman_empire();

        assert!(state.toggle_facet(&groups, FacetKey::Level, "Beginner"));
        assert!(state.toggle_facet(&groups, FacetKey::Level, "Advanced"));
        assert_eq!(ids(&filter_lessons(&lessons, &state, &collection)), vec!["l2", "l3"]);

        assert!(state.toggle_facet(&groups, FacetKey::Language, "EN"));
        assert_eq!(ids(&filter_lessons(&lessons, &state, &collection)), vec!["l3"]);
    }

    #[test]
    fn unknown_facet_values_are_rejected() {
        let groups = lesson_facets(&seed_lessons());
        let mut state = FilterState::default();
        assert!(!state.toggle_facet(&groups, FacetKey::Language, "FR"));
        assert!(!state.has_facet_selections());
    }

    #[test]
    fn retain_known_prunes_stale_values() {
        let lessons = seed_lessons();
        let groups = lesson_facets(&lessons);
        let mut state = FilterState::default();
        state
            .facets
            .insert(FacetKey::Language, vec!["EN".into(), "FR".into()]);
        state.facets.insert(FacetKey::Author, vec!["Nobody".into()]);
        state.retain_known(&groups);
        assert_eq!(state.selected(FacetKey::Language), &["EN".to_string()]);
        assert!(state.selected(FacetKey::Author).is_empty());
    }

    #[test]
    fn thematic_and_query_compose_as_and() {
        let lessons = seed_lessons();
        let collection = ThematicCollection::roman_empire();
        let mut state = FilterState::with_query("forum");
        state.thematic = true;
        assert_eq!(ids(&filter_lessons(&lessons, &state, &collection)), vec!["l1"]);

        state.query = "baroque".into();
        assert!(filter_lessons(&lessons, &state, &collection).is_empty());
    }

    #[test]
    fn personal_scope_returns_only_owned_assets() {
        let assets = seed_assets();
        let collection = ThematicCollection::roman_empire();
        let mut state = FilterState {
            scope: Scope::Personal,
            ..FilterState::default()
        };
        assert_eq!(
            asset_ids(&filter_assets(&assets, &state, &collection, &user())),
            vec!["ma2", "ma5"]
        );

        state.scope = Scope::Global;
        assert_eq!(
            asset_ids(&filter_assets(&assets, &state, &collection, &user())),
            vec!["ma1", "ma2", "ma3", "ma4"]
        );
    }

    #[test]
    fn private_assets_never_appear_globally() {
        let assets = seed_assets();
        let state = FilterState {
            scope: Scope::Global,
            ..FilterState::default()
        };
        let out = filter_assets(&assets, &state, &ThematicCollection::roman_empire(), &user());
        assert!(out.iter().all(|a| a.is_public()));
    }

    #[test]
    fn combined_scope_shows_every_asset() {
        let mut assets = seed_assets();
        assets[4].author_id = UserId::from("user_09");
        let state = FilterState::default();
        let out = filter_assets(&assets, &state, &ThematicCollection::roman_empire(), &user());
        assert_eq!(asset_ids(&out), vec!["ma1", "ma2", "ma3", "ma4", "ma5"]);
    }

    #[test]
    fn asset_query_searches_description() {
        let assets = seed_assets();
        let state = FilterState::with_query("turquoise");
        let out = filter_assets(&assets, &state, &ThematicCollection::roman_empire(), &user());
        assert_eq!(asset_ids(&out), vec!["ma3"]);
    }

    #[test]
    fn reset_keeps_scope_and_sort() {
        let mut state = FilterState {
            query: "x".into(),
            thematic: true,
            scope: Scope::Global,
            sort: SortBy::Rating,
            ..FilterState::default()
        };
        state.facets.insert(FacetKey::Level, vec!["Beginner".into()]);
        state.reset();
        assert_eq!(
            state,
            FilterState {
                scope: Scope::Global,
                sort: SortBy::Rating,
                ..FilterState::default()
            }
        );
    }

    #[test]
    fn state_serializes() {
        let mut state = FilterState::with_query("rome");
        state.facets.insert(FacetKey::Level, vec!["Beginner".into()]);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"level\":[\"Beginner\"]"));
        let back: FilterState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    proptest! {
        #[test]
        fn substring_filter_only_returns_matching_records(q in "[a-zA-Z ]{0,6}") {
            let lessons = seed_lessons();
            let state = FilterState::with_query(q.clone());
            let out = filter_lessons(&lessons, &state, &ThematicCollection::roman_empire());
            match state.effective_query() {
                None => prop_assert_eq!(out.len(), lessons.len()),
                Some(needle) => {
                    for l in &out {
                        prop_assert!(lesson_search_text(l).to_lowercase().contains(&needle));
                    }
                    let expected = lessons
                        .iter()
                        .filter(|l| lesson_search_text(l).to_lowercase().contains(&needle))
                        .count();
                    prop_assert_eq!(out.len(), expected);
                }
            }
        }

        #[test]
        fn facet_toggle_round_trip_restores_results(
            key_idx in 0usize..3,
            value_idx in 0usize..4,
            pre_level in proptest::option::of(0usize..3),
        ) {
            let lessons = seed_lessons();
            let groups = lesson_facets(&lessons);
            let collection = ThematicCollection::roman_empire();
            let mut state = FilterState::default();
            if let Some(i) = pre_level {
                let v = groups[0].options[i].value.clone();
                state.toggle_facet(&groups, FacetKey::Level, &v);
            }

            let group = &groups[key_idx];
            let value = group.options[value_idx % group.options.len()].value.clone();

            let before: Vec<String> = ids(&filter_lessons(&lessons, &state, &collection));
            prop_assert!(state.toggle_facet(&groups, group.key, &value));
            prop_assert!(state.toggle_facet(&groups, group.key, &value));
            let after: Vec<String> = ids(&filter_lessons(&lessons, &state, &collection));
            prop_assert_eq!(before, after);
        }

        #[test]
        fn filtering_is_deterministic(q in "[a-z]{0,4}", thematic in any::<bool>()) {
            let lessons = seed_lessons();
            let mut state = FilterState::with_query(q);
            state.thematic = thematic;
            let collection = ThematicCollection::roman_empire();
            let a = ids(&filter_lessons(&lessons, &state, &collection));
            let b = ids(&filter_lessons(&lessons, &state, &collection));
            prop_assert_eq!(a, b);
        }
    }
}
