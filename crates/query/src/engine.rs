use catalog::{Catalog, Lesson, MapAsset};
use foundation::ids::UserId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::facets::{FacetGroup, lesson_facets};
use crate::filter::{
    FilterState, filter_assets, filter_lessons, lesson_passes_structural, lesson_search_text,
};
use crate::search::{FuzzyIndex, FuzzyOptions, SearchIndex, tokenize};
use crate::sort::sort_lessons;
use crate::suggest::{SearchSuggestion, suggestions};
use crate::thematic::ThematicCollection;

/// How the Lessons free-text query is matched.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMatch {
    /// Ranked approximate matching through the search index.
    #[default]
    Fuzzy,
    /// Case-insensitive substring over title, author and tags.
    Substring,
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub collection: ThematicCollection,
    pub lesson_text: TextMatch,
    pub fuzzy: FuzzyOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            collection: ThematicCollection::roman_empire(),
            lesson_text: TextMatch::Fuzzy,
            fuzzy: FuzzyOptions::default(),
        }
    }
}

/// Catalog query engine: filter chain, search ranking, facets, sort.
///
/// Holds only derived state (the search index); the catalog itself is
/// passed in on every call and never mutated.
#[derive(Debug)]
pub struct QueryEngine {
    options: EngineOptions,
    current_user: UserId,
    lesson_index: Option<FuzzyIndex>,
    indexed_fingerprint: Option<String>,
}

impl QueryEngine {
    pub fn new(catalog: &Catalog, current_user: UserId, options: EngineOptions) -> Self {
        let mut engine = Self {
            options,
            current_user,
            lesson_index: None,
            indexed_fingerprint: None,
        };
        engine.refresh(catalog);
        engine
    }

    pub fn current_user(&self) -> &UserId {
        &self.current_user
    }

    pub fn collection(&self) -> &ThematicCollection {
        &self.options.collection
    }

    /// Rebuilds the search index if `catalog` differs from the indexed one.
    pub fn refresh(&mut self, catalog: &Catalog) {
        if self.indexed_fingerprint.as_deref() == Some(catalog.fingerprint()) {
            return;
        }
        self.lesson_index = match FuzzyIndex::for_lessons(catalog.lessons(), self.options.fuzzy) {
            Ok(index) => Some(index),
            Err(e) => {
                warn!(error = %e, "lesson search index unavailable");
                None
            }
        };
        self.indexed_fingerprint = Some(catalog.fingerprint().to_string());
    }

    /// Lessons page results: search (if a query is set), then thematic and
    /// facet predicates, then the requested sort.
    pub fn lessons<'a>(&self, catalog: &'a Catalog, state: &FilterState) -> Vec<&'a Lesson> {
        let all = catalog.lessons();
        let mut out: Vec<&Lesson> = match (self.options.lesson_text, state.effective_query()) {
            (_, None) | (TextMatch::Substring, Some(_)) => {
                filter_lessons(all, state, &self.options.collection)
            }
            (TextMatch::Fuzzy, Some(q)) => self
                .rank_lessons(all, &q)
                .into_iter()
                .filter(|l| lesson_passes_structural(l, state, &self.options.collection))
                .collect(),
        };
        sort_lessons(&mut out, state.sort);
        debug!(
            query = %state.query,
            thematic = state.thematic,
            sort = ?state.sort,
            results = out.len(),
            "lesson query"
        );
        out
    }

    /// Lessons whose title, author or tags contain every query term, in
    /// fuzzy relevance order. Approximate hits are returned only when no
    /// lesson matches that way.
    fn rank_lessons<'a>(&self, lessons: &'a [Lesson], query: &str) -> Vec<&'a Lesson> {
        let hits = match &self.lesson_index {
            Some(index) => index.query(query),
            None => Vec::new(),
        };
        let terms = tokenize(query);
        let exact: Vec<bool> = lessons
            .iter()
            .map(|l| {
                let text = lesson_search_text(l).to_lowercase();
                terms.iter().all(|t| text.contains(t.as_str()))
            })
            .collect();
        if !exact.contains(&true) {
            return hits
                .into_iter()
                .filter_map(|hit| lessons.get(hit.index))
                .collect();
        }

        let mut ranked = Vec::new();
        let mut seen = vec![false; lessons.len()];
        for hit in hits {
            let Some(lesson) = lessons.get(hit.index) else {
                continue;
            };
            if exact[hit.index] {
                seen[hit.index] = true;
                ranked.push(lesson);
            }
        }
        // Substring matches the index did not score follow in catalog order.
        ranked.extend(
            lessons
                .iter()
                .zip(exact.iter().zip(&seen))
                .filter(|(_, (is_exact, scored))| **is_exact && !**scored)
                .map(|(l, _)| l),
        );
        ranked
    }

    /// Map page results: scope, thematic, substring query.
    pub fn assets<'a>(&self, catalog: &'a Catalog, state: &FilterState) -> Vec<&'a MapAsset> {
        let out = filter_assets(
            catalog.assets(),
            state,
            &self.options.collection,
            &self.current_user,
        );
        debug!(
            query = %state.query,
            scope = ?state.scope,
            thematic = state.thematic,
            results = out.len(),
            "asset query"
        );
        out
    }

    /// Facet groups counted against the unfiltered repository.
    pub fn lesson_facets(&self, catalog: &Catalog) -> Vec<FacetGroup> {
        lesson_facets(catalog.lessons())
    }

    pub fn suggestions(&self, catalog: &Catalog, query: &str) -> Vec<SearchSuggestion> {
        suggestions(catalog.lessons(), catalog.assets(), query)
    }
}
