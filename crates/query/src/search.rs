//! Approximate string matching over weighted fields.
//!
//! `SearchIndex` is the seam the rest of the engine depends on; `FuzzyIndex`
//! is the in-process implementation (token-level normalized Levenshtein via
//! `strsim`). Any other matcher can be swapped in behind the trait.

use catalog::{Lesson, MapAsset};
use foundation::precision::stable_total_cmp_f64_desc;

/// One ranked match: position of the record in the indexed slice plus a
/// relevance in `[0, 1]` (higher is better).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SearchHit {
    pub index: usize,
    pub score: f64,
}

pub trait SearchIndex {
    /// Ranked matches for `query`. Identical queries against an unchanged
    /// index return identical order; ties keep indexed order.
    fn query(&self, query: &str) -> Vec<SearchHit>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    EmptyIndex,
    InvalidWeights,
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::EmptyIndex => write!(f, "cannot index an empty record set"),
            SearchError::InvalidWeights => write!(f, "field weights must be positive and finite"),
        }
    }
}

impl std::error::Error for SearchError {}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FuzzyOptions {
    /// Maximum normalized edit distance for a token to count as a match.
    pub threshold: f64,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self { threshold: 0.3 }
    }
}

pub const LESSON_TITLE_WEIGHT: f64 = 0.4;
pub const LESSON_TAGS_WEIGHT: f64 = 0.3;
pub const LESSON_AUTHOR_WEIGHT: f64 = 0.2;
pub const LESSON_CITY_WEIGHT: f64 = 0.1;

pub const ASSET_TITLE_WEIGHT: f64 = 0.4;
pub const ASSET_AUTHOR_WEIGHT: f64 = 0.2;
pub const ASSET_TAGS_WEIGHT: f64 = 0.2;
pub const ASSET_DESCRIPTION_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone)]
struct Field {
    weight: f64,
    /// Lowercased values; multi-valued for tags.
    values: Vec<String>,
    tokens: Vec<String>,
}

impl Field {
    fn new(weight: f64, values: Vec<String>) -> Self {
        let values: Vec<String> = values.into_iter().map(|v| v.to_lowercase()).collect();
        let tokens = values.iter().flat_map(|v| tokenize(v)).collect();
        Self {
            weight,
            values,
            tokens,
        }
    }

    fn contains(&self, term: &str) -> bool {
        self.values.iter().any(|v| v.contains(term))
    }

    /// Best token similarity for a term that is not a substring hit.
    fn similarity(&self, term: &str) -> f64 {
        self.tokens
            .iter()
            .map(|t| strsim::normalized_levenshtein(term, t))
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone)]
struct Document {
    fields: Vec<Field>,
}

/// Weighted-field fuzzy index over a fixed slice of records.
#[derive(Debug, Clone)]
pub struct FuzzyIndex {
    docs: Vec<Document>,
    total_weight: f64,
    options: FuzzyOptions,
}

impl FuzzyIndex {
    fn build(docs: Vec<Document>, options: FuzzyOptions) -> Result<Self, SearchError> {
        let Some(first) = docs.first() else {
            return Err(SearchError::EmptyIndex);
        };
        if first
            .fields
            .iter()
            .any(|f| !(f.weight.is_finite() && f.weight > 0.0))
        {
            return Err(SearchError::InvalidWeights);
        }
        let total_weight = first.fields.iter().map(|f| f.weight).sum();
        Ok(Self {
            docs,
            total_weight,
            options,
        })
    }

    pub fn for_lessons(lessons: &[Lesson], options: FuzzyOptions) -> Result<Self, SearchError> {
        let docs = lessons
            .iter()
            .map(|l| Document {
                fields: vec![
                    Field::new(LESSON_TITLE_WEIGHT, vec![l.title.clone()]),
                    Field::new(LESSON_TAGS_WEIGHT, l.tags.clone()),
                    Field::new(LESSON_AUTHOR_WEIGHT, vec![l.author.clone()]),
                    Field::new(LESSON_CITY_WEIGHT, vec![l.location.city.clone()]),
                ],
            })
            .collect();
        Self::build(docs, options)
    }

    pub fn for_assets(assets: &[MapAsset], options: FuzzyOptions) -> Result<Self, SearchError> {
        let docs = assets
            .iter()
            .map(|a| Document {
                fields: vec![
                    Field::new(ASSET_TITLE_WEIGHT, vec![a.title.clone()]),
                    Field::new(ASSET_AUTHOR_WEIGHT, vec![a.author.clone()]),
                    Field::new(ASSET_TAGS_WEIGHT, a.tags.clone()),
                    Field::new(ASSET_DESCRIPTION_WEIGHT, vec![a.description.clone()]),
                ],
            })
            .collect();
        Self::build(docs, options)
    }

    /// Contribution of one query term, taken from its best field.
    ///
    /// A substring hit scores `1 + w` and a near miss `w * similarity`, with
    /// `w` the field's share of the total weight. Any exact term therefore
    /// outranks any typo.
    fn term_relevance(&self, doc: &Document, term: &str) -> Option<f64> {
        let min_similarity = 1.0 - self.options.threshold;
        let mut exact: Option<f64> = None;
        let mut near: Option<f64> = None;
        for field in &doc.fields {
            let share = field.weight / self.total_weight;
            if field.contains(term) {
                exact = Some(exact.map_or(share, |e: f64| e.max(share)));
                continue;
            }
            let s = field.similarity(term);
            if s >= min_similarity {
                let score = share * s;
                near = Some(near.map_or(score, |n: f64| n.max(score)));
            }
        }
        exact.map(|share| 1.0 + share).or(near)
    }

    /// Every term must match some field; the score is the mean term
    /// contribution scaled into `[0, 1]`.
    fn relevance(&self, doc: &Document, terms: &[String]) -> Option<f64> {
        let mut total = 0.0;
        for term in terms {
            total += self.term_relevance(doc, term)?;
        }
        Some(total / terms.len() as f64 / 2.0)
    }
}

impl SearchIndex for FuzzyIndex {
    fn query(&self, query: &str) -> Vec<SearchHit> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return (0..self.docs.len())
                .map(|index| SearchHit { index, score: 1.0 })
                .collect();
        }

        let mut hits: Vec<SearchHit> = self
            .docs
            .iter()
            .enumerate()
            .filter_map(|(index, doc)| {
                self.relevance(doc, &terms)
                    .map(|score| SearchHit { index, score })
            })
            .collect();
        // Stable: equal scores keep indexed order.
        hits.sort_by(|a, b| stable_total_cmp_f64_desc(a.score, b.score));
        hits
    }

    fn len(&self) -> usize {
        self.docs.len()
    }
}

/// Lowercase alphanumeric runs.
pub fn tokenize(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::seed::{seed_assets, seed_lessons};
    use pretty_assertions::assert_eq;

    fn lesson_index() -> FuzzyIndex {
        FuzzyIndex::for_lessons(&seed_lessons(), FuzzyOptions::default()).unwrap()
    }

    fn indices(hits: &[SearchHit]) -> Vec<usize> {
        hits.iter().map(|h| h.index).collect()
    }

    #[test]
    fn empty_query_returns_default_order_unpenalized() {
        let hits = lesson_index().query("  ");
        assert_eq!(indices(&hits), vec![0, 1, 2, 3]);
        assert!(hits.iter().all(|h| h.score == 1.0));
    }

    #[test]
    fn rome_matches_only_the_rome_lesson() {
        let hits = lesson_index().query("rome");
        assert_eq!(indices(&hits), vec![0]);
    }

    #[test]
    fn tolerates_a_typo() {
        let hits = lesson_index().query("baroqe");
        assert_eq!(indices(&hits), vec![3]);
    }

    #[test]
    fn title_outranks_author_only_match() {
        let mut lessons = seed_lessons();
        lessons[1].author = "Vienna Studio".to_string();
        let index = FuzzyIndex::for_lessons(&lessons, FuzzyOptions::default()).unwrap();
        let hits = index.query("vienna");
        assert_eq!(indices(&hits), vec![3, 1]);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn ties_keep_indexed_order() {
        let hits = lesson_index().query("center");
        assert_eq!(indices(&hits), vec![1, 2]);
        assert_eq!(hits[0].score, hits[1].score);
    }

    #[test]
    fn terms_may_match_different_fields() {
        // "forum" only in l1's title, "italy" only in its tags.
        assert_eq!(indices(&lesson_index().query("forum italy")), vec![0]);
        assert_eq!(indices(&lesson_index().query("Italy, Forum")), vec![0]);
    }

    #[test]
    fn every_term_must_match_somewhere() {
        assert!(lesson_index().query("forum baroque").is_empty());
    }

    #[test]
    fn exact_match_outranks_near_miss_title() {
        let mut lessons = seed_lessons();
        lessons[1].title = "Home Economics".to_string();
        let index = FuzzyIndex::for_lessons(&lessons, FuzzyOptions::default()).unwrap();
        let hits = index.query("rome");
        assert_eq!(indices(&hits), vec![0, 1]);
        assert!(hits[0].score >= 0.5);
        assert!(hits[1].score < 0.5);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let index = lesson_index();
        assert_eq!(index.query("architecture"), index.query("architecture"));
    }

    #[test]
    fn empty_record_set_cannot_be_indexed() {
        assert_eq!(
            FuzzyIndex::for_lessons(&[], FuzzyOptions::default()).unwrap_err(),
            SearchError::EmptyIndex
        );
    }

    #[test]
    fn asset_profile_searches_description() {
        let index = FuzzyIndex::for_assets(&seed_assets(), FuzzyOptions::default()).unwrap();
        assert_eq!(indices(&index.query("turquoise")), vec![2]);
    }

    #[test]
    fn tokenize_splits_on_punctuation() {
        assert_eq!(
            tokenize("Ancient Rome: Forum & Temples"),
            vec!["ancient", "rome", "forum", "temples"]
        );
        assert!(tokenize(" & ").is_empty());
    }
}
