use catalog::Lesson;
use serde::{Deserialize, Serialize};

/// Declared facet dimensions for lessons.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKey {
    Level,
    Language,
    Author,
}

impl FacetKey {
    pub const ALL: [FacetKey; 3] = [FacetKey::Level, FacetKey::Language, FacetKey::Author];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetKey::Level => "level",
            FacetKey::Language => "language",
            FacetKey::Author => "author",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FacetKey::Level => "Difficulty Level",
            FacetKey::Language => "Language",
            FacetKey::Author => "Author",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        FacetKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// The value `lesson` carries for this dimension.
    pub fn value_of<'a>(&self, lesson: &'a Lesson) -> &'a str {
        match self {
            FacetKey::Level => lesson.level.as_str(),
            FacetKey::Language => &lesson.language,
            FacetKey::Author => &lesson.author,
        }
    }
}

impl std::fmt::Display for FacetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetGroup {
    pub key: FacetKey,
    pub label: String,
    pub options: Vec<FacetOption>,
}

impl FacetGroup {
    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    pub fn count(&self, value: &str) -> Option<usize> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.count)
    }
}

/// Distinct values and per-value counts for every declared dimension.
///
/// Options are listed in first-seen order over `lessons`. Callers pass the
/// unfiltered repository so counts do not shift as other filters change.
pub fn lesson_facets(lessons: &[Lesson]) -> Vec<FacetGroup> {
    FacetKey::ALL
        .into_iter()
        .map(|key| FacetGroup {
            key,
            label: key.label().to_string(),
            options: count_values(lessons, key),
        })
        .collect()
}

fn count_values(lessons: &[Lesson], key: FacetKey) -> Vec<FacetOption> {
    let mut options: Vec<FacetOption> = Vec::new();
    for lesson in lessons {
        let value = key.value_of(lesson);
        match options.iter_mut().find(|o| o.value == value) {
            Some(o) => o.count += 1,
            None => options.push(FacetOption {
                value: value.to_string(),
                count: 1,
            }),
        }
    }
    options
}
