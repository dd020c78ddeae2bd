use std::cmp::Ordering;

use catalog::Lesson;
use foundation::precision::stable_total_cmp_f64_desc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Keep the order produced by the filter chain (or search ranking).
    #[default]
    Relevance,
    /// Rating, highest first.
    Rating,
    /// Favorites, most first.
    Favorites,
    /// Title, A to Z.
    Title,
}

impl SortBy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Some(SortBy::Relevance),
            "rating" => Some(SortBy::Rating),
            "favorites" | "popularity" => Some(SortBy::Favorites),
            "title" => Some(SortBy::Title),
            _ => None,
        }
    }
}

fn compare(a: &Lesson, b: &Lesson, by: SortBy) -> Ordering {
    match by {
        SortBy::Relevance => Ordering::Equal,
        SortBy::Rating => stable_total_cmp_f64_desc(a.rating, b.rating),
        SortBy::Favorites => b.favorites.cmp(&a.favorites),
        SortBy::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title)),
    }
}

/// Stable reordering after the filter chain. Ties keep their incoming order.
pub fn sort_lessons(lessons: &mut [&Lesson], by: SortBy) {
    if by == SortBy::Relevance {
        return;
    }
    lessons.sort_by(|a, b| compare(a, b, by));
}
