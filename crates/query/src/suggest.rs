use catalog::{Lesson, MapAsset};
use serde::{Deserialize, Serialize};

const MAX_TAGS: usize = 3;
const MAX_AUTHORS: usize = 2;
const MAX_LOCATIONS: usize = 2;
const MAX_SUGGESTIONS: usize = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Tag,
    Author,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSuggestion {
    pub kind: SuggestionKind,
    pub value: String,
    /// Number of records carrying this value.
    pub count: usize,
}

fn push_unique<'a>(out: &mut Vec<&'a str>, value: &'a str) {
    if !out.contains(&value) {
        out.push(value);
    }
}

/// Autocomplete entries for `query`: tags, then authors, then locations,
/// each in first-seen order over lessons followed by assets.
pub fn suggestions(lessons: &[Lesson], assets: &[MapAsset], query: &str) -> Vec<SearchSuggestion> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut tags: Vec<&str> = Vec::new();
    let mut authors: Vec<&str> = Vec::new();
    let mut locations: Vec<&str> = Vec::new();

    for lesson in lessons {
        for tag in &lesson.tags {
            push_unique(&mut tags, tag);
        }
        push_unique(&mut authors, &lesson.author);
        push_unique(&mut locations, &lesson.location.city);
        push_unique(&mut locations, &lesson.location.country);
    }
    for asset in assets {
        for tag in &asset.tags {
            push_unique(&mut tags, tag);
        }
        push_unique(&mut authors, &asset.author);
    }

    let hits = |values: Vec<&str>, limit: usize| -> Vec<String> {
        values
            .into_iter()
            .filter(|v| v.to_lowercase().contains(&needle))
            .take(limit)
            .map(str::to_string)
            .collect()
    };

    let mut out: Vec<SearchSuggestion> = Vec::new();

    for tag in hits(tags, MAX_TAGS) {
        let count = lessons.iter().filter(|l| l.tags.contains(&tag)).count()
            + assets.iter().filter(|a| a.tags.contains(&tag)).count();
        out.push(SearchSuggestion {
            kind: SuggestionKind::Tag,
            value: tag,
            count,
        });
    }

    for author in hits(authors, MAX_AUTHORS) {
        let count = lessons.iter().filter(|l| l.author == author).count()
            + assets.iter().filter(|a| a.author == author).count();
        out.push(SearchSuggestion {
            kind: SuggestionKind::Author,
            value: author,
            count,
        });
    }

    for location in hits(locations, MAX_LOCATIONS) {
        let wanted = location.to_lowercase();
        let count = lessons
            .iter()
            .filter(|l| {
                l.location.city.to_lowercase().contains(&wanted)
                    || l.location.country.to_lowercase().contains(&wanted)
            })
            .count();
        out.push(SearchSuggestion {
            kind: SuggestionKind::Location,
            value: location,
            count,
        });
    }

    out.truncate(MAX_SUGGESTIONS);
    out
}

#[cfg(test)]
mod tests {
    use super::{SearchSuggestion, SuggestionKind, suggestions};
    use catalog::seed::{seed_assets, seed_lessons};
    use pretty_assertions::assert_eq;

    fn s(kind: SuggestionKind, value: &str, count: usize) -> SearchSuggestion {
        SearchSuggestion {
            kind,
            value: value.to_string(),
            count,
        }
    }

    #[test]
    fn blank_query_has_no_suggestions() {
        assert!(suggestions(&seed_lessons(), &seed_assets(), "  ").is_empty());
    }

    #[test]
    fn groups_tags_authors_locations() {
        let out = suggestions(&seed_lessons(), &seed_assets(), "bulgaria");
        assert_eq!(
            out,
            vec![
                s(SuggestionKind::Tag, "Bulgaria", 1),
                s(SuggestionKind::Author, "Interactive Bulgaria Foundation", 3),
                s(SuggestionKind::Location, "Bulgaria", 1),
            ]
        );
    }

    #[test]
    fn caps_each_group() {
        let out = suggestions(&seed_lessons(), &seed_assets(), "e");
        let tags = out.iter().filter(|x| x.kind == SuggestionKind::Tag).count();
        let authors = out.iter().filter(|x| x.kind == SuggestionKind::Author).count();
        let locations = out
            .iter()
            .filter(|x| x.kind == SuggestionKind::Location)
            .count();
        assert_eq!((tags, authors, locations), (3, 2, 2));
        assert!(out.len() <= 8);
    }

    #[test]
    fn tag_counts_span_lessons_and_assets() {
        let out = suggestions(&seed_lessons(), &seed_assets(), "ancient");
        assert_eq!(out[0], s(SuggestionKind::Tag, "Ancient Rome", 2));
    }
}
