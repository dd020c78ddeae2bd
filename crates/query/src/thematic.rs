use serde::{Deserialize, Serialize};

/// A named, tag-derived subset of the catalog.
///
/// A record belongs to the collection when any of its tags contains `needle`
/// (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThematicCollection {
    pub name: String,
    needle: String,
}

impl ThematicCollection {
    pub fn new(name: impl Into<String>, needle: &str) -> Self {
        Self {
            name: name.into(),
            needle: needle.to_lowercase(),
        }
    }

    pub fn roman_empire() -> Self {
        Self::new("Roman Empire", "rome")
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn matches_tags(&self, tags: &[String]) -> bool {
        tags.iter()
            .any(|t| t.to_lowercase().contains(&self.needle))
    }
}

impl Default for ThematicCollection {
    fn default() -> Self {
        Self::roman_empire()
    }
}
