use foundation::ids::AssetId;
use serde::{Deserialize, Serialize};

use crate::selection::SelectionSet;

pub const MIN_DRAFT_TAGS: usize = 5;
const MAX_TAG_SUGGESTIONS: usize = 5;

/// A lesson being composed from selected map assets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDraft {
    pub title: String,
    pub tags: Vec<String>,
    /// Seeded from the selection, in selection order.
    pub asset_ids: Vec<AssetId>,
    /// Whether the lesson joins the thematic collection.
    pub thematic: bool,
}

impl LessonDraft {
    pub fn from_selection(selection: &SelectionSet) -> Self {
        Self {
            asset_ids: selection.ids().to_vec(),
            ..Self::default()
        }
    }

    pub fn title_is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn tags_are_valid(&self) -> bool {
        self.tags.len() >= MIN_DRAFT_TAGS
    }

    pub fn is_complete(&self) -> bool {
        self.title_is_valid() && self.tags_are_valid()
    }

    pub fn missing_tags(&self) -> usize {
        MIN_DRAFT_TAGS.saturating_sub(self.tags.len())
    }

    /// Adds a trimmed tag. Blank and already-present tags are ignored.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Adds each comma-separated part of `input`. Returns how many were new.
    pub fn add_tags_from_input(&mut self, input: &str) -> usize {
        input.split(',').filter(|part| self.add_tag(part)).count()
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Known tags containing `input` (case-insensitive) that the draft does
    /// not carry yet.
    pub fn tag_suggestions<'a>(&self, known: &[&'a str], input: &str) -> Vec<&'a str> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        known
            .iter()
            .copied()
            .filter(|t| !self.tags.iter().any(|have| have == t))
            .filter(|t| t.to_lowercase().contains(&needle))
            .take(MAX_TAG_SUGGESTIONS)
            .collect()
    }
}
