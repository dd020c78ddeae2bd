use catalog::thumbnail_or_placeholder;
use foundation::geo::{CoordKey, LatLng};
use foundation::ids::AssetId;
use serde::{Deserialize, Serialize};
use session::SelectionSet;

use crate::grouping::LocationGroup;

/// What a marker looks like. One per [`LocationGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerVisual {
    pub key: CoordKey,
    pub position: LatLng,
    /// Highlighted when any member is selected.
    pub selected: bool,
    /// Member count for stacks; `None` for a single pin.
    pub badge: Option<usize>,
    pub thumb: String,
    pub title: String,
    pub members: Vec<AssetId>,
}

impl MarkerVisual {
    pub fn for_group(group: &LocationGroup<'_>, selection: &SelectionSet) -> Self {
        let (thumb, title) = match group.lead() {
            Some(lead) => (
                thumbnail_or_placeholder(&lead.thumb, false).to_string(),
                lead.title.clone(),
            ),
            None => (thumbnail_or_placeholder("", true).to_string(), String::new()),
        };
        let members = group.asset_ids();
        Self {
            key: group.key,
            position: group.position,
            selected: selection.any_of(&members),
            badge: group.is_stack().then(|| group.len()),
            thumb,
            title,
            members,
        }
    }

    pub fn is_stack(&self) -> bool {
        self.badge.is_some()
    }

    pub fn badge_label(&self) -> Option<String> {
        self.badge.map(|n| n.to_string())
    }

    /// Primary interaction: a single pin previews its asset, a stack opens
    /// the stack browser over all members.
    pub fn click_action(&self) -> Option<MarkerAction> {
        match self.members.as_slice() {
            [] => None,
            [only] => Some(MarkerAction::OpenPreview(only.clone())),
            many => Some(MarkerAction::OpenStack(many.to_vec())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerAction {
    OpenPreview(AssetId),
    OpenStack(Vec<AssetId>),
}
