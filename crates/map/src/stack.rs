use catalog::{Catalog, MapAsset};
use foundation::ids::AssetId;
use session::{Command, SelectionSet};

/// Browser over the members of one stack marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackBrowser {
    assets: Vec<AssetId>,
}

impl StackBrowser {
    pub fn new(assets: Vec<AssetId>) -> Self {
        Self { assets }
    }

    pub fn asset_ids(&self) -> &[AssetId] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn entries<'a>(&self, catalog: &'a Catalog) -> Vec<&'a MapAsset> {
        self.assets.iter().filter_map(|id| catalog.asset(id)).collect()
    }

    pub fn selected_count(&self, selection: &SelectionSet) -> usize {
        self.assets.iter().filter(|id| selection.contains(id)).count()
    }

    pub fn all_selected(&self, selection: &SelectionSet) -> bool {
        !self.assets.is_empty() && self.selected_count(selection) == self.assets.len()
    }

    /// The header button: deselect the stack when fully selected, otherwise
    /// select every member.
    pub fn select_toggle_command(&self, selection: &SelectionSet) -> Command {
        if self.all_selected(selection) {
            Command::DeselectAll(self.assets.clone())
        } else {
            Command::SelectAll(self.assets.clone())
        }
    }
}
