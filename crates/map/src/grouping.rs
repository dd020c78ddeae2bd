use std::collections::BTreeMap;

use catalog::{Catalog, MapAsset};
use foundation::geo::{CoordKey, LatLng};
use foundation::ids::AssetId;
use tracing::warn;

/// Assets sharing one exact coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationGroup<'a> {
    pub key: CoordKey,
    pub position: LatLng,
    /// Members in the order they appeared in the input list.
    pub assets: Vec<&'a MapAsset>,
}

impl<'a> LocationGroup<'a> {
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn is_stack(&self) -> bool {
        self.assets.len() > 1
    }

    /// Representative asset shown on the marker.
    pub fn lead(&self) -> Option<&'a MapAsset> {
        self.assets.first().copied()
    }

    pub fn asset_ids(&self) -> Vec<AssetId> {
        self.assets.iter().map(|a| a.id.clone()).collect()
    }
}

/// Partitions `assets` by exact coordinate.
///
/// Groups come out in first-seen order. Assets with no known position are
/// skipped.
pub fn group_by_coordinate<'a>(
    assets: &[&'a MapAsset],
    position_of: impl Fn(&AssetId) -> Option<LatLng>,
) -> Vec<LocationGroup<'a>> {
    let mut slot_of: BTreeMap<CoordKey, usize> = BTreeMap::new();
    let mut groups: Vec<LocationGroup<'a>> = Vec::new();

    for &asset in assets {
        let Some(position) = position_of(&asset.id) else {
            warn!(asset = %asset.id, "asset has no position; not placed");
            continue;
        };
        let key = position.key();
        match slot_of.get(&key) {
            Some(&slot) => groups[slot].assets.push(asset),
            None => {
                slot_of.insert(key, groups.len());
                groups.push(LocationGroup {
                    key,
                    position,
                    assets: vec![asset],
                });
            }
        }
    }
    groups
}

/// Groups using the catalog's fixed placements.
pub fn group_in_catalog<'a>(catalog: &Catalog, assets: &[&'a MapAsset]) -> Vec<LocationGroup<'a>> {
    group_by_coordinate(assets, |id| catalog.coordinate(id))
}
