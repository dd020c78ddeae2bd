//! Multi-scale clustering boundary.
//!
//! Real deployments hand markers to the map SDK's clustering library; the
//! grid clusterer here is a deterministic stand-in with the same contract.

use std::collections::BTreeMap;

use foundation::geo::{CoordKey, LatLng};
use foundation::precision::canonical_f64;
use serde::{Deserialize, Serialize};

use crate::marker::MarkerVisual;

/// Nearby markers merged at some zoom level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub position: LatLng,
    /// Member markers in input order.
    pub markers: Vec<CoordKey>,
    /// Total assets under the cluster (stacks count every member).
    pub asset_count: usize,
    pub selected: bool,
}

pub trait Clusterer {
    fn cluster(&self, markers: &[MarkerVisual], zoom: u8) -> Vec<Cluster>;
}

/// Produces the visual for a cluster. Invoked once per cluster.
pub trait ClusterRenderer {
    fn render(&self, cluster: &Cluster) -> ClusterVisual;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterVisual {
    pub label: String,
    pub selected: bool,
}

/// Labels a cluster with its asset count.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountBadgeRenderer;

impl ClusterRenderer for CountBadgeRenderer {
    fn render(&self, cluster: &Cluster) -> ClusterVisual {
        ClusterVisual {
            label: cluster.asset_count.to_string(),
            selected: cluster.selected,
        }
    }
}

/// Buckets markers into square cells whose size halves with every zoom level.
#[derive(Debug, Clone, Copy)]
pub struct GridClusterer {
    /// Cell edge in degrees at zoom 0.
    pub base_cell_deg: f64,
}

impl Default for GridClusterer {
    fn default() -> Self {
        Self {
            base_cell_deg: 60.0,
        }
    }
}

impl GridClusterer {
    pub fn cell_deg(&self, zoom: u8) -> f64 {
        self.base_cell_deg / f64::from(1u32 << zoom.min(24))
    }
}

impl Clusterer for GridClusterer {
    fn cluster(&self, markers: &[MarkerVisual], zoom: u8) -> Vec<Cluster> {
        let cell = self.cell_deg(zoom);
        let mut slot_of: BTreeMap<(i64, i64), usize> = BTreeMap::new();
        let mut buckets: Vec<Vec<&MarkerVisual>> = Vec::new();

        for m in markers {
            let cx = (m.position.lat / cell).floor() as i64;
            let cy = (m.position.lng / cell).floor() as i64;
            let slot = *slot_of.entry((cx, cy)).or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
            buckets[slot].push(m);
        }

        buckets
            .into_iter()
            .map(|members| {
                let n = members.len() as f64;
                let lat = members.iter().map(|m| m.position.lat).sum::<f64>() / n;
                let lng = members.iter().map(|m| m.position.lng).sum::<f64>() / n;
                Cluster {
                    position: LatLng::new(canonical_f64(lat), canonical_f64(lng)),
                    markers: members.iter().map(|m| m.key).collect(),
                    asset_count: members.iter().map(|m| m.members.len()).sum(),
                    selected: members.iter().any(|m| m.selected),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn marker(lat: f64, lng: f64, members: usize, selected: bool) -> MarkerVisual {
        let position = LatLng::new(lat, lng);
        MarkerVisual {
            key: position.key(),
            position,
            selected,
            badge: (members > 1).then_some(members),
            thumb: String::new(),
            title: String::new(),
            members: (0..members)
                .map(|i| foundation::ids::AssetId::new(format!("a{lat}-{i}")))
                .collect(),
        }
    }

    #[test]
    fn world_view_merges_the_balkans() {
        let markers = vec![
            marker(42.63605, 24.3582, 2, false),
            marker(41.8925, 12.4853, 1, true),
            marker(38.8301, 20.7038, 1, false),
            marker(48.1915, 16.3809, 1, false),
        ];
        let clusters = GridClusterer::default().cluster(&markers, 2);
        let total: usize = clusters.iter().map(|c| c.asset_count).sum();
        assert_eq!(total, 5);
        assert!(clusters.len() < markers.len());
        assert!(clusters.iter().any(|c| c.selected));
    }

    #[test]
    fn close_zoom_keeps_markers_apart() {
        let markers = vec![
            marker(42.63605, 24.3582, 2, false),
            marker(41.8925, 12.4853, 1, false),
        ];
        let clusters = GridClusterer::default().cluster(&markers, 12);
        assert_eq!(clusters.len(), 2);
        let label = CountBadgeRenderer.render(&clusters[0]).label;
        assert_eq!(label, "2");
    }
}
