use std::collections::BTreeMap;

use catalog::Catalog;
use foundation::geo::{CoordKey, LatLng};
use foundation::ids::AssetId;
use serde::{Deserialize, Serialize};
use session::SelectionSet;
use tracing::{debug, warn};

use crate::cluster::{Cluster, ClusterRenderer, ClusterVisual, Clusterer};
use crate::grouping::LocationGroup;
use crate::marker::{MarkerAction, MarkerVisual};
use crate::service::{LOCATE_ZOOM, MapError, MapOptions, MapService};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapStatus {
    Loading,
    Ready,
    /// Initialization failed; the map area stays degraded for the session.
    Failed(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Keeps the service's markers in step with the filtered asset groups.
///
/// Every marker-dependent call returns `MapError::NotReady` until
/// [`MapLayer::initialize`] has succeeded; nothing is queued.
#[derive(Debug)]
pub struct MapLayer<S: MapService> {
    service: S,
    options: MapOptions,
    status: MapStatus,
    view: MapView,
    markers: BTreeMap<CoordKey, MarkerVisual>,
}

impl<S: MapService> MapLayer<S> {
    pub fn new(service: S, options: MapOptions) -> Self {
        let view = MapView {
            center: options.center,
            zoom: options.zoom,
        };
        Self {
            service,
            options,
            status: MapStatus::Loading,
            view,
            markers: BTreeMap::new(),
        }
    }

    pub async fn initialize(&mut self) -> &MapStatus {
        if self.status != MapStatus::Loading {
            return &self.status;
        }
        self.status = match self.service.initialize(&self.options).await {
            Ok(()) => {
                debug!(zoom = self.options.zoom, "map ready");
                MapStatus::Ready
            }
            Err(e) => {
                warn!(error = %e, "map initialization failed");
                MapStatus::Failed(e.to_string())
            }
        };
        &self.status
    }

    pub fn status(&self) -> &MapStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == MapStatus::Ready
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerVisual> + '_ {
        self.markers.values()
    }

    fn ensure_ready(&self) -> Result<(), MapError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(MapError::NotReady)
        }
    }

    /// Replaces the marker set with one marker per group.
    pub fn sync(
        &mut self,
        groups: &[LocationGroup<'_>],
        selection: &SelectionSet,
    ) -> Result<SyncReport, MapError> {
        self.ensure_ready()?;
        let mut report = SyncReport::default();
        let mut next: BTreeMap<CoordKey, MarkerVisual> = BTreeMap::new();

        for group in groups {
            let visual = MarkerVisual::for_group(group, selection);
            match self.markers.get(&visual.key) {
                Some(old) if *old == visual => {}
                Some(_) => {
                    self.service.upsert_marker(&visual);
                    report.updated += 1;
                }
                None => {
                    self.service.upsert_marker(&visual);
                    report.added += 1;
                }
            }
            next.insert(visual.key, visual);
        }

        for key in self.markers.keys() {
            if !next.contains_key(key) {
                self.service.remove_marker(*key);
                report.removed += 1;
            }
        }
        self.markers = next;
        debug!(
            markers = self.markers.len(),
            added = report.added,
            updated = report.updated,
            removed = report.removed,
            "markers synced"
        );
        Ok(report)
    }

    pub fn click(&self, key: CoordKey) -> Result<Option<MarkerAction>, MapError> {
        self.ensure_ready()?;
        Ok(self.markers.get(&key).and_then(MarkerVisual::click_action))
    }

    /// Back to the initial world view.
    pub fn zoom_out(&mut self) -> Result<MapView, MapError> {
        self.ensure_ready()?;
        self.set_view(self.options.center, self.options.zoom);
        Ok(self.view)
    }

    pub fn locate(&mut self, catalog: &Catalog, asset: &AssetId) -> Result<Option<MapView>, MapError> {
        self.ensure_ready()?;
        let Some(position) = catalog.coordinate(asset) else {
            return Ok(None);
        };
        self.set_view(position, LOCATE_ZOOM);
        Ok(Some(self.view))
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.view = MapView { center, zoom };
        self.service.set_view(center, zoom);
    }

    /// Clusters the current markers at the current zoom and renders each.
    pub fn clusters(
        &self,
        clusterer: &impl Clusterer,
        renderer: &impl ClusterRenderer,
    ) -> Result<Vec<(Cluster, ClusterVisual)>, MapError> {
        self.ensure_ready()?;
        let markers: Vec<MarkerVisual> = self.markers.values().cloned().collect();
        Ok(clusterer
            .cluster(&markers, self.view.zoom)
            .into_iter()
            .map(|c| {
                let visual = renderer.render(&c);
                (c, visual)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{CountBadgeRenderer, GridClusterer};
    use crate::grouping::group_in_catalog;
    use crate::service::{DEFAULT_CENTER, DEFAULT_ZOOM, HeadlessMapService};
    use catalog::{CatalogSnapshot, MapAsset, Visibility};
    use foundation::ids::UserId;
    use pretty_assertions::assert_eq;

    async fn ready_layer() -> MapLayer<HeadlessMapService> {
        let mut layer = MapLayer::new(HeadlessMapService::new(), MapOptions::default());
        assert_eq!(layer.initialize().await, &MapStatus::Ready);
        layer
    }

    fn twelve_at_one_spot() -> Catalog {
        let spot = LatLng::new(42.63605, 24.3582);
        let mut snap = CatalogSnapshot::default();
        for i in 1..=12 {
            let id = AssetId::new(format!("s{i}"));
            snap.assets.push(MapAsset {
                id: id.clone(),
                title: format!("View {i}"),
                author: "SENA Competence Center".into(),
                author_id: UserId::from("user_02"),
                tags: vec!["Bulgaria".into()],
                description: String::new(),
                thumb: String::new(),
                visibility: Visibility::Public,
            });
            snap.placements.insert(id, spot);
        }
        Catalog::from_snapshot(snap).unwrap()
    }

    #[tokio::test]
    async fn failed_initialization_degrades_locally() {
        let mut layer = MapLayer::new(HeadlessMapService::failing("quota"), MapOptions::default());
        assert_eq!(layer.status(), &MapStatus::Loading);
        let status = layer.initialize().await.clone();
        assert!(matches!(status, MapStatus::Failed(reason) if reason.contains("quota")));

        let catalog = Catalog::seed().unwrap();
        let assets: Vec<&MapAsset> = catalog.assets().iter().collect();
        let groups = group_in_catalog(&catalog, &assets);
        assert_eq!(
            layer.sync(&groups, &SelectionSet::new()),
            Err(MapError::NotReady)
        );
        assert_eq!(layer.click(groups[0].key), Err(MapError::NotReady));
        assert!(layer.service().markers.is_empty());
    }

    #[tokio::test]
    async fn stack_of_twelve_opens_stack_browser() {
        let catalog = twelve_at_one_spot();
        let assets: Vec<&MapAsset> = catalog.assets().iter().collect();
        let groups = group_in_catalog(&catalog, &assets);
        assert_eq!(groups.len(), 1);

        let mut layer = ready_layer().await;
        layer.sync(&groups, &SelectionSet::new()).unwrap();
        let marker = layer.markers().next().unwrap();
        assert_eq!(marker.badge_label().as_deref(), Some("12"));

        let expected: Vec<AssetId> = (1..=12).map(|i| AssetId::new(format!("s{i}"))).collect();
        assert_eq!(
            layer.click(groups[0].key).unwrap(),
            Some(MarkerAction::OpenStack(expected))
        );
    }

    #[tokio::test]
    async fn sync_diffs_against_previous_markers() {
        let catalog = Catalog::seed().unwrap();
        let all: Vec<&MapAsset> = catalog.assets().iter().collect();
        let mut layer = ready_layer().await;

        let report = layer
            .sync(&group_in_catalog(&catalog, &all), &SelectionSet::new())
            .unwrap();
        assert_eq!(report, SyncReport { added: 4, updated: 0, removed: 0 });

        let mut selection = SelectionSet::new();
        selection.insert(AssetId::from("ma2"));
        let fewer: Vec<&MapAsset> = all.iter().copied().filter(|a| a.id.as_str() != "ma4").collect();
        let report = layer
            .sync(&group_in_catalog(&catalog, &fewer), &selection)
            .unwrap();
        assert_eq!(report, SyncReport { added: 0, updated: 1, removed: 1 });
        assert_eq!(layer.service().markers.len(), 3);
    }

    #[tokio::test]
    async fn zoom_out_and_locate_move_the_view() {
        let catalog = Catalog::seed().unwrap();
        let mut layer = ready_layer().await;

        let view = layer.locate(&catalog, &AssetId::from("ma4")).unwrap().unwrap();
        assert_eq!(view.zoom, LOCATE_ZOOM);
        assert_eq!(view.center, LatLng::new(48.1915, 16.3809));
        assert_eq!(layer.locate(&catalog, &AssetId::from("nope")).unwrap(), None);

        let view = layer.zoom_out().unwrap();
        assert_eq!(view, MapView { center: DEFAULT_CENTER, zoom: DEFAULT_ZOOM });
        assert_eq!(layer.service().view, Some((DEFAULT_CENTER, DEFAULT_ZOOM)));
    }

    #[tokio::test]
    async fn clusters_render_with_counts() {
        let catalog = Catalog::seed().unwrap();
        let all: Vec<&MapAsset> = catalog.assets().iter().collect();
        let mut layer = ready_layer().await;
        layer
            .sync(&group_in_catalog(&catalog, &all), &SelectionSet::new())
            .unwrap();
        let clusters = layer
            .clusters(&GridClusterer::default(), &CountBadgeRenderer)
            .unwrap();
        let total: usize = clusters.iter().map(|(c, _)| c.asset_count).sum();
        assert_eq!(total, 5);
        for (cluster, visual) in &clusters {
            assert_eq!(visual.label, cluster.asset_count.to_string());
        }
    }
}
