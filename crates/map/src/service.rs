use std::future::Future;

use foundation::geo::{CoordKey, LatLng};
use serde::{Deserialize, Serialize};

use crate::marker::MarkerVisual;

pub const DEFAULT_CENTER: LatLng = LatLng::new(20.0, 0.0);
pub const DEFAULT_ZOOM: u8 = 2;
/// Zoom used when jumping to a single asset.
pub const LOCATE_ZOOM: u8 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: u8,
    /// Opaque style identifier handed to the map service.
    pub style: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            style: "DEMO_MAP_ID".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    LibraryUnavailable(String),
    NotReady,
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::LibraryUnavailable(msg) => write!(f, "map library unavailable: {msg}"),
            MapError::NotReady => write!(f, "map is not ready"),
        }
    }
}

impl std::error::Error for MapError {}

/// Boundary to the external map SDK.
///
/// `initialize` may suspend (library download); nothing else is called
/// before it has resolved successfully.
pub trait MapService {
    fn initialize(
        &mut self,
        options: &MapOptions,
    ) -> impl Future<Output = Result<(), MapError>> + Send;

    fn upsert_marker(&mut self, marker: &MarkerVisual);

    fn remove_marker(&mut self, key: CoordKey);

    fn set_view(&mut self, center: LatLng, zoom: u8);
}

/// Map service that keeps everything in memory. Used by the CLI and tests.
#[derive(Debug, Default, Clone)]
pub struct HeadlessMapService {
    pub markers: std::collections::BTreeMap<CoordKey, MarkerVisual>,
    pub view: Option<(LatLng, u8)>,
    /// When set, `initialize` fails with this reason.
    pub fail_with: Option<String>,
}

impl HeadlessMapService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }
}

impl MapService for HeadlessMapService {
    fn initialize(
        &mut self,
        options: &MapOptions,
    ) -> impl Future<Output = Result<(), MapError>> + Send {
        let result = match &self.fail_with {
            Some(reason) => Err(MapError::LibraryUnavailable(reason.clone())),
            None => {
                self.view = Some((options.center, options.zoom));
                Ok(())
            }
        };
        std::future::ready(result)
    }

    fn upsert_marker(&mut self, marker: &MarkerVisual) {
        self.markers.insert(marker.key, marker.clone());
    }

    fn remove_marker(&mut self, key: CoordKey) {
        self.markers.remove(&key);
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.view = Some((center, zoom));
    }
}
