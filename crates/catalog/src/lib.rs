use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use foundation::geo::LatLng;
use foundation::ids::{AssetId, LessonId};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod model;
pub mod placeholder;
pub mod seed;

pub use model::*;
pub use placeholder::{placeholder_data_uri, thumbnail_or_placeholder};

/// Raw catalog contents as loaded from a store.
///
/// Array order of `lessons` and `assets` is the presentation order and is
/// preserved by every query.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub lessons: Vec<Lesson>,
    pub assets: Vec<MapAsset>,
    /// Fixed asset placement on the map.
    #[serde(default)]
    pub placements: BTreeMap<AssetId, LatLng>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound,
    DuplicateId(String),
    Corrupt(String),
    Io(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound => write!(f, "catalog not found"),
            CatalogError::DuplicateId(id) => write!(f, "duplicate catalog id: {id}"),
            CatalogError::Corrupt(msg) => write!(f, "catalog corrupt: {msg}"),
            CatalogError::Io(msg) => write!(f, "catalog storage error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Source of catalog contents. Loaded once at startup; never written.
pub trait CatalogStore {
    fn load(&self) -> Result<CatalogSnapshot, CatalogError>;
}

/// The compiled-in demo data.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedCatalogStore;

impl CatalogStore for SeedCatalogStore {
    fn load(&self) -> Result<CatalogSnapshot, CatalogError> {
        Ok(seed::seed_snapshot())
    }
}

/// A JSON document with the same shape as [`CatalogSnapshot`].
#[derive(Debug, Clone)]
pub struct JsonFileCatalogStore {
    path: PathBuf,
}

impl JsonFileCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for JsonFileCatalogStore {
    fn load(&self) -> Result<CatalogSnapshot, CatalogError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CatalogError::NotFound,
            _ => CatalogError::Io(format!("read {:?}: {e}", self.path)),
        })?;
        if raw.trim().is_empty() {
            return Ok(CatalogSnapshot::default());
        }
        let snapshot = serde_json::from_str::<CatalogSnapshot>(&raw)
            .map_err(|e| CatalogError::Corrupt(e.to_string()))?;
        debug!(
            path = %self.path.display(),
            lessons = snapshot.lessons.len(),
            assets = snapshot.assets.len(),
            "loaded catalog file"
        );
        Ok(snapshot)
    }
}

/// Content hash of a snapshot: blake3 over its canonical JSON.
pub fn fingerprint(snapshot: &CatalogSnapshot) -> Result<String, CatalogError> {
    let bytes = serde_json::to_vec(snapshot).map_err(|e| CatalogError::Corrupt(e.to_string()))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// Immutable, validated content repository.
///
/// Read-only after construction; share it behind `Arc` without locking.
#[derive(Debug, Clone)]
pub struct Catalog {
    snapshot: CatalogSnapshot,
    lesson_index: BTreeMap<LessonId, usize>,
    asset_index: BTreeMap<AssetId, usize>,
    fingerprint: String,
}

impl Catalog {
    pub fn load(store: &impl CatalogStore) -> Result<Self, CatalogError> {
        Self::from_snapshot(store.load()?)
    }

    pub fn seed() -> Result<Self, CatalogError> {
        Self::load(&SeedCatalogStore)
    }

    /// Validates ids and placements, then indexes the snapshot.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self, CatalogError> {
        let mut lesson_index = BTreeMap::new();
        for (i, lesson) in snapshot.lessons.iter().enumerate() {
            if lesson_index.insert(lesson.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(lesson.id.to_string()));
            }
        }

        let mut asset_index = BTreeMap::new();
        for (i, asset) in snapshot.assets.iter().enumerate() {
            if asset_index.insert(asset.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(asset.id.to_string()));
            }
            match snapshot.placements.get(&asset.id) {
                Some(p) if p.is_valid() => {}
                Some(p) => {
                    return Err(CatalogError::Corrupt(format!(
                        "asset {} has invalid coordinate {},{}",
                        asset.id, p.lat, p.lng
                    )));
                }
                None => {
                    return Err(CatalogError::Corrupt(format!(
                        "asset {} has no coordinate",
                        asset.id
                    )));
                }
            }
        }

        let fingerprint = fingerprint(&snapshot)?;
        debug!(
            lessons = snapshot.lessons.len(),
            assets = snapshot.assets.len(),
            %fingerprint,
            "catalog ready"
        );

        Ok(Self {
            snapshot,
            lesson_index,
            asset_index,
            fingerprint,
        })
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.snapshot.lessons
    }

    pub fn assets(&self) -> &[MapAsset] {
        &self.snapshot.assets
    }

    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lesson_index
            .get(id)
            .and_then(|&i| self.snapshot.lessons.get(i))
    }

    pub fn asset(&self, id: &AssetId) -> Option<&MapAsset> {
        self.asset_index
            .get(id)
            .and_then(|&i| self.snapshot.assets.get(i))
    }

    /// Position of `id` in the asset array, used as a stable tie-break.
    pub fn asset_position(&self, id: &AssetId) -> Option<usize> {
        self.asset_index.get(id).copied()
    }

    pub fn coordinate(&self, id: &AssetId) -> Option<LatLng> {
        self.snapshot.placements.get(id).copied()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    /// Every distinct tag in first-seen order across lessons then assets.
    pub fn all_tags(&self) -> Vec<&str> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let lesson_tags = self.lessons().iter().flat_map(|l| l.tags.iter());
        let asset_tags = self.assets().iter().flat_map(|a| a.tags.iter());
        lesson_tags
            .chain(asset_tags)
            .map(String::as_str)
            .filter(|t| seen.insert(*t))
            .collect()
    }
}
