//! Built-in demo catalog.

use std::collections::BTreeMap;

use foundation::geo::LatLng;
use foundation::ids::{AssetId, LessonId, UserId};

use crate::model::{Lesson, Level, Location, MapAsset, Visibility};
use crate::CatalogSnapshot;

/// The signed-in user of the demo.
pub const DEFAULT_USER_ID: &str = "user_01";

/// Tag vocabulary offered while composing a lesson.
pub const KNOWN_TAGS: &[&str] = &[
    "History",
    "Ancient Rome",
    "VR Ready",
    "Architecture",
    "Italy",
    "Educational",
    "360 Tour",
    "Culture",
    "Bulgaria",
    "Historic",
    "Revival",
    "Biology",
    "Environment",
    "Quiz",
    "Nature",
    "Greece",
    "Coastal",
    "Art",
    "Baroque",
    "Symbols",
    "Vienna",
    "Austria",
    "Palace",
];

const KOPRIVSHTITSA: LatLng = LatLng::new(42.636_05, 24.358_2);
const ROMAN_FORUM: LatLng = LatLng::new(41.892_5, 12.485_3);
const LEFKADA_DUNES: LatLng = LatLng::new(38.830_1, 20.703_8);
const BELVEDERE: LatLng = LatLng::new(48.191_5, 16.380_9);

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn lesson(
    id: &str,
    title: &str,
    author: &str,
    tag_list: &[&str],
    language: &str,
    level: Level,
    rating: f64,
    favorites: u32,
    thumb: &str,
    location: Location,
) -> Lesson {
    Lesson {
        id: LessonId::from(id),
        title: title.to_string(),
        author: author.to_string(),
        tags: tags(tag_list),
        language: language.to_string(),
        level,
        rating,
        favorites,
        thumb: thumb.to_string(),
        location,
    }
}

#[allow(clippy::too_many_arguments)]
fn asset(
    id: &str,
    title: &str,
    author: &str,
    author_id: &str,
    tag_list: &[&str],
    description: &str,
    thumb: &str,
    visibility: Visibility,
) -> MapAsset {
    MapAsset {
        id: AssetId::from(id),
        title: title.to_string(),
        author: author.to_string(),
        author_id: UserId::from(author_id),
        tags: tags(tag_list),
        description: description.to_string(),
        thumb: thumb.to_string(),
        visibility,
    }
}

pub fn seed_lessons() -> Vec<Lesson> {
    vec![
        lesson(
            "l1",
            "Ancient Rome: Forum & Temples",
            "Interactive Bulgaria Foundation",
            &[
                "History",
                "Ancient Rome",
                "VR Ready",
                "Architecture",
                "Italy",
                "Educational",
                "360 Tour",
            ],
            "EN",
            Level::Intermediate,
            4.8,
            812,
            "https://images.unsplash.com/photo-1544989164-31dc3c645987?q=80&w=1200&auto=format&fit=crop",
            Location::new("Italy", "Rome"),
        ),
        lesson(
            "l2",
            "Bulgarian Revival Architecture",
            "SENA Competence Center",
            &["Architecture", "Culture", "360°"],
            "BG",
            Level::Beginner,
            4.6,
            421,
            "https://images.unsplash.com/photo-1519682577862-22b62b24e493?q=80&w=1200&auto=format&fit=crop",
            Location::new("Bulgaria", "Koprivshtitsa"),
        ),
        lesson(
            "l3",
            "Marine Ecosystems: Coastal Dunes",
            "AI Resource Center",
            &["Biology", "Environment", "Quiz"],
            "EN",
            Level::Advanced,
            4.9,
            1021,
            "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?q=80&w=1200&auto=format&fit=crop",
            Location::new("Greece", "Lefkada"),
        ),
        lesson(
            "l4",
            "Vienna: Baroque Palace Symbols",
            "European School Brussels IV",
            &["Art", "Baroque", "Symbols"],
            "EN",
            Level::Intermediate,
            4.7,
            593,
            "https://images.unsplash.com/photo-1544829728-e5cb9eedf658?q=80&w=1200&auto=format&fit=crop",
            Location::new("Austria", "Vienna"),
        ),
    ]
}

pub fn seed_assets() -> Vec<MapAsset> {
    vec![
        asset(
            "ma1",
            "Old Town, Koprivshtitsa",
            "SENA Competence Center",
            "user_02",
            &["Architecture", "Culture", "360°", "Bulgaria"],
            "A panoramic view of the iconic architecture in Koprivshtitsa, showcasing the Bulgarian Revival period.",
            "https://images.unsplash.com/photo-1519682577862-22b62b24e493?q=80&w=800&auto=format&fit=crop",
            Visibility::Public,
        ),
        asset(
            "ma2",
            "Roman Forum Ruins",
            "Interactive Bulgaria Foundation",
            "user_01",
            &["History", "Ancient Rome", "VR Ready", "Italy"],
            "Explore the heart of ancient Rome. This 360° image captures the remaining columns and structures of the Forum.",
            "https://images.unsplash.com/photo-1544989164-31dc3c645987?q=80&w=800&auto=format&fit=crop",
            Visibility::Public,
        ),
        asset(
            "ma3",
            "Coastal Dunes of Lefkada",
            "AI Resource Center",
            "user_03",
            &["Biology", "Environment", "Greece"],
            "A serene 360° view of the coastal dunes and turquoise waters of Lefkada, Greece. An ideal asset for environmental studies.",
            "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?q=80&w=800&auto=format&fit=crop",
            Visibility::Public,
        ),
        asset(
            "ma4",
            "Belvedere Palace, Vienna",
            "European School Brussels IV",
            "user_04",
            &["Art", "Baroque", "Austria", "Vienna"],
            "A stunning panoramic shot of the Belvedere Palace in Vienna, a masterpiece of Baroque architecture.",
            "https://images.unsplash.com/photo-1544829728-e5cb9eedf658?q=80&w=800&auto=format&fit=crop",
            Visibility::Public,
        ),
        asset(
            "ma5",
            "My Secret Garden Spot",
            "Interactive Bulgaria Foundation",
            "user_01",
            &["Personal", "Nature", "Quiet"],
            "A personal 360° image from my private garden. Not for public use.",
            "https://images.unsplash.com/photo-1444090542259-0af8fa96557e?q=80&w=800&auto=format&fit=crop",
            Visibility::Private,
        ),
    ]
}

/// Asset placements. `ma5` shares the Koprivshtitsa point with `ma1`, so the
/// demo map always shows one stack.
pub fn seed_placements() -> BTreeMap<AssetId, LatLng> {
    BTreeMap::from([
        (AssetId::from("ma1"), KOPRIVSHTITSA),
        (AssetId::from("ma2"), ROMAN_FORUM),
        (AssetId::from("ma3"), LEFKADA_DUNES),
        (AssetId::from("ma4"), BELVEDERE),
        (AssetId::from("ma5"), KOPRIVSHTITSA),
    ])
}

pub fn seed_snapshot() -> CatalogSnapshot {
    CatalogSnapshot {
        lessons: seed_lessons(),
        assets: seed_assets(),
        placements: seed_placements(),
    }
}
