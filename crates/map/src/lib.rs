pub mod cluster;
pub mod grouping;
pub mod layer;
pub mod marker;
pub mod service;
pub mod stack;

pub use cluster::*;
pub use grouping::*;
pub use layer::*;
pub use marker::*;
pub use service::*;
pub use stack::*;

use session::Session;

/// Pushes the session's filtered assets and selection onto the map.
pub fn sync_session<S: MapService>(
    layer: &mut MapLayer<S>,
    session: &Session,
) -> Result<SyncReport, MapError> {
    let assets = session.assets();
    let groups = group_in_catalog(session.catalog(), &assets);
    layer.sync(&groups, session.selection())
}
