//! Primitives shared by every crate.

pub mod geo;
pub mod ids;
pub mod precision;

pub use geo::*;
pub use ids::*;
pub use precision::*;
