pub mod engine;
pub mod facets;
pub mod filter;
pub mod search;
pub mod sort;
pub mod suggest;
pub mod thematic;

pub use engine::*;
pub use facets::*;
pub use filter::*;
pub use search::{FuzzyIndex, FuzzyOptions, SearchError, SearchHit, SearchIndex};
pub use sort::*;
pub use suggest::*;
pub use thematic::*;
