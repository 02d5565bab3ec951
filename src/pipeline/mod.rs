//! Pipeline module - loading, cleaning and the pure per-view transforms

pub mod columns;
pub mod correlation;
pub mod frequency;
pub mod grouped;
pub mod histogram;
pub mod loader;
pub mod missing;
pub mod schema;
pub mod scores;
pub mod trend;
pub mod variation;

pub use columns::*;
pub use correlation::*;
pub use frequency::*;
pub use grouped::*;
pub use histogram::*;
pub use loader::*;
pub use missing::*;
pub use schema::*;
pub use scores::*;
pub use trend::*;
pub use variation::*;
