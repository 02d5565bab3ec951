//! Report module - terminal tables, chart images and file exports

pub mod chart;
pub mod export;
pub mod summary;
pub mod table;

pub use chart::{render_svg, scale_color, write_chart};
pub use export::*;
pub use summary::*;
pub use table::*;
