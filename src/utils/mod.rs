//! Terminal output helpers: styling, progress and logging

pub mod logging;
pub mod progress;
pub mod styling;

pub use logging::init_logging;
