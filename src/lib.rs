//! Pededash: PEDE educational outcomes dashboard
//!
//! Loads the PEDE student dataset (INDE and indicator scores, rock tiers and
//! turning points for 2020-2022) and computes nine filterable analytic views
//! with terminal rendering, CSV/JSON export and SVG chart images.

pub mod cli;
pub mod dashboard;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod utils;
