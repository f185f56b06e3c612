//! BEHR pixel-to-grid oversampling
//!
//! Regrids satellite NO2 retrieval pixels onto a uniform oversampled grid.
//! Each pixel footprint is a quadrilateral in grid-index space; the rasterizer
//! determines the grid cells it covers and the accumulation store folds the
//! pixel's field values into per-cell running means, with quality flags
//! collected per cell. The batch driver runs one grid per orbit over a set of
//! swath files.

pub mod bounds;
pub mod config;
pub mod driver;
pub mod fields;
pub mod geometry;
pub mod grid;
pub mod swath;

pub use bounds::GridBounds;
pub use config::GridConfig;
pub use driver::{GriddedOrbit, SwathGridder};
pub use fields::FieldSet;
pub use grid::{GridError, OutputGrid};
pub use swath::{Footprint, Swath};
