pub mod error;
pub mod raster;
pub mod store;

pub use error::GridError;
pub use store::OutputGrid;
