//! Georeferencing types and array element bounds

mod element;
mod extent;
mod geotransform;

pub use element::RasterElement;
pub use extent::{Extent, RasterGeometry};
pub use geotransform::GeoTransform;
