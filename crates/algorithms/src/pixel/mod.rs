//! Pixel addressing within georeferenced images
//!
//! - Coordinates: map geographic x/y to image column/row indices
//! - Column: read all band values at one pixel

mod column;
mod coords;

pub use column::{image_pixel_column, pixel_column};
pub use coords::{image_pixel_coords, pixel_coords, pixel_coords_in};
