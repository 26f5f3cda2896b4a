//! # rsutils algorithms
//!
//! Small, stateless utilities for remote sensing rasters and vectors.
//!
//! ## Available Categories
//!
//! - **imagery**: range limiting and per-band linear stretch for display
//! - **pixel**: geographic to pixel coordinates, per-pixel band values
//! - **vector**: attribute-based row filtering

pub mod imagery;
pub mod pixel;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::imagery::{
        limit_range, manual_stretch, BandRange, LimitRange, StretchOptions, StretchOutput,
        StretchParams,
    };
    pub use crate::pixel::{image_pixel_column, image_pixel_coords, pixel_column, pixel_coords};
    pub use crate::vector::{drop_rows_by_attribute, drop_rows_by_attribute_file};
    pub use rsutils_core::prelude::*;
}
