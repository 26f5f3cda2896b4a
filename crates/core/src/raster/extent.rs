//! Raster extent and spatial reference summary

use crate::raster::GeoTransform;
use serde::{Deserialize, Serialize};

/// Bounding extent of a north-up raster, top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub tl_x: f64,
    pub tl_y: f64,
    pub br_x: f64,
    pub br_y: f64,
}

impl Extent {
    /// Whether `x` lies in `[tl_x, br_x]`
    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.tl_x && x <= self.br_x
    }

    /// Whether `y` lies in `[br_y, tl_y]`
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.br_y && y <= self.tl_y
    }
}

/// The spatial reference of a raster: its geotransform and size in pixels.
///
/// Pixel sizes are used as magnitudes; the image is assumed to run
/// top-to-bottom as y decreases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterGeometry {
    pub transform: GeoTransform,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl RasterGeometry {
    pub fn new(transform: GeoTransform, width: usize, height: usize) -> Self {
        Self {
            transform,
            width,
            height,
        }
    }

    pub fn extent(&self) -> Extent {
        let tl_x = self.transform.origin_x;
        let tl_y = self.transform.origin_y;

        Extent {
            tl_x,
            tl_y,
            br_x: tl_x + self.transform.x_res() * self.width as f64,
            br_y: tl_y - self.transform.y_res() * self.height as f64,
        }
    }
}
