//! Geographic to image pixel coordinates

use ndarray::{Array1, ArrayView1};
use rsutils_core::io::{open_raster, RasterSource};
use rsutils_core::{Error, RasterGeometry, Result};
use std::path::Path;
use tracing::debug;

/// Convert geographic coordinates to image pixel coordinates.
///
/// Every x must lie within `[tl_x, br_x]` and every y within `[br_y, tl_y]`
/// of the raster extent, otherwise the whole batch fails with
/// [`Error::OutOfExtent`] (the x axis is checked first). Indices are
/// `floor((x - tl_x) / x_res + 0.5)` and `floor((tl_y - y) / y_res + 0.5)`,
/// capped at the last column/row for coordinates on the far edge. Pixel
/// corners map back to their own index; an exact pixel centre rounds up to
/// the next one.
///
/// # Returns
/// `(columns, rows)`, one entry per input coordinate.
pub fn pixel_coords(
    geometry: &RasterGeometry,
    x_coords: ArrayView1<'_, f64>,
    y_coords: ArrayView1<'_, f64>,
) -> Result<(Array1<usize>, Array1<usize>)> {
    if x_coords.len() != y_coords.len() {
        return Err(Error::SizeMismatch {
            what: "x and y coordinate arrays",
            left: x_coords.len(),
            right: y_coords.len(),
        });
    }

    let ext = geometry.extent();

    if let Some(&x) = x_coords.iter().find(|&&x| !ext.contains_x(x)) {
        return Err(Error::OutOfExtent {
            axis: 'x',
            value: x,
            min: ext.tl_x,
            max: ext.br_x,
        });
    }
    if let Some(&y) = y_coords.iter().find(|&&y| !ext.contains_y(y)) {
        return Err(Error::OutOfExtent {
            axis: 'y',
            value: y,
            min: ext.br_y,
            max: ext.tl_y,
        });
    }

    let x_res = geometry.transform.x_res();
    let y_res = geometry.transform.y_res();
    let last_col = geometry.width.saturating_sub(1);
    let last_row = geometry.height.saturating_sub(1);

    let cols = x_coords.mapv(|x| (((x - ext.tl_x) / x_res + 0.5).floor() as usize).min(last_col));
    let rows = y_coords.mapv(|y| (((ext.tl_y - y) / y_res + 0.5).floor() as usize).min(last_row));

    Ok((cols, rows))
}

/// [`pixel_coords`] using the size and geotransform of an open raster
pub fn pixel_coords_in<S: RasterSource + ?Sized>(
    source: &S,
    x_coords: ArrayView1<'_, f64>,
    y_coords: ArrayView1<'_, f64>,
) -> Result<(Array1<usize>, Array1<usize>)> {
    pixel_coords(&source.geometry()?, x_coords, y_coords)
}

/// Calculate image pixel coordinates for spatial coordinates within an image.
///
/// The image defines the coordinate system and extent; it is opened, queried
/// and closed within the call.
pub fn image_pixel_coords<P: AsRef<Path>>(
    input_img: P,
    x_coords: ArrayView1<'_, f64>,
    y_coords: ArrayView1<'_, f64>,
) -> Result<(Array1<usize>, Array1<usize>)> {
    let geometry = {
        let raster = open_raster(input_img.as_ref())?;
        raster.geometry()?
    };
    debug!(
        path = %input_img.as_ref().display(),
        width = geometry.width,
        height = geometry.height,
        n = x_coords.len(),
        "mapping coordinates to pixels"
    );
    pixel_coords(&geometry, x_coords, y_coords)
}
