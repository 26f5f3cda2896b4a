//! Per-pixel band values

use ndarray::Array1;
use rsutils_core::io::{open_raster, RasterSource};
use rsutils_core::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Band values of a single pixel of an open raster, in band order.
///
/// The pixel is read as a 1x1 block of 32-bit floats across all bands.
/// Indices are not checked here; out-of-range pixels fail however the
/// backend fails.
pub fn pixel_column<S: RasterSource + ?Sized>(
    source: &S,
    x_pxl_coord: usize,
    y_pxl_coord: usize,
) -> Result<Array1<f64>> {
    let n_bands = source.band_count();
    let values = source.read_block_f32((x_pxl_coord, y_pxl_coord), (1, 1))?;

    if values.len() != n_bands {
        return Err(Error::SizeMismatch {
            what: "pixel values read vs band count",
            left: values.len(),
            right: n_bands,
        });
    }

    Ok(values.into_iter().map(f64::from).collect())
}

/// Get the band values for a single pixel within an image.
///
/// The coordinate space is image pixels, `0..width` and `0..height`.
/// The image is opened and closed within the call.
pub fn image_pixel_column<P: AsRef<Path>>(
    input_img: P,
    x_pxl_coord: usize,
    y_pxl_coord: usize,
) -> Result<Array1<f64>> {
    let raster = open_raster(input_img.as_ref())?;
    debug!(
        path = %input_img.as_ref().display(),
        x = x_pxl_coord,
        y = y_pxl_coord,
        bands = raster.band_count(),
        "reading pixel column"
    );
    pixel_column(raster.as_ref(), x_pxl_coord, y_pxl_coord)
}
