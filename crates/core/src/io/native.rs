//! Native GeoTIFF access (without GDAL dependency)
//!
//! Uses the `tiff` crate. Pixel-interleaved images with any number of
//! samples per pixel are supported; band-separate (planar) layouts need the
//! `gdal` feature.

use crate::error::{Error, Result};
use crate::io::RasterSource;
use crate::raster::GeoTransform;
use ndarray::Array3;
use num_traits::NumCast;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{ColorType, Gray32Float, RGB32Float, RGBA32Float};
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GEO_KEY_DIRECTORY: u16 = 34735;

fn geotiff_tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// A GeoTIFF decoded into memory.
///
/// The file handle is only held while decoding inside [`NativeRaster::open`].
#[derive(Debug, Clone)]
pub struct NativeRaster {
    width: usize,
    height: usize,
    bands: usize,
    transform: Option<GeoTransform>,
    /// Pixel-interleaved samples, row-major
    data: Vec<f32>,
}

impl NativeRaster {
    /// Open and decode a GeoTIFF file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let open_failed = |reason: String| Error::OpenFailed {
            path: path.display().to_string(),
            reason,
        };

        let file = File::open(path).map_err(|e| open_failed(e.to_string()))?;
        Self::decode(BufReader::new(file)).map_err(|e| match e {
            Error::UnsupportedDataType(_) => e,
            other => open_failed(other.to_string()),
        })
    }

    /// Decode a GeoTIFF from any `Read + Seek` source
    pub fn decode<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut decoder = Decoder::new(reader)?;

        let (width, height) = decoder.dimensions()?;
        let width = width as usize;
        let height = height as usize;

        let bands = match decoder.find_tag(Tag::SamplesPerPixel)? {
            Some(v) => v.into_u32()? as usize,
            None => 1,
        };
        if let Some(planar) = decoder.find_tag(Tag::PlanarConfiguration)? {
            if planar.into_u32()? == 2 {
                return Err(Error::UnsupportedDataType(
                    "band-separate (planar) TIFF layout".to_string(),
                ));
            }
        }

        let transform = read_geotransform(&mut decoder);

        let data = match decoder.read_image()? {
            DecodingResult::U8(buf) => cast_samples(buf),
            DecodingResult::U16(buf) => cast_samples(buf),
            DecodingResult::U32(buf) => cast_samples(buf),
            DecodingResult::U64(buf) => cast_samples(buf),
            DecodingResult::I8(buf) => cast_samples(buf),
            DecodingResult::I16(buf) => cast_samples(buf),
            DecodingResult::I32(buf) => cast_samples(buf),
            DecodingResult::I64(buf) => cast_samples(buf),
            DecodingResult::F32(buf) => buf,
            DecodingResult::F64(buf) => cast_samples(buf),
            #[allow(unreachable_patterns)]
            _ => {
                return Err(Error::UnsupportedDataType(
                    "Unsupported TIFF sample format".to_string(),
                ))
            }
        };

        if data.len() != width * height * bands {
            return Err(Error::MalformedSource(format!(
                "TIFF holds {} samples, expected {}x{}x{}",
                data.len(),
                width,
                height,
                bands
            )));
        }

        Ok(Self {
            width,
            height,
            bands,
            transform,
            data,
        })
    }

    /// Build from an in-memory (rows, cols, bands) cube
    pub fn from_array(bands: &Array3<f32>, transform: Option<GeoTransform>) -> Self {
        let (height, width, n_bands) = bands.dim();
        Self {
            width,
            height,
            bands: n_bands,
            transform,
            data: bands.iter().copied().collect(),
        }
    }
}

fn cast_samples<T: NumCast + Copy>(buf: Vec<T>) -> Vec<f32> {
    buf.into_iter()
        .map(|v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect()
}

impl RasterSource for NativeRaster {
    fn raster_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn band_count(&self) -> usize {
        self.bands
    }

    fn geo_transform(&self) -> Result<GeoTransform> {
        self.transform
            .ok_or_else(|| Error::MalformedSource("raster has no georeferencing tags".to_string()))
    }

    fn read_block_f32(&self, offset: (usize, usize), size: (usize, usize)) -> Result<Vec<f32>> {
        let (x_off, y_off) = offset;
        let (w, h) = size;

        if x_off + w > self.width || y_off + h > self.height {
            return Err(Error::IndexOutOfBounds {
                row: y_off + h.saturating_sub(1),
                col: x_off + w.saturating_sub(1),
                rows: self.height,
                cols: self.width,
            });
        }

        let mut out = Vec::with_capacity(w * h * self.bands);
        for band in 0..self.bands {
            for row in y_off..y_off + h {
                for col in x_off..x_off + w {
                    out.push(self.data[(row * self.width + col) * self.bands + band]);
                }
            }
        }
        Ok(out)
    }
}

/// Attempt to read GeoTransform from GeoTIFF tags
fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(geotiff_tag(MODEL_PIXEL_SCALE)).ok();
    let tiepoint = decoder.get_tag_f64_vec(geotiff_tag(MODEL_TIEPOINT)).ok();

    if let (Some(scale), Some(tiepoint)) = (scale, tiepoint) {
        if scale.len() >= 2 && tiepoint.len() >= 6 {
            // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
            let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
            let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
            return Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]));
        }
    }

    // 4x4 row-major model transformation
    let t = decoder
        .get_tag_f64_vec(geotiff_tag(MODEL_TRANSFORMATION))
        .ok()?;
    if t.len() < 16 {
        return None;
    }
    Some(GeoTransform {
        origin_x: t[3],
        origin_y: t[7],
        pixel_width: t[0],
        pixel_height: t[5],
        row_rotation: t[1],
        col_rotation: t[4],
    })
}

/// Write a (rows, cols, bands) cube to a 32-bit float GeoTIFF.
///
/// One, three and four band cubes are supported.
pub fn write_geotiff_bands<P: AsRef<Path>>(
    bands: &Array3<f32>,
    transform: &GeoTransform,
    path: P,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    match bands.dim().2 {
        1 => encode_geotiff::<Gray32Float, _>(bands, transform, file),
        3 => encode_geotiff::<RGB32Float, _>(bands, transform, file),
        4 => encode_geotiff::<RGBA32Float, _>(bands, transform, file),
        n => Err(Error::UnsupportedDataType(format!(
            "{} band GeoTIFF output",
            n
        ))),
    }
}

fn encode_geotiff<C, W>(bands: &Array3<f32>, transform: &GeoTransform, writer: W) -> Result<()>
where
    C: ColorType<Inner = f32>,
    W: std::io::Write + Seek,
{
    let (rows, cols, _) = bands.dim();
    let data: Vec<f32> = bands.iter().copied().collect();

    let mut encoder = TiffEncoder::new(writer)?;
    let mut image = encoder.new_image::<C>(cols as u32, rows as u32)?;

    let scale = vec![transform.pixel_width, transform.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(geotiff_tag(MODEL_PIXEL_SCALE), scale.as_slice())?;

    let tiepoint = vec![0.0, 0.0, 0.0, transform.origin_x, transform.origin_y, 0.0];
    image
        .encoder()
        .write_tag(geotiff_tag(MODEL_TIEPOINT), tiepoint.as_slice())?;

    // GTModelTypeGeoKey = Projected, GTRasterTypeGeoKey = PixelIsArea
    let geokeys: Vec<u16> = vec![1, 1, 0, 2, 1024, 0, 1, 1, 1025, 0, 1, 1];
    image
        .encoder()
        .write_tag(geotiff_tag(GEO_KEY_DIRECTORY), geokeys.as_slice())?;

    image.write_data(&data)?;
    Ok(())
}
