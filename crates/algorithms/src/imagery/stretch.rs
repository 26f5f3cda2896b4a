//! Manual linear stretch
//!
//! Rescale image values per band from a caller-supplied min/max to an output
//! range, typically to prepare raster data for display. With the defaults the
//! output lies in `[0, 1]`; set `out_gain` to 255 and `out_int_type` to get
//! 8-bit style values.

use crate::imagery::limit_range::{limit_range_inplace, LimitRange};
use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, Axis};
use rsutils_core::{Error, RasterElement, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Source value range of one band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRange {
    pub min: f64,
    pub max: f64,
}

impl BandRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Parse `{"min": .., "max": ..}`
    fn from_json(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            Error::invalid("min_max_vals", value, "each band range must be an object")
        })?;

        let key = |name: &str| -> Result<f64> {
            let v = obj.get(name).ok_or_else(|| {
                Error::invalid(
                    "min_max_vals",
                    value,
                    "min and max keys must be provided within the object",
                )
            })?;
            v.as_f64().ok_or_else(|| {
                Error::invalid("min_max_vals", value, format!("{} must be a number", name))
            })
        };

        Ok(Self::new(key("min")?, key("max")?))
    }
}

/// Stretch ranges for a whole image.
///
/// A 2D `(rows, cols)` array takes a single range, a 3D `(rows, cols, bands)`
/// array takes exactly one range per band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StretchParams {
    SingleBand(BandRange),
    MultiBand(Vec<BandRange>),
}

impl StretchParams {
    pub fn single(min: f64, max: f64) -> Self {
        StretchParams::SingleBand(BandRange::new(min, max))
    }

    pub fn multi<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        StretchParams::MultiBand(
            ranges
                .into_iter()
                .map(|(min, max)| BandRange::new(min, max))
                .collect(),
        )
    }

    /// Build from loosely typed JSON configuration.
    ///
    /// An object becomes [`StretchParams::SingleBand`], a list of objects
    /// becomes [`StretchParams::MultiBand`]. Any other shape, or an object
    /// without both `min` and `max`, is rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Object(_) => Ok(StretchParams::SingleBand(BandRange::from_json(value)?)),
            Value::Array(items) => Ok(StretchParams::MultiBand(
                items.iter().map(BandRange::from_json).collect::<Result<_>>()?,
            )),
            other => Err(Error::invalid(
                "min_max_vals",
                other,
                "must be an object or a list of objects",
            )),
        }
    }

    /// Parse a JSON document, see [`StretchParams::from_json`]
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| Error::invalid("min_max_vals", s, e.to_string()))?;
        Self::from_json(&value)
    }

    fn describe(&self) -> String {
        match self {
            StretchParams::SingleBand(_) => "single band range".to_string(),
            StretchParams::MultiBand(r) => format!("list of {} band ranges", r.len()),
        }
    }
}

/// Output scaling and clamping for [`manual_stretch`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StretchOptions {
    /// Input value marking missing data; such elements become NaN
    pub no_data_val: Option<f64>,
    /// Output offset: `(value * gain) + offset`
    pub out_off: f64,
    /// Output gain: `(value * gain) + offset`
    pub out_gain: f64,
    /// Truncate the result to integers
    pub out_int_type: bool,
    /// Minimum value within the output array
    pub min_out_val: f64,
    /// Maximum value within the output array
    pub max_out_val: f64,
}

impl Default for StretchOptions {
    fn default() -> Self {
        Self {
            no_data_val: None,
            out_off: 0.0,
            out_gain: 1.0,
            out_int_type: false,
            min_out_val: 0.0,
            max_out_val: 1.0,
        }
    }
}

impl StretchOptions {
    pub fn with_no_data(mut self, no_data_val: f64) -> Self {
        self.no_data_val = Some(no_data_val);
        self
    }

    pub fn with_gain_offset(mut self, gain: f64, offset: f64) -> Self {
        self.out_gain = gain;
        self.out_off = offset;
        self
    }

    pub fn with_output_range(mut self, min_out_val: f64, max_out_val: f64) -> Self {
        self.min_out_val = min_out_val;
        self.max_out_val = max_out_val;
        self
    }

    pub fn with_int_output(mut self, out_int_type: bool) -> Self {
        self.out_int_type = out_int_type;
        self
    }
}

/// Result of a stretch, float unless integer output was requested
#[derive(Debug, Clone, PartialEq)]
pub enum StretchOutput {
    Float(ArrayD<f64>),
    Int(ArrayD<i64>),
}

impl StretchOutput {
    pub fn as_float(&self) -> Option<&ArrayD<f64>> {
        match self {
            StretchOutput::Float(a) => Some(a),
            StretchOutput::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<&ArrayD<i64>> {
        match self {
            StretchOutput::Int(a) => Some(a),
            StretchOutput::Float(_) => None,
        }
    }

    pub fn into_float(self) -> Option<ArrayD<f64>> {
        match self {
            StretchOutput::Float(a) => Some(a),
            StretchOutput::Int(_) => None,
        }
    }

    pub fn into_int(self) -> Option<ArrayD<i64>> {
        match self {
            StretchOutput::Int(a) => Some(a),
            StretchOutput::Float(_) => None,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            StretchOutput::Float(a) => a.shape(),
            StretchOutput::Int(a) => a.shape(),
        }
    }
}

/// Check the ranges against the array layout before touching any data
fn check_params(shape: &[usize], params: &StretchParams) -> Result<()> {
    match (shape.len(), params) {
        (2, StretchParams::SingleBand(_)) => Ok(()),
        (2, StretchParams::MultiBand(_)) => Err(Error::invalid(
            "min_max_vals",
            params.describe(),
            "array has a single band, so a single band range is required",
        )),
        (3, StretchParams::SingleBand(_)) => Err(Error::invalid(
            "min_max_vals",
            params.describe(),
            "array has a band axis, so a list of band ranges is required",
        )),
        (3, StretchParams::MultiBand(ranges)) => {
            let n_bands = shape[2];
            if ranges.len() != n_bands {
                return Err(Error::invalid(
                    "min_max_vals",
                    params.describe(),
                    format!(
                        "length must be the same as the number of bands ({})",
                        n_bands
                    ),
                ));
            }
            Ok(())
        }
        (ndim, _) => Err(Error::InvalidDimensions {
            expected: "2 (rows, cols) or 3 (rows, cols, bands)".to_string(),
            actual: ndim,
        }),
    }
}

fn stretch_band(mut band: ArrayViewMutD<'_, f64>, range: &BandRange, opts: &StretchOptions) {
    let span = range.max - range.min;
    band.mapv_inplace(|v| ((v - range.min) / span) * opts.out_gain + opts.out_off);
}

/// Linear stretch of an image using per-band min/max values.
///
/// Each band is mapped with `((value - min) / (max - min)) * out_gain +
/// out_off`, the whole result is clamped to `[min_out_val, max_out_val]` and
/// optionally truncated to integers. Elements equal to `no_data_val` become
/// NaN before scaling and stay NaN through the clamp; with integer output
/// they truncate to 0. A band with `min == max` is not guarded and produces
/// infinities (clamped) or NaN.
///
/// # Arguments
/// * `arr` - Image as `(rows, cols)` or `(rows, cols, bands)`
/// * `params` - One range for a 2D array, one range per band for a 3D array
/// * `opts` - Output scaling, clamping and no-data handling
///
/// # Example
/// ```ignore
/// let params = StretchParams::multi([(10.0, 400.0), (22.0, 300.0), (1.0, 120.0)]);
/// let opts = StretchOptions::default().with_no_data(0.0);
/// let rgb = manual_stretch(img.view(), &params, &opts)?;
/// ```
pub fn manual_stretch<T: RasterElement>(
    arr: ArrayViewD<'_, T>,
    params: &StretchParams,
    opts: &StretchOptions,
) -> Result<StretchOutput> {
    check_params(arr.shape(), params)?;

    let mut out: ArrayD<f64> = arr.mapv(|v| {
        if v.is_nodata(opts.no_data_val) {
            f64::NAN
        } else {
            v.as_f64()
        }
    });

    match params {
        StretchParams::SingleBand(range) => {
            debug!(min = range.min, max = range.max, "stretching single band");
            stretch_band(out.view_mut(), range, opts);
        }
        StretchParams::MultiBand(ranges) => {
            for (n, range) in ranges.iter().enumerate() {
                debug!(band = n, min = range.min, max = range.max, "stretching band");
                stretch_band(out.index_axis_mut(Axis(2), n), range, opts);
            }
        }
    }

    limit_range_inplace(&mut out, &LimitRange::clamp(opts.min_out_val, opts.max_out_val));

    if opts.out_int_type {
        Ok(StretchOutput::Int(out.mapv(|v| v.trunc() as i64)))
    } else {
        Ok(StretchOutput::Float(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array3};
    use rsutils_core::ErrorKind;

    fn row() -> ArrayD<f64> {
        array![[-10.0, 0.0, 50.0, 100.0, 200.0]].into_dyn()
    }

    #[test]
    fn test_single_band_default() {
        let params = StretchParams::single(0.0, 100.0);
        let out = manual_stretch(row().view(), &params, &StretchOptions::default())
            .unwrap()
            .into_float()
            .unwrap();

        assert_eq!(out.shape(), &[1, 5]);
        assert_eq!(out.as_slice().unwrap(), &[0.0, 0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn test_midpoint_before_clamp() {
        let opts = StretchOptions::default().with_output_range(-10.0, 10.0);
        let out = manual_stretch(row().view(), &StretchParams::single(0.0, 100.0), &opts)
            .unwrap()
            .into_float()
            .unwrap();

        assert_relative_eq!(out[[0, 0]], -0.1, epsilon = 1e-12);
        assert_relative_eq!(out[[0, 2]], 0.5, epsilon = 1e-12);
        assert_relative_eq!(out[[0, 4]], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gain_offset_and_int_output() {
        let opts = StretchOptions::default()
            .with_gain_offset(255.0, 0.0)
            .with_output_range(0.0, 255.0)
            .with_int_output(true);
        let out = manual_stretch(row().view(), &StretchParams::single(0.0, 100.0), &opts).unwrap();

        let ints = out.as_int().unwrap();
        assert_eq!(ints.as_slice().unwrap(), &[0, 0, 127, 255, 255]);
        assert!(out.as_float().is_none());
    }

    #[test]
    fn test_offset_applied_after_gain() {
        let opts = StretchOptions::default()
            .with_gain_offset(2.0, 1.0)
            .with_output_range(0.0, 10.0);
        let arr = array![[25.0, 75.0]].into_dyn();
        let out = manual_stretch(arr.view(), &StretchParams::single(0.0, 100.0), &opts)
            .unwrap()
            .into_float()
            .unwrap();

        assert_relative_eq!(out[[0, 0]], 1.5);
        assert_relative_eq!(out[[0, 1]], 2.5);
    }

    #[test]
    fn test_multiband_per_band_ranges() {
        let mut img = Array3::<u16>::zeros((2, 2, 3));
        img.index_axis_mut(Axis(2), 0).fill(200);
        img.index_axis_mut(Axis(2), 1).fill(200);
        img.index_axis_mut(Axis(2), 2).fill(60);

        let params = StretchParams::multi([(0.0, 400.0), (100.0, 300.0), (0.0, 120.0)]);
        let out = manual_stretch(img.into_dyn().view(), &params, &StretchOptions::default())
            .unwrap()
            .into_float()
            .unwrap();

        assert_relative_eq!(out[[0, 0, 0]], 0.5);
        assert_relative_eq!(out[[1, 1, 1]], 0.5);
        assert_relative_eq!(out[[0, 1, 2]], 0.5);
    }

    #[test]
    fn test_band_count_mismatch() {
        let img = Array3::<f32>::zeros((4, 4, 3)).into_dyn();
        let params = StretchParams::multi([(0.0, 1.0), (0.0, 1.0)]);

        let err = manual_stretch(img.view(), &params, &StretchOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_variant_must_match_dimensionality() {
        let flat = row();
        let err = manual_stretch(
            flat.view(),
            &StretchParams::multi([(0.0, 1.0)]),
            &StretchOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));

        let cube = Array3::<f64>::zeros((2, 2, 1)).into_dyn();
        let params = StretchParams::single(0.0, 1.0);
        let err = manual_stretch(cube.view(), &params, &StretchOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_rejects_1d() {
        let line = array![1.0, 2.0].into_dyn();
        let params = StretchParams::single(0.0, 1.0);
        let err = manual_stretch(line.view(), &params, &StretchOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { actual: 1, .. }));
    }

    #[test]
    fn test_no_data_propagates_as_nan() {
        let arr = array![[0.0, 50.0, 0.0, 100.0]].into_dyn();
        let opts = StretchOptions::default().with_no_data(0.0);
        let out = manual_stretch(arr.view(), &StretchParams::single(0.0, 100.0), &opts)
            .unwrap()
            .into_float()
            .unwrap();

        assert!(out[[0, 0]].is_nan());
        assert!(out[[0, 2]].is_nan());
        assert_relative_eq!(out[[0, 1]], 0.5);
        assert_relative_eq!(out[[0, 3]], 1.0);
    }

    #[test]
    fn test_no_data_truncates_to_zero() {
        let arr = array![[7u8, 9]].into_dyn();
        let opts = StretchOptions::default()
            .with_no_data(7.0)
            .with_gain_offset(10.0, 0.0)
            .with_output_range(0.0, 10.0)
            .with_int_output(true);
        let out = manual_stretch(arr.view(), &StretchParams::single(8.0, 10.0), &opts)
            .unwrap()
            .into_int()
            .unwrap();

        assert_eq!(out.as_slice().unwrap(), &[0, 5]);
    }

    #[test]
    fn test_zero_range_not_guarded() {
        let arr = array![[4.0, 5.0, 6.0]].into_dyn();
        let params = StretchParams::single(5.0, 5.0);
        let out = manual_stretch(arr.view(), &params, &StretchOptions::default())
            .unwrap()
            .into_float()
            .unwrap();

        // -inf and +inf clamp, 0/0 stays NaN
        assert_eq!(out[[0, 0]], 0.0);
        assert!(out[[0, 1]].is_nan());
        assert_eq!(out[[0, 2]], 1.0);
    }

    #[test]
    fn test_input_not_mutated() {
        let arr = row();
        let before = arr.clone();
        let params = StretchParams::single(0.0, 100.0);
        let _ = manual_stretch(arr.view(), &params, &StretchOptions::default());
        assert_eq!(arr, before);
    }

    #[test]
    fn test_params_from_json() {
        let single = StretchParams::from_json_str(r#"{"min": 10, "max": 400}"#).unwrap();
        assert_eq!(single, StretchParams::single(10.0, 400.0));

        let multi = StretchParams::from_json_str(
            r#"[{"min": 10, "max": 400}, {"min": 22, "max": 300}, {"min": 1, "max": 120}]"#,
        )
        .unwrap();
        assert_eq!(
            multi,
            StretchParams::multi([(10.0, 400.0), (22.0, 300.0), (1.0, 120.0)])
        );
    }

    #[test]
    fn test_params_from_json_errors() {
        for bad in [
            r#"{"min": 10}"#,
            r#"[{"min": 1, "max": 2}, {"max": 3}]"#,
            r#"{"min": "low", "max": 2}"#,
            r#"[1, 2]"#,
            r#"12"#,
            r#"{"min": 1, "max": "#,
            "",
        ] {
            let err = StretchParams::from_json_str(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidParameter { .. }),
                "{} gave {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_options_from_json() {
        let opts: StretchOptions =
            serde_json::from_str(r#"{"no_data_val": 0.0, "out_gain": 255, "out_int_type": true}"#)
                .unwrap();

        assert_eq!(opts.no_data_val, Some(0.0));
        assert_eq!(opts.out_gain, 255.0);
        assert!(opts.out_int_type);
        assert_eq!(opts.max_out_val, 1.0);
    }
}
