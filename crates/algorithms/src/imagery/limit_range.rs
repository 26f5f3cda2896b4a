//! Value range limiting
//!
//! Replace values outside a threshold window with fixed output values.

use ndarray::{ArrayD, ArrayViewD};
use rsutils_core::RasterElement;
use serde::{Deserialize, Serialize};

/// Thresholds and replacement values for [`limit_range`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitRange {
    /// Values strictly below this are replaced
    pub min_thres: f64,
    /// Replacement for values below `min_thres`
    pub min_out_val: f64,
    /// Values strictly above this are replaced
    pub max_thres: f64,
    /// Replacement for values above `max_thres`
    pub max_out_val: f64,
}

impl LimitRange {
    pub fn new(min_thres: f64, min_out_val: f64, max_thres: f64, max_out_val: f64) -> Self {
        Self {
            min_thres,
            min_out_val,
            max_thres,
            max_out_val,
        }
    }

    /// Hard clamp to `[min, max]`: the thresholds double as the replacements
    pub fn clamp(min: f64, max: f64) -> Self {
        Self::new(min, min, max, max)
    }

    #[inline]
    fn apply(&self, v: f64) -> f64 {
        if v < self.min_thres {
            self.min_out_val
        } else if v > self.max_thres {
            self.max_out_val
        } else {
            v
        }
    }
}

impl Default for LimitRange {
    fn default() -> Self {
        Self::clamp(0.0, 1.0)
    }
}

/// Limit the range of an array.
///
/// Every element below `min_thres` becomes `min_out_val` and every element
/// above `max_thres` becomes `max_out_val`; both tests look at the input
/// value. NaN fails both comparisons and is copied unchanged. The input is
/// not modified.
///
/// # Example
/// ```ignore
/// // mask values below 0 to 0 and above 1 to 1
/// let limited = limit_range(arr.view(), &LimitRange::default());
/// ```
pub fn limit_range<T: RasterElement>(arr: ArrayViewD<'_, T>, params: &LimitRange) -> ArrayD<f64> {
    arr.mapv(|v| params.apply(v.as_f64()))
}

/// In-place variant of [`limit_range`] for `f64` arrays the caller owns
pub fn limit_range_inplace(arr: &mut ArrayD<f64>, params: &LimitRange) {
    arr.mapv_inplace(|v| params.apply(v));
}
