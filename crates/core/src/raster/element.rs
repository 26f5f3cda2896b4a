//! Numeric element trait for array values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in an image array.
///
/// Every element can be promoted to `f64`, which is the working type of the
/// stretch and clamp routines.
pub trait RasterElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Promote to `f64`; values with no `f64` representation become NaN
    fn as_f64(self) -> f64 {
        <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
    }

    /// Check if this value equals the no-data sentinel
    fn is_nodata(&self, nodata: Option<f64>) -> bool {
        match nodata {
            Some(nd) => self.as_f64() == nd,
            None => false,
        }
    }
}

macro_rules! impl_raster_element {
    ($($t:ty),*) => {
        $(impl RasterElement for $t {})*
    };
}

impl_raster_element!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
