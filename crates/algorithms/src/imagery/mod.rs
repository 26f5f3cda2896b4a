//! Imagery value transforms
//!
//! Display-oriented rescaling of image arrays:
//! - Limit range: replace values outside a threshold window
//! - Manual stretch: per-band linear min/max stretch with no-data handling

mod limit_range;
mod stretch;

pub use limit_range::{limit_range, limit_range_inplace, LimitRange};
pub use stretch::{manual_stretch, BandRange, StretchOptions, StretchOutput, StretchParams};
