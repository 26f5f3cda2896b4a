//! Vector attribute operations
//!
//! - Drop rows by attribute: remove features whose column value is in an
//!   exclusion list, optionally reading and writing the layer on disk

mod attribute_filter;

pub use attribute_filter::{drop_rows_by_attribute, drop_rows_by_attribute_file};
