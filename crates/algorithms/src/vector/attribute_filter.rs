//! Attribute-based row removal

use rsutils_core::io::{read_vector, write_vector, VectorFormat};
use rsutils_core::{AttributeValue, Error, FeatureCollection, Result};
use std::path::Path;
use tracing::{debug, info};

/// Drop every feature whose `sub_col` attribute equals one of `sub_vals`.
///
/// Values are applied one after another to the remaining rows with exact
/// equality (integers and floats compare numerically). Features without a
/// value for the attribute are kept and the relative order of the survivors
/// is unchanged.
///
/// # Errors
/// [`Error::InvalidParameter`] if `sub_col` is not a column of the layer,
/// [`Error::NoFeaturesSelected`] if no feature remains.
pub fn drop_rows_by_attribute(
    features: &FeatureCollection,
    sub_col: &str,
    sub_vals: &[AttributeValue],
) -> Result<FeatureCollection> {
    if !features.has_column(sub_col) {
        return Err(Error::invalid("sub_col", sub_col, "column not in layer"));
    }

    let mut out = features.clone();

    for val in sub_vals {
        let before = out.len();
        out.retain(|f| !f.get_property(sub_col).is_some_and(|v| v.matches(val)));
        debug!(column = sub_col, value = %val, dropped = before - out.len(), "dropping rows");
    }

    if out.is_empty() {
        return Err(Error::NoFeaturesSelected);
    }
    Ok(out)
}

/// Subset a vector layer by removing rows that match a list of values, and
/// write the result to a new dataset.
///
/// The input is read from `vec_file`/`vec_lyr` and never modified. Layered
/// formats (the default, GeoPackage) are written with `out_vec_lyr` as the
/// layer name; any other format is written as a single-layer file. Nothing is
/// written if the filter leaves no features.
pub fn drop_rows_by_attribute_file<P, Q>(
    vec_file: P,
    vec_lyr: &str,
    sub_col: &str,
    sub_vals: &[AttributeValue],
    out_vec_file: Q,
    out_vec_lyr: &str,
    out_format: &VectorFormat,
) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let base = read_vector(vec_file.as_ref(), vec_lyr)?;
    let subset = drop_rows_by_attribute(&base, sub_col, sub_vals)?;

    let layer = out_format.is_layered().then_some(out_vec_lyr);
    write_vector(&subset, out_vec_file.as_ref(), layer, out_format)?;

    info!(
        input = base.len(),
        output = subset.len(),
        path = %out_vec_file.as_ref().display(),
        format = %out_format,
        "wrote filtered layer"
    );
    Ok(())
}
