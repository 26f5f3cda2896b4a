//! Error types for rsutils

use thiserror::Error;

/// Broad category of an [`Error`].
///
/// Callers composing these functions into an application usually only need
/// to know whether the inputs were wrong, the data source was unusable, or a
/// coordinate fell outside the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or inconsistent caller-supplied parameters
    Validation,
    /// A data source could not be opened, read or written
    Resource,
    /// Geographic coordinates outside a raster's extent
    OutOfRange,
}

/// Main error type for rsutils operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not open {path}: {reason}")]
    OpenFailed { path: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Unusable data source: {0}")]
    MalformedSource(String),

    #[error("GDAL error: {0}")]
    #[cfg(feature = "gdal")]
    Gdal(String),

    #[error("Invalid array dimensions: expected {expected}, got {actual}")]
    InvalidDimensions { expected: String, actual: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Length mismatch: {what} ({left} vs {right})")]
    SizeMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error(
        "Coordinates outside the image extent were passed ({axis}-axis): \
         {value} not in [{min}, {max}]"
    )]
    OutOfExtent {
        axis: char,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Unsupported vector format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("No output file as no features selected")]
    NoFeaturesSelected,
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`]
    pub fn invalid(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_)
            | Error::OpenFailed { .. }
            | Error::Json(_)
            | Error::Tiff(_)
            | Error::MalformedSource(_) => ErrorKind::Resource,
            #[cfg(feature = "gdal")]
            Error::Gdal(_) => ErrorKind::Resource,
            Error::OutOfExtent { .. } => ErrorKind::OutOfRange,
            Error::InvalidDimensions { .. }
            | Error::IndexOutOfBounds { .. }
            | Error::SizeMismatch { .. }
            | Error::UnsupportedDataType(_)
            | Error::UnsupportedFormat(_)
            | Error::InvalidParameter { .. }
            | Error::NoFeaturesSelected => ErrorKind::Validation,
        }
    }
}

#[cfg(feature = "gdal")]
impl From<gdal::errors::GdalError> for Error {
    fn from(e: gdal::errors::GdalError) -> Self {
        Error::Gdal(e.to_string())
    }
}

/// Result type alias for rsutils operations
pub type Result<T> = std::result::Result<T, Error>;
