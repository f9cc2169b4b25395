//! Error kinds for the tabular pipeline.
//!
//! Every stage fails fast with one [`SweeperError`] variant. Nothing in the
//! library retries: each stage is deterministic, so running it again on the
//! same input gives the same error. The caller decides how to surface it.
//!
//! ```
//! use data_sweeper::error::SweeperError;
//!
//! fn describe(err: &SweeperError) -> String {
//!     match err {
//!         SweeperError::Parse(msg) => format!("could not read the upload: {msg}"),
//!         SweeperError::ColumnNotFound(name) => format!("no column named {name}"),
//!         other => other.to_string(),
//!     }
//! }
//! # assert_eq!(describe(&SweeperError::ColumnNotFound("Z".to_owned())), "no column named Z");
//! ```
//!
//! Polars errors convert into [`SweeperError::Engine`] through `?`. Ingest and
//! export map engine failures to [`SweeperError::Parse`] and
//! [`SweeperError::Export`] explicitly, because there the failure means the
//! bytes were bad rather than the engine.

use std::fmt;

/// Main error type for pipeline operations.
#[derive(Debug)]
pub enum SweeperError {
    /// Uploaded bytes could not be parsed in the declared format.
    Parse(String),

    /// A projection or chart request named a column the table does not have.
    ColumnNotFound(String),

    /// A chart was requested on a column that is not numeric.
    NonNumericColumn(String),

    /// The table could not be serialized to the target format.
    Export(String),

    /// Unexpected failure inside the dataframe engine.
    Engine(String),
}

impl fmt::Display for SweeperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "Parse error: {msg}"),
            Self::ColumnNotFound(name) => write!(f, "Column not found: '{name}'"),
            Self::NonNumericColumn(name) => {
                write!(f, "Column '{name}' is not numeric and cannot be charted")
            }
            Self::Export(msg) => write!(f, "Export error: {msg}"),
            Self::Engine(msg) => write!(f, "Data processing error: {msg}"),
        }
    }
}

impl std::error::Error for SweeperError {}

impl From<polars::error::PolarsError> for SweeperError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::Engine(err.to_string())
    }
}

// The presentation layer only needs the description.
impl From<SweeperError> for String {
    fn from(err: SweeperError) -> Self {
        err.to_string()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, SweeperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SweeperError::ColumnNotFound("Z".to_owned());
        assert_eq!(err.to_string(), "Column not found: 'Z'");

        let err = SweeperError::NonNumericColumn("Name".to_owned());
        assert_eq!(
            err.to_string(),
            "Column 'Name' is not numeric and cannot be charted"
        );
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = SweeperError::Parse("No columns to parse from file".to_owned());
        let s: String = err.into();
        assert_eq!(s, "Parse error: No columns to parse from file");
    }

    #[test]
    fn test_polars_error_maps_to_engine() {
        let polars_err =
            polars::error::PolarsError::ComputeError("shape mismatch".into());
        let err: SweeperError = polars_err.into();
        assert!(matches!(err, SweeperError::Engine(_)));
        assert!(err.to_string().contains("shape mismatch"));
    }
}
