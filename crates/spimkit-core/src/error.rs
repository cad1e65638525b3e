//! Error handling for SPIMKit
//!
//! Provides error types for every layer of the workspace:
//! - Geometry errors (invalid tiling inputs, malformed remap tables)
//! - Stage errors (position and travel-limit queries)
//!
//! All error types use `thiserror` for ergonomic error handling.
//! Travel-limit violations are not errors; they are returned as a set of axes.

use thiserror::Error;

/// Geometry error type
///
/// Raised synchronously when tiling or remapping inputs are non-physical.
/// Never corrected silently: a wrong tile count means missed tissue.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A size, percentage or step is outside its physical range
    #[error("Invalid geometry input '{parameter}' = {value}: {reason}")]
    InvalidGeometryInput {
        /// The name of the offending parameter.
        parameter: String,
        /// The rejected value.
        value: f64,
        /// Why the value is rejected.
        reason: String,
    },

    /// An axis remap table is not a bijection over X, Y and Z
    #[error("Malformed axis remap table: {reason}")]
    MalformedRemapTable {
        /// What is wrong with the table.
        reason: String,
    },
}

impl GeometryError {
    /// Create an invalid-input error for a named parameter
    pub fn invalid_input(parameter: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        GeometryError::InvalidGeometryInput {
            parameter: parameter.into(),
            value,
            reason: reason.into(),
        }
    }

    /// Create a malformed remap table error
    pub fn malformed_table(reason: impl Into<String>) -> Self {
        GeometryError::MalformedRemapTable {
            reason: reason.into(),
        }
    }
}

/// Stage error type
///
/// Represents failures reported by a stage position or travel-limit provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    /// The stage has no such axis
    #[error("Stage has no axis {axis}")]
    UnknownAxis {
        /// The requested axis name.
        axis: String,
    },
}

/// Main error type for SPIMKit
///
/// A unified error type that can represent any error from the core layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Stage error
    #[error(transparent)]
    Stage(#[from] StageError),
}

impl Error {
    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a malformed remap table
    pub fn is_remap_error(&self) -> bool {
        matches!(
            self,
            Error::Geometry(GeometryError::MalformedRemapTable { .. })
        )
    }

    /// Check if this is a stage error
    pub fn is_stage_error(&self) -> bool {
        matches!(self, Error::Stage(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for geometry computations
pub type GeometryResult<T> = std::result::Result<T, GeometryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_display() {
        let err = GeometryError::invalid_input("overlap_x_percent", 100.0, "must be below 100");
        assert_eq!(
            err.to_string(),
            "Invalid geometry input 'overlap_x_percent' = 100: must be below 100"
        );

        let err = GeometryError::malformed_table("native axis Y used twice");
        assert_eq!(
            err.to_string(),
            "Malformed axis remap table: native axis Y used twice"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = GeometryError::malformed_table("x").into();
        assert!(err.is_geometry_error());
        assert!(err.is_remap_error());
        assert!(!err.is_stage_error());

        let err: Error = StageError::UnknownAxis {
            axis: "T".to_string(),
        }
        .into();
        assert!(err.is_stage_error());
        assert_eq!(err.to_string(), "Stage has no axis T");
    }
}
