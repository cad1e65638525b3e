//! Unit conversion utilities
//!
//! Three linear units are in play:
//! - tenths of a micrometer, the integer unit the stage controller reports in
//! - micrometers, used for all tiling geometry (field of view, volumes, steps)
//! - millimeters, used by the tissue map and for stage travel limits

use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    /// 0.1 um, native stage encoder unit
    TenthMicrometer,
    /// Micrometers
    Micrometer,
    /// Millimeters
    Millimeter,
}

impl LengthUnit {
    /// Number of tenth-micrometers in one of this unit
    fn tenths(self) -> f64 {
        match self {
            LengthUnit::TenthMicrometer => 1.0,
            LengthUnit::Micrometer => 10.0,
            LengthUnit::Millimeter => 10_000.0,
        }
    }

    /// Convert a value from one unit to another
    ///
    /// # Arguments
    /// * `value` - The value to convert
    /// * `from` - The unit of the input value
    /// * `to` - The target unit
    pub fn convert(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
        if from == to {
            return value;
        }
        value * from.tenths() / to.tenths()
    }

    /// Short label ("0.1um", "um" or "mm")
    pub fn label(self) -> &'static str {
        match self {
            LengthUnit::TenthMicrometer => "0.1um",
            LengthUnit::Micrometer => "um",
            LengthUnit::Millimeter => "mm",
        }
    }
}

impl Default for LengthUnit {
    fn default() -> Self {
        Self::Micrometer
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Format a length for display, three decimal places
pub fn format_length(value: f64, unit: LengthUnit) -> String {
    format!("{:.3} {}", value, unit)
}
