//! Stage travel ranges
//!
//! Stage controllers report axis bounds in either order depending on the
//! axis direction, so a range is stored as reported and normalised on use.

use super::{AxisCoordinate, AxisValue, Sign};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounds of one axis, in whatever order the stage reported them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// First reported bound (normally the minimum)
    pub min: f64,
    /// Second reported bound (normally the maximum)
    pub max: f64,
}

impl AxisRange {
    /// Create a range from two bounds
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The bounds as `(low, high)` regardless of reported order
    pub fn normalized(&self) -> (f64, f64) {
        if self.min > self.max {
            (self.max, self.min)
        } else {
            (self.min, self.max)
        }
    }

    /// Inclusive containment test against the normalised bounds
    ///
    /// NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        let (low, high) = self.normalized();
        value >= low && value <= high
    }

    /// Distance between the bounds
    pub fn span(&self) -> f64 {
        (self.max - self.min).abs()
    }
}

impl AxisValue for AxisRange {
    fn signed(&self, sign: Sign) -> Self {
        match sign {
            Sign::Positive => *self,
            Sign::Negative => AxisRange::new(-self.max, -self.min),
        }
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (low, high) = self.normalized();
        write!(f, "[{:.3}, {:.3}]", low, high)
    }
}

/// Per-axis travel limits
pub type TravelLimits = AxisCoordinate<AxisRange>;
