//! Data models for axes, coordinates and travel ranges
//!
//! This module provides:
//! - The three physical axes and a sign flag for remapping
//! - `AxisCoordinate`, a value for each of X, Y and Z
//! - `AxisValue`, the element-wise sign rule used by axis remapping
//! - Travel ranges and per-axis travel limits

pub mod range;

pub use range::{AxisRange, TravelLimits};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// One of the three linear axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// All axes in X, Y, Z order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of this axis in X, Y, Z order
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            other => Err(format!("Unknown axis: {}", other)),
        }
    }
}

/// Sign applied when copying a native axis onto a display axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sign {
    /// Keep the value
    #[default]
    #[serde(rename = "+")]
    Positive,
    /// Negate the value
    #[serde(rename = "-")]
    Negative,
}

impl Sign {
    /// Composition of two signs
    pub fn combine(self, other: Sign) -> Sign {
        if self == other {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }

    /// The sign as a factor of 1 or -1
    pub fn factor(self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Positive => write!(f, "+"),
            Sign::Negative => write!(f, "-"),
        }
    }
}

/// A value that can be carried through an axis remap
///
/// Remapping copies values between axes and negates them when the mapping
/// says so. Composite values (lists of endpoints, ranges) apply the rule to
/// every element.
pub trait AxisValue: Clone {
    /// The value with `sign` applied
    fn signed(&self, sign: Sign) -> Self;
}

impl AxisValue for f64 {
    fn signed(&self, sign: Sign) -> Self {
        match sign {
            Sign::Positive => *self,
            Sign::Negative => -*self,
        }
    }
}

/// Stage readings span a few hundred millimeters, so `i64::MIN` never occurs
/// in practice; it saturates to `i64::MAX` rather than overflowing.
impl AxisValue for i64 {
    fn signed(&self, sign: Sign) -> Self {
        match sign {
            Sign::Positive => *self,
            Sign::Negative => self.saturating_neg(),
        }
    }
}

impl<T: AxisValue> AxisValue for Vec<T> {
    fn signed(&self, sign: Sign) -> Self {
        self.iter().map(|v| v.signed(sign)).collect()
    }
}

impl<T: AxisValue, const N: usize> AxisValue for [T; N] {
    fn signed(&self, sign: Sign) -> Self {
        std::array::from_fn(|i| self[i].signed(sign))
    }
}

/// A value on each of the three axes
///
/// Every coordinate carries all three axes; there is no way to build one
/// with an axis missing. The unit is a property of the convention the
/// coordinate belongs to (see [`crate::units`]), not of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AxisCoordinate<T> {
    /// X-axis value
    pub x: T,
    /// Y-axis value
    pub y: T,
    /// Z-axis value
    pub z: T,
}

impl<T> AxisCoordinate<T> {
    /// Create a coordinate from its three axis values
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Build a coordinate by evaluating `f` for each axis
    pub fn from_fn(mut f: impl FnMut(Axis) -> T) -> Self {
        Self {
            x: f(Axis::X),
            y: f(Axis::Y),
            z: f(Axis::Z),
        }
    }

    /// Value on the given axis
    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Mutable value on the given axis
    pub fn get_mut(&mut self, axis: Axis) -> &mut T {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Apply `f` to every axis value
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> AxisCoordinate<U> {
        AxisCoordinate {
            x: f(self.x),
            y: f(self.y),
            z: f(self.z),
        }
    }

    /// Iterate `(axis, value)` pairs in X, Y, Z order
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &T)> {
        [(Axis::X, &self.x), (Axis::Y, &self.y), (Axis::Z, &self.z)].into_iter()
    }
}

impl AxisCoordinate<f64> {
    /// Convert every axis between length units
    pub fn convert(self, from: crate::LengthUnit, to: crate::LengthUnit) -> Self {
        self.map(|v| crate::LengthUnit::convert(v, from, to))
    }

    /// True if every axis is within `tolerance` of `other`
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        Axis::ALL
            .iter()
            .all(|&axis| (self[axis] - other[axis]).abs() <= tolerance)
    }
}

impl<T> Index<Axis> for AxisCoordinate<T> {
    type Output = T;

    fn index(&self, axis: Axis) -> &T {
        self.get(axis)
    }
}

impl<T> IndexMut<Axis> for AxisCoordinate<T> {
    fn index_mut(&mut self, axis: Axis) -> &mut T {
        self.get_mut(axis)
    }
}

impl fmt::Display for AxisCoordinate<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{:.3} Y:{:.3} Z:{:.3}", self.x, self.y, self.z)
    }
}

impl fmt::Display for AxisCoordinate<i64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{} Y:{} Z:{}", self.x, self.y, self.z)
    }
}
