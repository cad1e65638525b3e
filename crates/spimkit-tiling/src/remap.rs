//! Stage to display axis remapping
//!
//! The stage controller and the 3D tissue map label the same physical
//! directions differently. A remap table says, for every display axis, which
//! native stage axis feeds it and whether the value is negated. On the diSPIM
//! the display Z runs along stage X, display X along stage Y and display Y
//! against stage Z.

use serde::{Deserialize, Serialize};
use spimkit_core::{Axis, AxisCoordinate, AxisValue, GeometryError, GeometryResult, Sign};
use std::fmt;
use std::str::FromStr;

/// Where one display axis takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisSource {
    /// Sign applied to the native value
    pub sign: Sign,
    /// Native stage axis
    pub axis: Axis,
}

impl AxisSource {
    /// Take the native axis unchanged
    pub fn positive(axis: Axis) -> Self {
        Self {
            sign: Sign::Positive,
            axis,
        }
    }

    /// Take the native axis negated
    pub fn negative(axis: Axis) -> Self {
        Self {
            sign: Sign::Negative,
            axis,
        }
    }
}

impl fmt::Display for AxisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sign {
            Sign::Positive => write!(f, "{}", self.axis.to_string().to_lowercase()),
            Sign::Negative => write!(f, "-{}", self.axis.to_string().to_lowercase()),
        }
    }
}

impl FromStr for AxisSource {
    type Err = String;

    /// Parses `"z"`, `"+z"` or `"-y"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (sign, axis) = if let Some(rest) = s.strip_prefix('-') {
            (Sign::Negative, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (Sign::Positive, rest)
        } else {
            (Sign::Positive, s)
        };
        Ok(Self {
            sign,
            axis: axis.parse()?,
        })
    }
}

/// Bijective display-from-native axis table
///
/// Construction and deserialisation both reject tables that use a native
/// axis more than once, so every value of this type can be inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AxisCoordinate<AxisSource>", into = "AxisCoordinate<AxisSource>")]
pub struct AxisRemapTable {
    sources: AxisCoordinate<AxisSource>,
}

impl AxisRemapTable {
    /// Build a table from the source of each display axis
    ///
    /// # Errors
    /// `MalformedRemapTable` if a native axis is used more than once.
    pub fn new(x: AxisSource, y: AxisSource, z: AxisSource) -> GeometryResult<Self> {
        Self::try_from(AxisCoordinate::new(x, y, z))
    }

    /// The table that leaves every axis untouched
    pub fn identity() -> Self {
        Self {
            sources: AxisCoordinate::from_fn(AxisSource::positive),
        }
    }

    /// diSPIM convention: display X <- stage Y, Y <- -stage Z, Z <- stage X
    pub fn dispim() -> Self {
        Self {
            sources: AxisCoordinate::new(
                AxisSource::positive(Axis::Y),
                AxisSource::negative(Axis::Z),
                AxisSource::positive(Axis::X),
            ),
        }
    }

    /// Source of one display axis
    pub fn source(&self, display: Axis) -> AxisSource {
        self.sources[display]
    }

    /// Sources of all display axes
    pub fn sources(&self) -> &AxisCoordinate<AxisSource> {
        &self.sources
    }

    /// The table mapping display coordinates back to native ones
    pub fn invert(&self) -> Self {
        let mut inverse = Self::identity().sources;
        for (display, source) in self.sources.iter() {
            inverse[source.axis] = AxisSource {
                sign: source.sign,
                axis: display,
            };
        }
        Self { sources: inverse }
    }

    /// The table equivalent to applying `self` and then `next`
    pub fn then(&self, next: &AxisRemapTable) -> Self {
        Self {
            sources: next.sources.map(|outer| {
                let inner = self.sources[outer.axis];
                AxisSource {
                    sign: outer.sign.combine(inner.sign),
                    axis: inner.axis,
                }
            }),
        }
    }

    /// Remap a coordinate from native to display axes
    pub fn apply<T: AxisValue>(&self, coords: &AxisCoordinate<T>) -> AxisCoordinate<T> {
        self.sources
            .map(|source| coords[source.axis].signed(source.sign))
    }
}

impl Default for AxisRemapTable {
    fn default() -> Self {
        Self::dispim()
    }
}

impl TryFrom<AxisCoordinate<AxisSource>> for AxisRemapTable {
    type Error = GeometryError;

    fn try_from(sources: AxisCoordinate<AxisSource>) -> GeometryResult<Self> {
        let mut used: [Option<Axis>; 3] = [None; 3];
        for (display, source) in sources.iter() {
            if let Some(previous) = used[source.axis.index()] {
                return Err(GeometryError::malformed_table(format!(
                    "native axis {} feeds both display {} and display {}",
                    source.axis, previous, display
                )));
            }
            used[source.axis.index()] = Some(display);
        }
        Ok(Self { sources })
    }
}

impl From<AxisRemapTable> for AxisCoordinate<AxisSource> {
    fn from(table: AxisRemapTable) -> Self {
        table.sources
    }
}

impl fmt::Display for AxisRemapTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x<-{} y<-{} z<-{}",
            self.sources.x, self.sources.y, self.sources.z
        )
    }
}

/// Apply a remap table to a coordinate
///
/// `display[d] = sign * coords[native]` for every display axis `d`. Lists and
/// arrays of values are remapped element-wise, so both endpoints of a line or
/// box can be converted in one call.
pub fn remap_axes<T: AxisValue>(
    coords: &AxisCoordinate<T>,
    remap_table: &AxisRemapTable,
) -> AxisCoordinate<T> {
    remap_table.apply(coords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permuted_and_negated_axes() {
        let table = AxisRemapTable::new(
            AxisSource::positive(Axis::Z),
            AxisSource::positive(Axis::X),
            AxisSource::negative(Axis::Y),
        )
        .unwrap();
        let display = remap_axes(&AxisCoordinate::new(10.0, 20.0, 30.0), &table);
        assert_eq!(display, AxisCoordinate::new(30.0, 10.0, -20.0));
    }

    #[test]
    fn test_default_is_dispim_convention() {
        let table = AxisRemapTable::default();
        assert_eq!(table, AxisRemapTable::dispim());
        assert_eq!(table.source(Axis::X), AxisSource::positive(Axis::Y));
        assert_eq!(table.source(Axis::Y), AxisSource::negative(Axis::Z));
        assert_eq!(table.source(Axis::Z), AxisSource::positive(Axis::X));
        assert_eq!(table.to_string(), "x<-y y<--z z<-x");
    }

    #[test]
    fn test_round_trip() {
        let table = AxisRemapTable::dispim();
        let native = AxisCoordinate::new(1.5, -2.25, 8.0);
        let display = table.apply(&native);
        assert_eq!(table.invert().apply(&display), native);
        assert_eq!(table.invert().invert(), table);
    }

    #[test]
    fn test_then_inverse_is_identity() {
        let table = AxisRemapTable::dispim();
        assert_eq!(table.then(&table.invert()), AxisRemapTable::identity());
        assert_eq!(table.invert().then(&table), AxisRemapTable::identity());
    }

    #[test]
    fn test_then_matches_sequential_application() {
        let a = AxisRemapTable::dispim();
        let b = AxisRemapTable::new(
            AxisSource::negative(Axis::X),
            AxisSource::positive(Axis::Z),
            AxisSource::positive(Axis::Y),
        )
        .unwrap();
        let c = AxisCoordinate::new(3.0, -7.0, 11.0);
        assert_eq!(a.then(&b).apply(&c), b.apply(&a.apply(&c)));
    }

    #[test]
    fn test_repeated_native_axis_rejected() {
        let err = AxisRemapTable::new(
            AxisSource::positive(Axis::X),
            AxisSource::negative(Axis::X),
            AxisSource::positive(Axis::Z),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed axis remap table: native axis X feeds both display X and display Y"
        );
    }

    #[test]
    fn test_list_values_remap_elementwise() {
        let table = AxisRemapTable::dispim();
        let line = AxisCoordinate::new(vec![0.0, 1.0], vec![2.0, 3.0], vec![4.0, 5.0]);
        let display = table.apply(&line);
        assert_eq!(display.x, vec![2.0, 3.0]);
        assert_eq!(display.y, vec![-4.0, -5.0]);
        assert_eq!(display.z, vec![0.0, 1.0]);
    }

    #[test]
    fn test_axis_source_parse_and_display() {
        assert_eq!("-y".parse::<AxisSource>().unwrap(), AxisSource::negative(Axis::Y));
        assert_eq!("+Z".parse::<AxisSource>().unwrap(), AxisSource::positive(Axis::Z));
        assert_eq!("x".parse::<AxisSource>().unwrap(), AxisSource::positive(Axis::X));
        assert!("-w".parse::<AxisSource>().is_err());
        assert_eq!(AxisRemapTable::dispim().to_string(), "x<-y y<--z z<-x");
    }

    #[test]
    fn test_serde_validates() {
        let json = serde_json::to_string(&AxisRemapTable::dispim()).unwrap();
        let back: AxisRemapTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AxisRemapTable::dispim());

        let bad = r#"{"x":{"sign":"+","axis":"x"},"y":{"sign":"+","axis":"x"},"z":{"sign":"-","axis":"z"}}"#;
        assert!(serde_json::from_str::<AxisRemapTable>(bad).is_err());
    }
}
