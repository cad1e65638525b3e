//! Travel limit checks
//!
//! A scan starting at `start` and spanning `volume` ends at `start + volume`
//! on every axis. Both ends have to lie inside the stage's travel range.
//! Start, volume and limits must share one unit.

use spimkit_core::{Axis, AxisCoordinate, TravelLimits};
use std::collections::BTreeSet;
use tracing::warn;

/// Axes on which a scan would leave the travel range, in X, Y, Z order
pub type TravelViolations = BTreeSet<Axis>;

/// Axes on which the scan's start or end lies outside the travel limits
///
/// Limits may be reported in either order. Non-finite start or volume values
/// count as violations. An empty set means the scan fits.
pub fn exceeds_travel_limits(
    start_pos: &AxisCoordinate<f64>,
    volume: &AxisCoordinate<f64>,
    travel_limits: &TravelLimits,
) -> TravelViolations {
    let violations: TravelViolations = Axis::ALL
        .into_iter()
        .filter(|&axis| {
            let range = travel_limits[axis];
            let start = start_pos[axis];
            let end = start + volume[axis];
            !(range.contains(start) && range.contains(end))
        })
        .collect();

    if !violations.is_empty() {
        warn!(
            "Scan from {} spanning {} exceeds travel limits on {:?}",
            start_pos, volume, violations
        );
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use spimkit_core::AxisRange;

    fn limits() -> TravelLimits {
        TravelLimits::new(
            AxisRange::new(0.0, 60.0),
            AxisRange::new(0.0, 60.0),
            AxisRange::new(-10.0, 10.0),
        )
    }

    #[test]
    fn test_inside_limits() {
        let v = exceeds_travel_limits(
            &AxisCoordinate::new(10.0, 10.0, 0.0),
            &AxisCoordinate::new(5.0, 5.0, 5.0),
            &limits(),
        );
        assert!(v.is_empty());
    }

    #[test]
    fn test_end_past_maximum() {
        let v = exceeds_travel_limits(
            &AxisCoordinate::new(58.0, 10.0, 0.0),
            &AxisCoordinate::new(5.0, 5.0, 5.0),
            &limits(),
        );
        assert_eq!(v.into_iter().collect::<Vec<_>>(), vec![Axis::X]);
    }

    #[test]
    fn test_start_below_minimum() {
        let v = exceeds_travel_limits(
            &AxisCoordinate::new(10.0, -1.0, -11.0),
            &AxisCoordinate::new(1.0, 2.0, 3.0),
            &limits(),
        );
        assert_eq!(v.into_iter().collect::<Vec<_>>(), vec![Axis::Y, Axis::Z]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let v = exceeds_travel_limits(
            &AxisCoordinate::new(0.0, 0.0, -10.0),
            &AxisCoordinate::new(60.0, 60.0, 20.0),
            &limits(),
        );
        assert!(v.is_empty());
    }

    #[test]
    fn test_reversed_limits_same_result() {
        let reversed = limits().map(|r| AxisRange::new(r.max, r.min));
        let start = AxisCoordinate::new(55.0, 1.0, 9.0);
        let volume = AxisCoordinate::new(10.0, 1.0, 2.0);
        assert_eq!(
            exceeds_travel_limits(&start, &volume, &limits()),
            exceeds_travel_limits(&start, &volume, &reversed)
        );
    }

    #[test]
    fn test_nan_is_violation() {
        let v = exceeds_travel_limits(
            &AxisCoordinate::new(f64::NAN, 0.0, 0.0),
            &AxisCoordinate::new(0.0, 0.0, 0.0),
            &limits(),
        );
        assert!(v.contains(&Axis::X));
    }
}
