//! Stage collaborator contracts
//!
//! The geometry code never talks to hardware. It needs exactly two things from
//! the stage controller: the current sample position and the travel limits of
//! each axis. Both are expressed as traits so the instrument layer can supply
//! its driver and tests can supply [`SimulatedStage`].

use crate::data::{Axis, AxisCoordinate, AxisRange, TravelLimits};
use crate::error::{Result, StageError};
use parking_lot::RwLock;

/// Source of the current sample position
pub trait StagePositionProvider: Send + Sync {
    /// Current position in native stage axes, tenths of a micrometer
    fn sample_position(&self) -> Result<AxisCoordinate<i64>>;
}

/// Source of per-axis travel limits
pub trait TravelLimitProvider: Send + Sync {
    /// Travel limits in millimeters for each requested axis, in request order
    fn travel_limits(&self, axes: &[Axis]) -> Result<Vec<(Axis, AxisRange)>>;

    /// Travel limits for all three axes
    fn travel_limit_set(&self) -> Result<TravelLimits> {
        let reported = self.travel_limits(&Axis::ALL)?;
        let lookup = |axis: Axis| {
            reported
                .iter()
                .find(|(a, _)| *a == axis)
                .map(|(_, range)| *range)
                .ok_or_else(|| StageError::UnknownAxis {
                    axis: axis.to_string(),
                })
        };
        Ok(TravelLimits::new(
            lookup(Axis::X)?,
            lookup(Axis::Y)?,
            lookup(Axis::Z)?,
        ))
    }
}

/// In-memory stage used when no hardware is attached
#[derive(Debug)]
pub struct SimulatedStage {
    position: RwLock<AxisCoordinate<i64>>,
    limits: TravelLimits,
}

impl SimulatedStage {
    /// Create a simulated stage at the origin with the given limits (mm)
    pub fn new(limits: TravelLimits) -> Self {
        Self {
            position: RwLock::new(AxisCoordinate::default()),
            limits,
        }
    }

    /// Move to an absolute position in tenths of a micrometer
    pub fn move_absolute(&self, position: AxisCoordinate<i64>) {
        tracing::debug!("Simulated stage moving to {}", position);
        *self.position.write() = position;
    }

    /// Configured limits
    pub fn limits(&self) -> &TravelLimits {
        &self.limits
    }
}

impl Default for SimulatedStage {
    /// 60 mm of travel from zero on every axis
    fn default() -> Self {
        let range = AxisRange::new(0.0, 60.0);
        Self::new(TravelLimits::new(range, range, range))
    }
}

impl StagePositionProvider for SimulatedStage {
    fn sample_position(&self) -> Result<AxisCoordinate<i64>> {
        Ok(*self.position.read())
    }
}

impl TravelLimitProvider for SimulatedStage {
    fn travel_limits(&self, axes: &[Axis]) -> Result<Vec<(Axis, AxisRange)>> {
        Ok(axes.iter().map(|&axis| (axis, self.limits[axis])).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_position() {
        let stage = SimulatedStage::default();
        assert_eq!(stage.sample_position().unwrap(), AxisCoordinate::new(0, 0, 0));

        stage.move_absolute(AxisCoordinate::new(100, -200, 300));
        assert_eq!(
            stage.sample_position().unwrap(),
            AxisCoordinate::new(100, -200, 300)
        );
    }

    #[test]
    fn test_requested_axes_only() {
        let stage = SimulatedStage::default();
        let limits = stage.travel_limits(&[Axis::X, Axis::Y]).unwrap();
        assert_eq!(limits.len(), 2);
        assert_eq!(limits[0], (Axis::X, AxisRange::new(0.0, 60.0)));
        assert_eq!(limits[1].0, Axis::Y);
    }

    struct PartialStage;

    impl TravelLimitProvider for PartialStage {
        fn travel_limits(&self, _axes: &[Axis]) -> Result<Vec<(Axis, AxisRange)>> {
            Ok(vec![(Axis::X, AxisRange::new(0.0, 1.0))])
        }
    }

    #[test]
    fn test_missing_axis_is_an_error() {
        let err = PartialStage.travel_limit_set().unwrap_err();
        assert!(err.is_stage_error());
        assert_eq!(err.to_string(), "Stage has no axis Y");
    }
}
