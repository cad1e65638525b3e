//! Scan plans and the tissue map frame
//!
//! A `ScanPlan` ties a computed tile grid to a start position so the tile
//! positions, the acquisition's bounding box and its travel-limit check all
//! come from the same numbers. The tissue map shows stage positions and scan
//! outlines in millimeters on display axes; helpers here convert to that frame.

use crate::grid::{FieldOfView, ScanVolume, TileGeometryCalculator, TileGrid, TileOverlap};
use crate::limits::{exceeds_travel_limits, TravelViolations};
use crate::remap::AxisRemapTable;
use serde::{Deserialize, Serialize};
use spimkit_core::{AxisCoordinate, GeometryError, GeometryResult, LengthUnit, TravelLimits};
use tracing::debug;

/// Endpoints `[start, start + extent]` of a box on every axis
pub fn scan_bounds(
    start: &AxisCoordinate<f64>,
    extent: &AxisCoordinate<f64>,
) -> AxisCoordinate<[f64; 2]> {
    AxisCoordinate::from_fn(|axis| [start[axis], start[axis] + extent[axis]])
}

/// Native stage reading (tenths of a micrometer) as a display position in millimeters
pub fn stage_to_display(
    position: &AxisCoordinate<i64>,
    remap_table: &AxisRemapTable,
) -> AxisCoordinate<f64> {
    let native_mm = position.map(|v| {
        LengthUnit::convert(v as f64, LengthUnit::TenthMicrometer, LengthUnit::Millimeter)
    });
    remap_table.apply(&native_mm)
}

/// A tile grid anchored at a start position, in micrometers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanPlan {
    /// Corner of the first tile, native stage axes
    pub start_um: AxisCoordinate<f64>,
    /// Grid covering the requested volume
    pub grid: TileGrid,
}

impl ScanPlan {
    /// Plan an acquisition of `volume` starting at `start_um`
    pub fn new(
        calculator: &TileGeometryCalculator,
        overlap: &TileOverlap,
        volume: &ScanVolume,
        start_um: AxisCoordinate<f64>,
    ) -> GeometryResult<Self> {
        for (axis, value) in start_um.iter() {
            if !value.is_finite() {
                return Err(GeometryError::invalid_input(
                    format!("start_{}", axis.to_string().to_lowercase()),
                    *value,
                    "must be finite",
                ));
            }
        }
        let grid = calculator.compute_grid(overlap, volume)?;
        debug!("Planned {} tiles from {}", grid.total_tiles(), start_um);
        Ok(Self { start_um, grid })
    }

    /// Field of view the plan was computed for
    pub fn field_of_view(&self) -> FieldOfView {
        self.grid.fov
    }

    /// Start position of every tile
    ///
    /// # Errors
    /// `InvalidGeometryInput` if the grid is too large to list.
    pub fn tile_positions(&self) -> GeometryResult<Vec<AxisCoordinate<f64>>> {
        self.grid.tile_positions(&self.start_um)
    }

    /// Bounding box of everything the plan images, micrometers
    pub fn bounds(&self) -> AxisCoordinate<[f64; 2]> {
        scan_bounds(&self.start_um, &self.grid.covered_extent())
    }

    /// Bounding box on display axes in millimeters, for the tissue map outline
    pub fn display_bounds(&self, remap_table: &AxisRemapTable) -> AxisCoordinate<[f64; 2]> {
        let mm = self.bounds().map(|[a, b]| {
            [
                LengthUnit::convert(a, LengthUnit::Micrometer, LengthUnit::Millimeter),
                LengthUnit::convert(b, LengthUnit::Micrometer, LengthUnit::Millimeter),
            ]
        });
        remap_table.apply(&mm)
    }

    /// Axes on which the imaged box leaves travel limits given in millimeters
    pub fn check_travel(&self, limits_mm: &TravelLimits) -> TravelViolations {
        let start = self
            .start_um
            .convert(LengthUnit::Micrometer, LengthUnit::Millimeter);
        let extent = self
            .grid
            .covered_extent()
            .convert(LengthUnit::Micrometer, LengthUnit::Millimeter);
        exceeds_travel_limits(&start, &extent, limits_mm)
    }
}
