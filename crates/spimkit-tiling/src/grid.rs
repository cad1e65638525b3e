//! Tile grid calculation
//!
//! Turns a camera field of view, per-axis overlap percentages and a requested
//! scan volume into a grid of tiles. All lengths are micrometers.
//!
//! Grid steps are rounded up to a whole step increment (1 um by default).
//! Tile counts are the smallest integers whose stepped coverage reaches the
//! requested volume:
//!
//! ```text
//! tiles = 1                                   if volume <= fov
//! tiles = ceil((volume - fov) / step) + 1     otherwise
//! ```
//!
//! so `(tiles - 1) * step + fov >= volume` always holds.

use serde::{Deserialize, Serialize};
use spimkit_core::{AxisCoordinate, GeometryError, GeometryResult};
use tracing::debug;

/// Smallest physical increment a grid step is rounded to, in micrometers
pub const DEFAULT_STEP_INCREMENT_UM: f64 = 1.0;

/// Largest number of XY tile positions `TileGrid::tile_positions` will list
pub const MAX_TILE_POSITIONS: u64 = 1 << 24;

/// Distance from a whole increment below which a step counts as exact
const SNAP_TOLERANCE: f64 = 1e-9;

fn require_positive(parameter: &str, value: f64) -> GeometryResult<f64> {
    if !value.is_finite() {
        return Err(GeometryError::invalid_input(parameter, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(GeometryError::invalid_input(parameter, value, "must be greater than 0"));
    }
    Ok(value)
}

fn require_non_negative(parameter: &str, value: f64) -> GeometryResult<f64> {
    if !value.is_finite() {
        return Err(GeometryError::invalid_input(parameter, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(GeometryError::invalid_input(parameter, value, "must not be negative"));
    }
    Ok(value)
}

fn require_overlap(parameter: &str, value: f64) -> GeometryResult<f64> {
    // NaN fails both comparisons
    if !(value >= 0.0 && value < 100.0) {
        return Err(GeometryError::invalid_input(
            parameter,
            value,
            "overlap must be in [0, 100) percent",
        ));
    }
    Ok(value)
}

/// Round `value` up to a whole number of increments, never below one increment
fn ceil_to_increment(value: f64, increment: f64) -> f64 {
    let units = value / increment;
    let nearest = units.round();
    let whole = if (units - nearest).abs() <= SNAP_TOLERANCE {
        nearest
    } else {
        units.ceil()
    };
    whole.max(1.0) * increment
}

fn stepped(
    fov: f64,
    overlap_percent: f64,
    increment: f64,
    fov_name: &str,
    overlap_name: &str,
) -> GeometryResult<f64> {
    let fov = require_positive(fov_name, fov)?;
    let overlap = require_overlap(overlap_name, overlap_percent)?;
    Ok(ceil_to_increment(fov * (1.0 - overlap / 100.0), increment))
}

fn to_count(tiles: f64, parameter: &str, volume: f64) -> GeometryResult<u32> {
    if tiles > f64::from(u32::MAX) {
        return Err(GeometryError::invalid_input(
            parameter,
            volume,
            "volume needs more tiles than can be addressed",
        ));
    }
    Ok(tiles as u32)
}

/// Move an estimated count to the smallest `n >= 1` for which `covers(n)` holds
///
/// The estimate comes from a floating-point division and can be one off in
/// either direction when the volume lies within a few ULPs of a tile edge.
fn settle_count(
    estimate: u32,
    parameter: &str,
    volume: f64,
    covers: impl Fn(u32) -> bool,
) -> GeometryResult<u32> {
    let mut count = estimate.max(1);
    while count > 1 && covers(count - 1) {
        count -= 1;
    }
    while !covers(count) {
        count = count.checked_add(1).ok_or_else(|| {
            GeometryError::invalid_input(
                parameter,
                volume,
                "volume needs more tiles than can be addressed",
            )
        })?;
    }
    Ok(count)
}

/// Tiles needed along one stepped axis
fn tiles_along(volume: f64, fov: f64, step: f64, parameter: &str) -> GeometryResult<u32> {
    if volume <= fov {
        return Ok(1);
    }
    let estimate = to_count(((volume - fov) / step).ceil() + 1.0, parameter, volume)?;
    settle_count(estimate, parameter, volume, |n| {
        f64::from(n - 1) * step + fov >= volume
    })
}

/// Planes needed to sweep `volume` in steps of `step`
fn planes_along(volume: f64, step: f64, parameter: &str) -> GeometryResult<u32> {
    let estimate = to_count((volume / step).ceil().max(1.0), parameter, volume)?;
    settle_count(estimate, parameter, volume, |n| f64::from(n) * step >= volume)
}

/// Center-to-center distance between adjacent tiles, in micrometers
///
/// `step = fov * (1 - overlap_percent / 100)`, rounded up to the nearest
/// whole micrometer.
///
/// # Errors
/// `InvalidGeometryInput` if `fov` is not a positive finite number or
/// `overlap_percent` is outside `[0, 100)`.
pub fn compute_grid_step(fov: f64, overlap_percent: f64) -> GeometryResult<f64> {
    stepped(
        fov,
        overlap_percent,
        DEFAULT_STEP_INCREMENT_UM,
        "fov",
        "overlap_percent",
    )
}

/// Physical extent of one camera tile, in micrometers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    /// Extent along X
    pub width_um: f64,
    /// Extent along Y
    pub height_um: f64,
}

impl FieldOfView {
    /// Create a field of view, rejecting non-positive extents
    pub fn new(width_um: f64, height_um: f64) -> GeometryResult<Self> {
        let fov = Self {
            width_um,
            height_um,
        };
        fov.validate()?;
        Ok(fov)
    }

    /// Field of view of a sensor seen through the detection objective
    ///
    /// * `pixels_x`, `pixels_y` - Sensor size in pixels
    /// * `pixel_pitch_um` - Physical pixel size on the sensor
    /// * `magnification` - Total detection magnification
    pub fn from_sensor(
        pixels_x: u32,
        pixels_y: u32,
        pixel_pitch_um: f64,
        magnification: f64,
    ) -> GeometryResult<Self> {
        let pitch = require_positive("pixel_pitch_um", pixel_pitch_um)?;
        let magnification = require_positive("magnification", magnification)?;
        Self::new(
            f64::from(pixels_x) * pitch / magnification,
            f64::from(pixels_y) * pitch / magnification,
        )
    }

    /// Check both extents are positive and finite
    pub fn validate(&self) -> GeometryResult<()> {
        require_positive("fov_x", self.width_um)?;
        require_positive("fov_y", self.height_um)?;
        Ok(())
    }
}

/// Overlap between adjacent tiles, percent, independent per axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TileOverlap {
    /// Overlap along X
    pub x_percent: f64,
    /// Overlap along Y
    pub y_percent: f64,
}

impl TileOverlap {
    /// Create an overlap, rejecting percentages outside `[0, 100)`
    pub fn new(x_percent: f64, y_percent: f64) -> GeometryResult<Self> {
        let overlap = Self {
            x_percent,
            y_percent,
        };
        overlap.validate()?;
        Ok(overlap)
    }

    /// Check both percentages are in `[0, 100)`
    pub fn validate(&self) -> GeometryResult<()> {
        require_overlap("overlap_x_percent", self.x_percent)?;
        require_overlap("overlap_y_percent", self.y_percent)?;
        Ok(())
    }
}

/// Requested acquisition extents and z-step, in micrometers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanVolume {
    /// Extent along X
    pub x_um: f64,
    /// Extent along Y
    pub y_um: f64,
    /// Stack height along Z
    pub z_um: f64,
    /// Distance between planes of a stack
    pub z_step_um: f64,
}

impl ScanVolume {
    /// Create a scan volume, rejecting negative extents and non-positive steps
    pub fn new(x_um: f64, y_um: f64, z_um: f64, z_step_um: f64) -> GeometryResult<Self> {
        let volume = Self {
            x_um,
            y_um,
            z_um,
            z_step_um,
        };
        volume.validate()?;
        Ok(volume)
    }

    /// Check extents are non-negative and the z step is positive
    pub fn validate(&self) -> GeometryResult<()> {
        require_non_negative("volume_x", self.x_um)?;
        require_non_negative("volume_y", self.y_um)?;
        require_non_negative("volume_z", self.z_um)?;
        require_positive("z_step_size", self.z_step_um)?;
        Ok(())
    }

    /// Extents as a coordinate
    pub fn extent(&self) -> AxisCoordinate<f64> {
        AxisCoordinate::new(self.x_um, self.y_um, self.z_um)
    }
}

/// A computed tile grid
///
/// Derived on demand from field of view, overlap and volume; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    /// Tiles along X
    pub x_tile_count: u32,
    /// Tiles along Y
    pub y_tile_count: u32,
    /// Planes along Z
    pub z_tile_count: u32,
    /// Center-to-center distance along X
    pub x_step: f64,
    /// Center-to-center distance along Y
    pub y_step: f64,
    /// Plane spacing along Z
    pub z_step: f64,
    /// Field of view the grid was computed for
    pub fov: FieldOfView,
}

impl TileGrid {
    /// Number of XY tile positions (one z stack each)
    pub fn total_tiles(&self) -> u64 {
        u64::from(self.x_tile_count) * u64::from(self.y_tile_count)
    }

    /// Number of frames over all stacks
    pub fn total_frames(&self) -> u64 {
        self.total_tiles() * u64::from(self.z_tile_count)
    }

    /// Physical extent the grid actually images
    pub fn covered_extent(&self) -> AxisCoordinate<f64> {
        AxisCoordinate::new(
            f64::from(self.x_tile_count.saturating_sub(1)) * self.x_step + self.fov.width_um,
            f64::from(self.y_tile_count.saturating_sub(1)) * self.y_step + self.fov.height_um,
            f64::from(self.z_tile_count) * self.z_step,
        )
    }

    /// Start position of every tile, rows along X stacked along Y
    ///
    /// Each tile keeps the Z of `start`; the stack is swept from there.
    ///
    /// # Errors
    /// `InvalidGeometryInput` if the grid has more than [`MAX_TILE_POSITIONS`]
    /// XY tiles.
    pub fn tile_positions(
        &self,
        start: &AxisCoordinate<f64>,
    ) -> GeometryResult<Vec<AxisCoordinate<f64>>> {
        let total = self.total_tiles();
        if total > MAX_TILE_POSITIONS {
            return Err(GeometryError::invalid_input(
                "tile_count",
                total as f64,
                format!("more than {} tile positions to list", MAX_TILE_POSITIONS),
            ));
        }
        let mut positions = Vec::with_capacity(total as usize);
        for row in 0..self.y_tile_count {
            for col in 0..self.x_tile_count {
                positions.push(AxisCoordinate::new(
                    start.x + f64::from(col) * self.x_step,
                    start.y + f64::from(row) * self.y_step,
                    start.z,
                ));
            }
        }
        Ok(positions)
    }
}

/// Tile geometry for one camera field of view
///
/// Stateless apart from its fixed inputs; safe to share between threads and
/// call concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileGeometryCalculator {
    fov: FieldOfView,
    step_increment_um: f64,
}

impl TileGeometryCalculator {
    /// Create a calculator rounding steps to whole micrometers
    pub fn new(fov: FieldOfView) -> Self {
        Self {
            fov,
            step_increment_um: DEFAULT_STEP_INCREMENT_UM,
        }
    }

    /// Use a different rounding increment for grid steps
    pub fn with_step_increment(mut self, increment_um: f64) -> GeometryResult<Self> {
        self.step_increment_um = require_positive("step_increment_um", increment_um)?;
        Ok(self)
    }

    /// The field of view this calculator tiles with
    pub fn field_of_view(&self) -> FieldOfView {
        self.fov
    }

    /// Rounding increment for grid steps
    pub fn step_increment(&self) -> f64 {
        self.step_increment_um
    }

    /// Grid step for an arbitrary extent, rounded to this calculator's increment
    pub fn compute_grid_step(&self, fov: f64, overlap_percent: f64) -> GeometryResult<f64> {
        stepped(
            fov,
            overlap_percent,
            self.step_increment_um,
            "fov",
            "overlap_percent",
        )
    }

    /// Tile counts and steps covering the requested volume
    ///
    /// # Errors
    /// `InvalidGeometryInput` for an overlap outside `[0, 100)`, a negative or
    /// non-finite volume, or a z step that is not positive.
    pub fn compute_tile_counts(
        &self,
        overlap_x_percent: f64,
        overlap_y_percent: f64,
        z_step_size: f64,
        volume_x: f64,
        volume_y: f64,
        volume_z: f64,
    ) -> GeometryResult<TileGrid> {
        let x_step = stepped(
            self.fov.width_um,
            overlap_x_percent,
            self.step_increment_um,
            "fov_x",
            "overlap_x_percent",
        )?;
        let y_step = stepped(
            self.fov.height_um,
            overlap_y_percent,
            self.step_increment_um,
            "fov_y",
            "overlap_y_percent",
        )?;
        let z_step = require_positive("z_step_size", z_step_size)?;
        let volume_x = require_non_negative("volume_x", volume_x)?;
        let volume_y = require_non_negative("volume_y", volume_y)?;
        let volume_z = require_non_negative("volume_z", volume_z)?;

        let grid = TileGrid {
            x_tile_count: tiles_along(volume_x, self.fov.width_um, x_step, "volume_x")?,
            y_tile_count: tiles_along(volume_y, self.fov.height_um, y_step, "volume_y")?,
            z_tile_count: planes_along(volume_z, z_step, "volume_z")?,
            x_step,
            y_step,
            z_step,
            fov: self.fov,
        };

        debug!(
            "Tile grid {}x{}x{} (steps {} um, {} um, {} um) for volume {} x {} x {} um",
            grid.x_tile_count,
            grid.y_tile_count,
            grid.z_tile_count,
            grid.x_step,
            grid.y_step,
            grid.z_step,
            volume_x,
            volume_y,
            volume_z
        );

        Ok(grid)
    }

    /// Tile grid for a validated overlap and volume
    pub fn compute_grid(&self, overlap: &TileOverlap, volume: &ScanVolume) -> GeometryResult<TileGrid> {
        self.compute_tile_counts(
            overlap.x_percent,
            overlap.y_percent,
            volume.z_step_um,
            volume.x_um,
            volume.y_um,
            volume.z_um,
        )
    }
}
