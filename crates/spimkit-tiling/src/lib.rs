//! # SPIMKit Tiling
//!
//! Geometry for planning light-sheet acquisitions as a grid of camera tiles.
//!
//! ## Calculations
//!
//! - **Grid step**: center-to-center tile distance from field of view and overlap
//! - **Tile counts**: the smallest grid that covers a requested scan volume
//! - **Axis remapping**: stage (native) axes to display axes and back
//! - **Travel limits**: which axes a proposed scan would drive out of range
//! - **Scan plans**: tile positions and the bounding box of a whole acquisition
//!
//! Everything here is a pure function of its arguments. Tiling geometry is in
//! micrometers; raw stage readings are tenths of a micrometer and the display
//! frame is millimeters.

pub mod grid;
pub mod limits;
pub mod plan;
pub mod remap;

pub use grid::{
    compute_grid_step, FieldOfView, ScanVolume, TileGeometryCalculator, TileGrid, TileOverlap,
    DEFAULT_STEP_INCREMENT_UM, MAX_TILE_POSITIONS,
};
pub use limits::{exceeds_travel_limits, TravelViolations};
pub use plan::{scan_bounds, stage_to_display, ScanPlan};
pub use remap::{remap_axes, AxisRemapTable, AxisSource};
