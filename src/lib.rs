//! # SPIMKit
//!
//! Tile geometry and coordinate remapping for diSPIM / iSPIM light-sheet
//! microscopes:
//! - Grid step and tile counts that cover a requested scan volume
//! - Stage (native) to tissue-map (display) axis remapping
//! - Travel-limit checks for a proposed scan
//!
//! ## Architecture
//!
//! SPIMKit is organized as a workspace with multiple crates:
//!
//! 1. **spimkit-core** - Axes, coordinates, units, errors and stage traits
//! 2. **spimkit-tiling** - Tile geometry calculator, axis remapping, scan plans
//! 3. **spimkit-settings** - Tile specs, axis map and limits on disk
//! 4. **spimkit** - Planner binary that integrates all crates

pub use spimkit_core::{
    Axis, AxisCoordinate, AxisRange, AxisValue, Error, GeometryError, GeometryResult,
    LengthUnit, Result, SimulatedStage, Sign, StageError, StagePositionProvider,
    TravelLimitProvider, TravelLimits,
};

pub use spimkit_tiling::{
    compute_grid_step, exceeds_travel_limits, remap_axes, scan_bounds, stage_to_display,
    AxisRemapTable, AxisSource, FieldOfView, ScanPlan, ScanVolume, TileGeometryCalculator,
    TileGrid, TileOverlap, TravelViolations,
};

pub use spimkit_settings::{
    Config, FieldKind, FieldSpec, SettingsError, SettingsResult, TileSpecs,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Console output on stderr, so command output on stdout stays parseable
/// - RUST_LOG environment variable support
/// - `info` by default, `debug` when `verbose` is set
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
