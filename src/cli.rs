//! Subcommand handlers for the planner binary

use anyhow::{bail, Context};
use spimkit::{
    Axis, AxisCoordinate, Config, LengthUnit, ScanPlan, SimulatedStage, StagePositionProvider,
    TileSpecs, TravelLimitProvider, TravelViolations,
};
use spimkit_core::units::format_length;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

/// Parse `x,y,z` into a coordinate
pub fn parse_coordinate(s: &str) -> Result<AxisCoordinate<f64>, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got '{}'", s));
    };
    let value = |part: &str| {
        part.parse::<f64>()
            .map_err(|e| format!("'{}' is not a number: {}", part, e))
    };
    Ok(AxisCoordinate::new(value(*x)?, value(*y)?, value(*z)?))
}

fn resolve_path(path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Config::default_path()?),
    }
}

/// Load the configuration, falling back to defaults when no file exists yet
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = resolve_path(path)?;
    if !path.exists() {
        debug!("No configuration at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    Config::load_from_file(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))
}

fn scan_plan(config: &Config, start_um: AxisCoordinate<f64>) -> anyhow::Result<ScanPlan> {
    let specs = &config.tile_specs;
    Ok(ScanPlan::new(
        &specs.calculator()?,
        &specs.overlap()?,
        &specs.volume()?,
        start_um,
    )?)
}

fn print_bounds(label: &str, bounds: &AxisCoordinate<[f64; 2]>, unit: LengthUnit) {
    println!("{}:", label);
    for (axis, [a, b]) in bounds.iter() {
        println!(
            "  {}: {} .. {}",
            axis,
            format_length(*a, unit),
            format_length(*b, unit)
        );
    }
}

pub fn plan(
    config_path: Option<&Path>,
    start: Option<AxisCoordinate<f64>>,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path)?;
    let plan = scan_plan(&config, start.unwrap_or_default())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(ExitCode::SUCCESS);
    }

    let grid = &plan.grid;
    println!(
        "Tiles: {} x {} ({} positions), {} planes per stack, {} frames",
        grid.x_tile_count,
        grid.y_tile_count,
        grid.total_tiles(),
        grid.z_tile_count,
        grid.total_frames()
    );
    println!(
        "Step: X {:.3} um, Y {:.3} um, Z {:.3} um",
        grid.x_step, grid.y_step, grid.z_step
    );
    print_bounds("Imaged box (native, um)", &plan.bounds(), LengthUnit::Micrometer);
    print_bounds(
        "Tissue map outline (display, mm)",
        &plan.display_bounds(&config.axis_map),
        LengthUnit::Millimeter,
    );

    if start.is_some() {
        println!("Tile positions (um):");
        for (index, position) in plan.tile_positions()?.iter().enumerate() {
            println!("  {:>4}  {}", index + 1, position);
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub fn check(
    config_path: Option<&Path>,
    start: Option<AxisCoordinate<f64>>,
) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path)?;
    if travel_violations(&config, start)?.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Print the per-axis travel report and return the violating axes
fn travel_violations(
    config: &Config,
    start: Option<AxisCoordinate<f64>>,
) -> anyhow::Result<TravelViolations> {
    let stage = SimulatedStage::new(config.simulated_limits);

    let start_um = match start {
        Some(start) => start,
        None => stage
            .sample_position()?
            .map(|v| v as f64)
            .convert(LengthUnit::TenthMicrometer, LengthUnit::Micrometer),
    };
    let plan = scan_plan(config, start_um)?;
    let limits = stage.travel_limit_set()?;
    let violations = plan.check_travel(&limits);

    let bounds = plan.bounds();
    for axis in Axis::ALL {
        let [a, b] = bounds[axis];
        let status = if violations.contains(&axis) {
            "OUT OF RANGE"
        } else {
            "ok"
        };
        let mm = |um: f64| {
            format_length(
                LengthUnit::convert(um, LengthUnit::Micrometer, LengthUnit::Millimeter),
                LengthUnit::Millimeter,
            )
        };
        println!(
            "{}: {} .. {} within {} mm: {}",
            axis,
            mm(a),
            mm(b),
            limits[axis],
            status
        );
    }
    Ok(violations)
}

pub fn remap(
    config_path: Option<&Path>,
    coords: AxisCoordinate<f64>,
    inverse: bool,
) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path)?;
    let table = if inverse {
        config.axis_map.invert()
    } else {
        config.axis_map
    };
    debug!("Remapping {} with {}", coords, table);
    println!("{}", table.apply(&coords));
    Ok(ExitCode::SUCCESS)
}

pub fn get(config_path: Option<&Path>, key: Option<&str>) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path)?;
    let specs = &config.tile_specs;

    if let Some(key) = key {
        println!("{}", specs.get_field(key)?);
        return Ok(ExitCode::SUCCESS);
    }

    for field in TileSpecs::schema() {
        let unit = field.unit.map_or("%", LengthUnit::label);
        println!(
            "{:<24} {:>12} {:<3} {:<12} {}",
            field.name,
            specs.get_field(field.name)?,
            unit,
            field.range_label(),
            field.description
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub fn set(config_path: Option<&Path>, key: &str, value: &str) -> anyhow::Result<ExitCode> {
    let path = resolve_path(config_path)?;
    let mut config = load_config(Some(&path))?;
    config.tile_specs.set_field_str(key, value)?;
    config.save_to_file(&path)?;
    info!("{} = {}", key, config.tile_specs.get_field(key)?);
    Ok(ExitCode::SUCCESS)
}

pub fn init_config(path: Option<&Path>, force: bool) -> anyhow::Result<ExitCode> {
    let path = resolve_path(path)?;
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save_to_file(&path)?;
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(
            parse_coordinate("1, -2.5,3").unwrap(),
            AxisCoordinate::new(1.0, -2.5, 3.0)
        );
        assert!(parse_coordinate("1,2").is_err());
        assert!(parse_coordinate("1,2,3,4").is_err());
        assert!(parse_coordinate("1,b,3").is_err());
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_then_set() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        init_config(Some(&path), false).unwrap();
        assert!(init_config(Some(&path), false).is_err());
        init_config(Some(&path), true).unwrap();

        set(Some(&path), "volume_z_um", "250").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.tile_specs.volume_z_um, 250.0);

        assert!(set(Some(&path), "volume_z_um", "-1").is_err());
        assert!(set(Some(&path), "laser_power", "1").is_err());
    }

    #[test]
    fn test_plan_too_large_to_list_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        set(Some(&path), "volume_x_um", "1e12").unwrap();
        set(Some(&path), "volume_y_um", "1e12").unwrap();

        assert!(plan(Some(&path), None, false).is_ok());
        let err = plan(Some(&path), Some(AxisCoordinate::new(0.0, 0.0, 0.0)), false).unwrap_err();
        assert!(err.to_string().contains("tile_count"));
    }

    #[test]
    fn test_travel_violations() {
        let config = Config::default();

        let inside = travel_violations(&config, Some(AxisCoordinate::new(1000.0, 1000.0, 1000.0)));
        assert!(inside.unwrap().is_empty());

        let outside =
            travel_violations(&config, Some(AxisCoordinate::new(59_000.0, 1000.0, -1.0)));
        let axes: Vec<Axis> = outside.unwrap().into_iter().collect();
        assert_eq!(axes, vec![Axis::X, Axis::Z]);

        // the simulated stage rests at the origin
        assert!(travel_violations(&config, None).unwrap().is_empty());
    }
}
