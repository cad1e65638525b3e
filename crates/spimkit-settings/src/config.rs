//! Configuration and settings management for SPIMKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats.
//!
//! Configuration is organized into sections:
//! - Tile specs (field of view, overlaps, scan volume, z step), micrometers
//! - Axis map from stage axes to tissue-map display axes
//! - Travel limits used when the stage is simulated, millimeters

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use spimkit_core::{AxisRange, TravelLimits};
use spimkit_tiling::{
    AxisRemapTable, FieldOfView, ScanVolume, TileGeometryCalculator, TileGrid, TileOverlap,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Acquisition tile specs, all lengths in micrometers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSpecs {
    /// Camera field of view along X
    pub x_field_of_view_um: f64,
    /// Camera field of view along Y
    pub y_field_of_view_um: f64,
    /// Overlap between neighbouring tiles along X, percent
    pub tile_overlap_x_percent: f64,
    /// Overlap between neighbouring tiles along Y, percent
    pub tile_overlap_y_percent: f64,
    /// Plane spacing within a stack
    pub z_step_size_um: f64,
    /// Requested scan extent along X
    pub volume_x_um: f64,
    /// Requested scan extent along Y
    pub volume_y_um: f64,
    /// Requested stack height
    pub volume_z_um: f64,
}

impl Default for TileSpecs {
    fn default() -> Self {
        Self {
            x_field_of_view_um: 664.0,
            y_field_of_view_um: 664.0,
            tile_overlap_x_percent: 10.0,
            tile_overlap_y_percent: 10.0,
            z_step_size_um: 1.0,
            volume_x_um: 2000.0,
            volume_y_um: 2000.0,
            volume_z_um: 100.0,
        }
    }
}

impl TileSpecs {
    /// Camera field of view
    pub fn field_of_view(&self) -> SettingsResult<FieldOfView> {
        Ok(FieldOfView::new(
            self.x_field_of_view_um,
            self.y_field_of_view_um,
        )?)
    }

    /// Tile overlap
    pub fn overlap(&self) -> SettingsResult<TileOverlap> {
        Ok(TileOverlap::new(
            self.tile_overlap_x_percent,
            self.tile_overlap_y_percent,
        )?)
    }

    /// Requested scan volume
    pub fn volume(&self) -> SettingsResult<ScanVolume> {
        Ok(ScanVolume::new(
            self.volume_x_um,
            self.volume_y_um,
            self.volume_z_um,
            self.z_step_size_um,
        )?)
    }

    /// Calculator for the configured field of view
    pub fn calculator(&self) -> SettingsResult<TileGeometryCalculator> {
        Ok(TileGeometryCalculator::new(self.field_of_view()?))
    }

    /// Tile grid for the current specs
    pub fn compute_grid(&self) -> SettingsResult<TileGrid> {
        Ok(self
            .calculator()?
            .compute_grid(&self.overlap()?, &self.volume()?)?)
    }

    /// Validate every field
    pub fn validate(&self) -> SettingsResult<()> {
        self.field_of_view()?;
        self.overlap()?;
        self.volume()?;
        Ok(())
    }
}

fn default_simulated_limits() -> TravelLimits {
    let range = AxisRange::new(0.0, 60.0);
    TravelLimits::new(range, range, range)
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Tile specs
    #[serde(default)]
    pub tile_specs: TileSpecs,
    /// Display axes from stage axes
    #[serde(default)]
    pub axis_map: AxisRemapTable,
    /// Travel limits of the simulated stage, millimeters
    #[serde(default = "default_simulated_limits")]
    pub simulated_limits: TravelLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_specs: TileSpecs::default(),
            axis_map: AxisRemapTable::default(),
            simulated_limits: default_simulated_limits(),
        }
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(SettingsError::UnsupportedFormat(format!(
            "{} (config file must be .json or .toml)",
            path.display()
        ))),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config location: `<platform config dir>/spimkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("spimkit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    ///
    /// The axis map is valid by construction; tile specs are checked here.
    pub fn validate(&self) -> SettingsResult<()> {
        self.tile_specs.validate()
    }
}
