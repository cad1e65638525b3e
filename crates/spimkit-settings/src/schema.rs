//! Field schema for tile specs
//!
//! An explicit, ordered description of every editable tile-spec field. Front
//! ends build their input forms from this list and read or write values by
//! name through [`TileSpecs::get_field`] and [`TileSpecs::set_field`].

use crate::config::TileSpecs;
use crate::error::{SettingsError, SettingsResult};
use spimkit_core::LengthUnit;
use std::fmt;
use std::ops::Bound;
use tracing::debug;

/// Kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A physical length
    Length,
    /// A percentage
    Percent,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Length => write!(f, "length"),
            FieldKind::Percent => write!(f, "percent"),
        }
    }
}

/// Description of one editable field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Key used by `get_field` / `set_field`
    pub name: &'static str,
    /// Value kind
    pub kind: FieldKind,
    /// Lower bound
    pub min: Bound<f64>,
    /// Upper bound
    pub max: Bound<f64>,
    /// Unit of lengths; `None` for percentages
    pub unit: Option<LengthUnit>,
    /// One-line help text
    pub description: &'static str,
}

impl FieldSpec {
    /// True if `value` is finite and within the bounds
    pub fn accepts(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let above = match self.min {
            Bound::Included(min) => value >= min,
            Bound::Excluded(min) => value > min,
            Bound::Unbounded => true,
        };
        let below = match self.max {
            Bound::Included(max) => value <= max,
            Bound::Excluded(max) => value < max,
            Bound::Unbounded => true,
        };
        above && below
    }

    /// Human-readable range, e.g. `[0, 100)`
    pub fn range_label(&self) -> String {
        let low = match self.min {
            Bound::Included(v) => format!("[{}", v),
            Bound::Excluded(v) => format!("({}", v),
            Bound::Unbounded => "(-inf".to_string(),
        };
        let high = match self.max {
            Bound::Included(v) => format!("{}]", v),
            Bound::Excluded(v) => format!("{})", v),
            Bound::Unbounded => "inf)".to_string(),
        };
        format!("{}, {}", low, high)
    }
}

const fn length(name: &'static str, min: Bound<f64>, description: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Length,
        min,
        max: Bound::Unbounded,
        unit: Some(LengthUnit::Micrometer),
        description,
    }
}

const fn percent(name: &'static str, description: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Percent,
        min: Bound::Included(0.0),
        max: Bound::Excluded(100.0),
        unit: None,
        description,
    }
}

const TILE_SPEC_FIELDS: [FieldSpec; 8] = [
    length(
        "x_field_of_view_um",
        Bound::Excluded(0.0),
        "Camera field of view along X",
    ),
    length(
        "y_field_of_view_um",
        Bound::Excluded(0.0),
        "Camera field of view along Y",
    ),
    percent("tile_overlap_x_percent", "Overlap of neighbouring tiles along X"),
    percent("tile_overlap_y_percent", "Overlap of neighbouring tiles along Y"),
    length(
        "z_step_size_um",
        Bound::Excluded(0.0),
        "Plane spacing within a stack",
    ),
    length("volume_x_um", Bound::Included(0.0), "Scan extent along X"),
    length("volume_y_um", Bound::Included(0.0), "Scan extent along Y"),
    length("volume_z_um", Bound::Included(0.0), "Stack height along Z"),
];

impl TileSpecs {
    /// Ordered schema of every editable field
    pub fn schema() -> &'static [FieldSpec] {
        &TILE_SPEC_FIELDS
    }

    /// Schema entry for a field name
    pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
        TILE_SPEC_FIELDS.iter().find(|spec| spec.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "x_field_of_view_um" => Some(&mut self.x_field_of_view_um),
            "y_field_of_view_um" => Some(&mut self.y_field_of_view_um),
            "tile_overlap_x_percent" => Some(&mut self.tile_overlap_x_percent),
            "tile_overlap_y_percent" => Some(&mut self.tile_overlap_y_percent),
            "z_step_size_um" => Some(&mut self.z_step_size_um),
            "volume_x_um" => Some(&mut self.volume_x_um),
            "volume_y_um" => Some(&mut self.volume_y_um),
            "volume_z_um" => Some(&mut self.volume_z_um),
            _ => None,
        }
    }

    fn field(&self, name: &str) -> Option<f64> {
        match name {
            "x_field_of_view_um" => Some(self.x_field_of_view_um),
            "y_field_of_view_um" => Some(self.y_field_of_view_um),
            "tile_overlap_x_percent" => Some(self.tile_overlap_x_percent),
            "tile_overlap_y_percent" => Some(self.tile_overlap_y_percent),
            "z_step_size_um" => Some(self.z_step_size_um),
            "volume_x_um" => Some(self.volume_x_um),
            "volume_y_um" => Some(self.volume_y_um),
            "volume_z_um" => Some(self.volume_z_um),
            _ => None,
        }
    }

    /// Read a field by name
    pub fn get_field(&self, name: &str) -> SettingsResult<f64> {
        self.field(name)
            .ok_or_else(|| SettingsError::UnknownKey(name.to_string()))
    }

    /// Write a field by name
    ///
    /// Unknown names and out-of-range values are rejected and leave the
    /// specs unchanged.
    pub fn set_field(&mut self, name: &str, value: f64) -> SettingsResult<()> {
        let spec =
            Self::field_spec(name).ok_or_else(|| SettingsError::UnknownKey(name.to_string()))?;
        if !spec.accepts(value) {
            return Err(SettingsError::InvalidSetting {
                key: name.to_string(),
                reason: format!("{} is outside {}", value, spec.range_label()),
            });
        }
        let slot = self
            .field_mut(name)
            .ok_or_else(|| SettingsError::UnknownKey(name.to_string()))?;
        debug!("Setting {} = {} (was {})", name, value, slot);
        *slot = value;
        Ok(())
    }

    /// Parse and write a field by name
    pub fn set_field_str(&mut self, name: &str, value: &str) -> SettingsResult<()> {
        let parsed = value
            .trim()
            .parse::<f64>()
            .map_err(|e| SettingsError::InvalidSetting {
                key: name.to_string(),
                reason: e.to_string(),
            })?;
        self.set_field(name, parsed)
    }
}
