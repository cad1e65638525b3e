//! SPIMKit Settings Crate
//!
//! Handles application configuration, settings persistence, and the field
//! schema front ends use to edit tile specs.

pub mod config;
pub mod error;
pub mod schema;

pub use config::{Config, TileSpecs};
pub use error::{SettingsError, SettingsResult};
pub use schema::{FieldKind, FieldSpec};
