//! # SPIMKit Core
//!
//! Core types for SPIMKit.
//! Provides the axis and coordinate model shared by the stage and display
//! conventions, length units, travel ranges, the error taxonomy and the
//! traits through which stage hardware is consulted.

pub mod data;
pub mod error;
pub mod stage;
pub mod units;

pub use data::{Axis, AxisCoordinate, AxisRange, AxisValue, Sign, TravelLimits};

pub use error::{Error, GeometryError, GeometryResult, Result, StageError};

pub use stage::{SimulatedStage, StagePositionProvider, TravelLimitProvider};

pub use units::LengthUnit;
