//! Simulation configuration
//!
//! Plain data with defaults and a `validate` pass, so hosts can build it by hand
//! or deserialize it with serde before constructing a grid.

use crate::error::FluidError;
use crate::grid::MIN_GRID_DIMENSION;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pressure written into a cell by a pointer-hover injection
pub const DEFAULT_INJECTION_PRESSURE: f32 = 500.0;

/// Reference tick cadence of the fountain (one step every 10 ms)
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Fluid grid configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidConfig {
    /// Grid width in cells (including the border)
    pub width: usize,
    /// Grid height in cells (including the border)
    pub height: usize,
    /// Pressure set by `inject_pressure`
    pub injection_pressure: f32,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 40,
            injection_pressure: DEFAULT_INJECTION_PRESSURE,
        }
    }
}

impl FluidConfig {
    /// Config with the given dimensions and the default injection pressure
    #[must_use]
    pub fn with_dimensions(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Check the config can produce a grid
    ///
    /// # Errors
    ///
    /// Returns `FluidError::InvalidDimensions` if either dimension is below
    /// [`MIN_GRID_DIMENSION`], or `FluidError::InvalidConfig` if the injection
    /// pressure is not finite.
    pub fn validate(&self) -> Result<(), FluidError> {
        if self.width < MIN_GRID_DIMENSION || self.height < MIN_GRID_DIMENSION {
            return Err(FluidError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !self.injection_pressure.is_finite() {
            return Err(FluidError::InvalidConfig(format!(
                "injection pressure must be finite, got {}",
                self.injection_pressure
            )));
        }
        Ok(())
    }
}
