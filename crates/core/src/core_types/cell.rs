//! Simulation cell value type
//!
//! A `Cell` is one discrete point of the fluid grid. The stencil never mutates a
//! cell in place: every tick builds fresh values from the previous generation.
//! The only in-place write is [`Cell::set_pressure`], used for pointer injection.

use super::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// Velocity and pressure held by one grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    x_velocity: f32,
    y_velocity: f32,
    pressure: f32,
}

impl Cell {
    /// The zero state every cell starts in
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a cell from its three components
    #[must_use]
    pub const fn new(x_velocity: f32, y_velocity: f32, pressure: f32) -> Self {
        Self {
            x_velocity,
            y_velocity,
            pressure,
        }
    }

    /// Horizontal velocity component
    #[inline]
    pub fn x_velocity(&self) -> f32 {
        self.x_velocity
    }

    /// Vertical velocity component (positive = down the screen)
    #[inline]
    pub fn y_velocity(&self) -> f32 {
        self.y_velocity
    }

    #[inline]
    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    /// Both velocity components as a vector
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.x_velocity, self.y_velocity)
    }

    /// Overwrite the pressure, leaving both velocity components untouched
    pub fn set_pressure(&mut self, pressure: f32) {
        self.pressure = pressure;
    }
}
