//! Display layer: visual elements displaced by the fluid grid
//!
//! A rectangular block of fixed-size elements ("squares") is laid out in pixel
//! space. Hovering an element injects pressure into the grid cell it maps to;
//! once per tick every element still inside the visible field is shifted by the
//! rounded velocity of its grid cell. Elements that leave the field stay where
//! they are.
//!
//! The visual block and the grid may have different resolutions; element
//! `(i, j)` samples grid cell `(round(i * grid_width / squares_x),
//! round(j * grid_height / squares_y))`.

mod layout;
mod visual_grid;

pub use layout::{DisplayConfig, Position};
pub use visual_grid::VisualGrid;

use crate::driver::TickDriver;
use crate::error::FluidError;
use crate::grid::FluidGrid;

/// Anything a hover can push pressure into
pub trait PressureInjector {
    /// Raise grid cell `(x, y)` to the injection pressure
    ///
    /// # Errors
    ///
    /// Returns `FluidError` when the cell is out of range or the grid is
    /// unavailable.
    fn inject_pressure(&mut self, x: usize, y: usize) -> Result<(), FluidError>;
}

impl PressureInjector for FluidGrid {
    fn inject_pressure(&mut self, x: usize, y: usize) -> Result<(), FluidError> {
        FluidGrid::inject_pressure(self, x, y)
    }
}

impl PressureInjector for TickDriver {
    fn inject_pressure(&mut self, x: usize, y: usize) -> Result<(), FluidError> {
        TickDriver::inject_pressure(self, x, y)
    }
}
