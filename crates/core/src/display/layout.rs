//! Pixel layout of the visual field

use crate::error::FluidError;
use serde::{Deserialize, Serialize};

/// Top-left corner of an element, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Geometry of the visual field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Horizontal offset of the field's left edge (pixels)
    pub field_left: i32,
    /// Vertical offset of the field's top edge (pixels)
    pub field_top: i32,
    /// Width of one element (pixels)
    pub square_width: i32,
    /// Height of one element (pixels)
    pub square_height: i32,
    /// Elements per row
    pub squares_x: usize,
    /// Elements per column
    pub squares_y: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            field_left: 20,
            field_top: 20,
            square_width: 10,
            square_height: 10,
            squares_x: 40,
            squares_y: 40,
        }
    }
}

impl DisplayConfig {
    /// Check the layout describes at least one visible element
    ///
    /// # Errors
    ///
    /// Returns `FluidError::InvalidConfig` for zero element counts or
    /// non-positive element sizes.
    pub fn validate(&self) -> Result<(), FluidError> {
        if self.squares_x == 0 || self.squares_y == 0 {
            return Err(FluidError::InvalidConfig(format!(
                "display needs at least one element, got {}x{}",
                self.squares_x, self.squares_y
            )));
        }
        if self.square_width <= 0 || self.square_height <= 0 {
            return Err(FluidError::InvalidConfig(format!(
                "element size must be positive, got {}x{}",
                self.square_width, self.square_height
            )));
        }
        Ok(())
    }

    /// Width of the whole field in pixels
    pub fn field_width(&self) -> i32 {
        self.squares_x as i32 * self.square_width
    }

    /// Height of the whole field in pixels
    pub fn field_height(&self) -> i32 {
        self.squares_y as i32 * self.square_height
    }

    /// Where element `(i, j)` sits before any displacement
    pub fn home_position(&self, i: usize, j: usize) -> Position {
        Position::new(
            self.field_left + i as i32 * self.square_width,
            self.field_top + j as i32 * self.square_height,
        )
    }

    /// Whether an element at `position` is still moved by the fluid
    ///
    /// Bounds are exclusive on every side, so the first row and column of the
    /// undisplaced layout never move.
    pub fn contains(&self, position: Position) -> bool {
        position.x > self.field_left
            && position.x < self.field_left + self.field_width()
            && position.y > self.field_top
            && position.y < self.field_top + self.field_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_positions() {
        let config = DisplayConfig::default();
        assert_eq!(config.home_position(0, 0), Position::new(20, 20));
        assert_eq!(config.home_position(3, 5), Position::new(50, 70));
        assert_eq!(config.field_width(), 400);
    }

    #[test]
    fn test_contains_is_exclusive() {
        let config = DisplayConfig::default();
        assert!(!config.contains(Position::new(20, 50)));
        assert!(config.contains(Position::new(21, 21)));
        assert!(config.contains(Position::new(419, 419)));
        assert!(!config.contains(Position::new(420, 50)));
        assert!(!config.contains(Position::new(50, 420)));
    }

    #[test]
    fn test_validate() {
        assert!(DisplayConfig::default().validate().is_ok());
        let empty = DisplayConfig {
            squares_x: 0,
            ..DisplayConfig::default()
        };
        assert!(empty.validate().is_err());
        let flat = DisplayConfig {
            square_height: 0,
            ..DisplayConfig::default()
        };
        assert!(flat.validate().is_err());
    }
}
