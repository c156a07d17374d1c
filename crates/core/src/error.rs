//! Error type for grid construction and access
//!
//! Every failure here is a caller contract violation: out-of-range coordinates,
//! a grid too small for the stencil, or a lock poisoned by a panicking holder.
//! None of them are expected at runtime given correct coordinate mapping.

use std::fmt;

/// Errors returned by the fluid grid, the tick driver and the display layer
#[derive(Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Grid dimensions below the 3×3 minimum required by the stencil border
    InvalidDimensions { width: usize, height: usize },
    /// Coordinates outside `0..width` × `0..height`
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// A configuration value that can never produce a usable simulation
    InvalidConfig(String),
    /// The grid mutex was poisoned by a panic in another thread
    LockPoisoned,
}

impl fmt::Display for FluidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => write!(
                f,
                "grid must be at least {min}x{min}, got {width}x{height}",
                min = crate::grid::MIN_GRID_DIMENSION
            ),
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "cell ({x}, {y}) is outside the {width}x{height} grid"),
            Self::InvalidConfig(message) => write!(f, "invalid configuration: {message}"),
            Self::LockPoisoned => write!(f, "grid lock was poisoned by a panic in another thread"),
        }
    }
}

impl std::error::Error for FluidError {}
