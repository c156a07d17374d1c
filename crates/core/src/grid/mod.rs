//! Grid-based simulation modules

pub mod fluid_grid;

// Re-export main types
pub use fluid_grid::*;
