//! 2D fluid grid with double-buffered generations
//!
//! The grid owns two equally sized cell buffers: the current generation, which
//! every reader sees, and a scratch buffer the stencil writes into. A step fills
//! the scratch buffer from the current generation and then swaps the two, so a
//! reader holding `&FluidGrid` can only ever observe one complete generation.

use crate::config::{FluidConfig, DEFAULT_INJECTION_PRESSURE};
use crate::core_types::{Cell, Vec2};
use crate::error::FluidError;
use crate::solver::step_stencil_cpu;
use tracing::{debug, info, trace};

/// Smallest width/height that leaves at least one interior cell
pub const MIN_GRID_DIMENSION: usize = 3;

/// Pressure/velocity field advanced in discrete ticks
#[derive(Debug, Clone)]
pub struct FluidGrid {
    /// Current generation in row-major order (y * width + x)
    cells: Vec<Cell>,
    /// Next generation under construction; contents are meaningless between steps
    scratch: Vec<Cell>,
    width: usize,
    height: usize,
    /// Number of completed steps
    generation: u64,
    injection_pressure: f32,
}

impl FluidGrid {
    /// Create a zero-initialized grid with the default injection pressure
    ///
    /// # Errors
    ///
    /// Returns `FluidError::InvalidDimensions` if `width` or `height` is below
    /// [`MIN_GRID_DIMENSION`].
    pub fn new(width: usize, height: usize) -> Result<Self, FluidError> {
        Self::from_config(&FluidConfig {
            width,
            height,
            injection_pressure: DEFAULT_INJECTION_PRESSURE,
        })
    }

    /// Create a zero-initialized grid from a validated config
    ///
    /// # Errors
    ///
    /// Returns whatever [`FluidConfig::validate`] rejects. No grid is allocated
    /// unless validation passes.
    pub fn from_config(config: &FluidConfig) -> Result<Self, FluidError> {
        config.validate()?;

        let num_cells = config.width * config.height;
        info!(
            "Fluid grid initialized: {}x{} cells, injection pressure {}",
            config.width, config.height, config.injection_pressure
        );

        Ok(Self {
            cells: vec![Cell::ZERO; num_cells],
            scratch: vec![Cell::ZERO; num_cells],
            width: config.width,
            height: config.height,
            generation: 0,
            injection_pressure: config.injection_pressure,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of steps completed since construction or the last reset
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pressure written by [`FluidGrid::inject_pressure`]
    pub fn injection_pressure(&self) -> f32 {
        self.injection_pressure
    }

    /// Current generation in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Whether `(x, y)` lies on the static boundary
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, FluidError> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(FluidError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Cell `(x, y)` of the current generation
    ///
    /// # Errors
    ///
    /// Returns `FluidError::OutOfBounds` for coordinates outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Result<Cell, FluidError> {
        Ok(self.cells[self.index(x, y)?])
    }

    /// Velocity of cell `(x, y)`, as sampled by the display once per tick
    ///
    /// # Errors
    ///
    /// Returns `FluidError::OutOfBounds` for coordinates outside the grid.
    pub fn read_velocity(&self, x: usize, y: usize) -> Result<Vec2, FluidError> {
        Ok(self.cell(x, y)?.velocity())
    }

    /// Raise cell `(x, y)` to the configured injection pressure
    ///
    /// Only that cell's pressure changes; the disturbance spreads from the next
    /// [`FluidGrid::step`] onward. Border cells are accepted: the stencil never
    /// writes them, so the value persists and feeds adjacent interior cells.
    ///
    /// # Errors
    ///
    /// Returns `FluidError::OutOfBounds` for coordinates outside the grid. The
    /// grid never clamps.
    pub fn inject_pressure(&mut self, x: usize, y: usize) -> Result<(), FluidError> {
        self.set_pressure(x, y, self.injection_pressure)
    }

    /// Set the pressure of cell `(x, y)` to `amount`
    ///
    /// # Errors
    ///
    /// Returns `FluidError::OutOfBounds` for coordinates outside the grid.
    pub fn set_pressure(&mut self, x: usize, y: usize, amount: f32) -> Result<(), FluidError> {
        let idx = self.index(x, y)?;
        self.cells[idx].set_pressure(amount);
        debug!("Pressure at ({}, {}) set to {}", x, y, amount);
        Ok(())
    }

    /// Advance the simulation by one tick
    ///
    /// Deterministic and total: every interior cell is rebuilt from the previous
    /// generation, border cells are carried over, and the two buffers are
    /// swapped once the pass is complete.
    pub fn step(&mut self) {
        step_stencil_cpu(&self.cells, &mut self.scratch, self.width, self.height);
        std::mem::swap(&mut self.cells, &mut self.scratch);
        self.generation += 1;

        trace!("Fluid grid advanced to generation {}", self.generation);
    }

    /// Return every cell to the zero state and the generation counter to 0
    pub fn reset(&mut self) {
        self.cells.fill(Cell::ZERO);
        self.scratch.fill(Cell::ZERO);
        self.generation = 0;
        debug!("Fluid grid reset");
    }
}
