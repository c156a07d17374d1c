//! Visual element state and per-tick displacement

use super::layout::{DisplayConfig, Position};
use super::PressureInjector;
use crate::error::FluidError;
use crate::grid::{FluidGrid, MIN_GRID_DIMENSION};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Elements of the visual field and their current pixel positions
#[derive(Debug, Clone)]
pub struct VisualGrid {
    config: DisplayConfig,
    grid_width: usize,
    grid_height: usize,
    /// Current positions, row-major (`j * squares_x + i`)
    positions: Vec<Position>,
    /// Element indices bucketed by the square-sized tile holding their corner
    tiles: FxHashMap<(i32, i32), Vec<usize>>,
}

impl VisualGrid {
    /// Lay out every element at its home position
    ///
    /// # Errors
    ///
    /// Returns `FluidError::InvalidConfig` for an invalid layout and
    /// `FluidError::InvalidDimensions` if the grid size could never be built.
    pub fn new(
        config: DisplayConfig,
        grid_width: usize,
        grid_height: usize,
    ) -> Result<Self, FluidError> {
        config.validate()?;
        if grid_width < MIN_GRID_DIMENSION || grid_height < MIN_GRID_DIMENSION {
            return Err(FluidError::InvalidDimensions {
                width: grid_width,
                height: grid_height,
            });
        }

        let mut visual = Self {
            config,
            grid_width,
            grid_height,
            positions: Vec::with_capacity(config.squares_x * config.squares_y),
            tiles: FxHashMap::default(),
        };
        visual.reset();
        Ok(visual)
    }

    /// Layout sized for an existing grid
    ///
    /// # Errors
    ///
    /// Returns `FluidError::InvalidConfig` for an invalid layout.
    pub fn for_grid(config: DisplayConfig, grid: &FluidGrid) -> Result<Self, FluidError> {
        Self::new(config, grid.width(), grid.height())
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Move every element back to its home position
    pub fn reset(&mut self) {
        self.positions.clear();
        for j in 0..self.config.squares_y {
            for i in 0..self.config.squares_x {
                self.positions.push(self.config.home_position(i, j));
            }
        }
        self.rebuild_tiles();
    }

    fn element_index(&self, i: usize, j: usize) -> Result<usize, FluidError> {
        if i < self.config.squares_x && j < self.config.squares_y {
            Ok(j * self.config.squares_x + i)
        } else {
            Err(FluidError::OutOfBounds {
                x: i,
                y: j,
                width: self.config.squares_x,
                height: self.config.squares_y,
            })
        }
    }

    /// Current position of element `(i, j)`
    ///
    /// # Errors
    ///
    /// Returns `FluidError::OutOfBounds` for an element outside the layout.
    pub fn position(&self, i: usize, j: usize) -> Result<Position, FluidError> {
        Ok(self.positions[self.element_index(i, j)?])
    }

    /// Every element as `(i, j, position)` in row-major order
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize, Position)> + '_ {
        let squares_x = self.config.squares_x;
        self.positions
            .iter()
            .enumerate()
            .map(move |(idx, &pos)| (idx % squares_x, idx / squares_x, pos))
    }

    /// Grid cell sampled by element `(i, j)`
    ///
    /// Scales each axis by `grid / squares` and rounds to nearest. Rounding can
    /// land one past the last cell on the far edge when the grid is coarser
    /// than the layout, so the result is limited to the last index.
    pub fn to_grid_coords(&self, i: usize, j: usize) -> (usize, usize) {
        let scale = |index: usize, cells: usize, squares: usize| -> usize {
            let scaled = (index as f32 * cells as f32 / squares as f32).round() as usize;
            scaled.min(cells - 1)
        };

        (
            scale(i, self.grid_width, self.config.squares_x),
            scale(j, self.grid_height, self.config.squares_y),
        )
    }

    /// Pointer entered element `(i, j)`: inject pressure at its grid cell
    ///
    /// Returns the grid cell that received the pressure.
    ///
    /// # Errors
    ///
    /// Returns `FluidError::OutOfBounds` for an element outside the layout, or
    /// whatever the injector reports.
    pub fn hover<T>(&self, i: usize, j: usize, target: &mut T) -> Result<(usize, usize), FluidError>
    where
        T: PressureInjector + ?Sized,
    {
        self.element_index(i, j)?;
        let (x, y) = self.to_grid_coords(i, j);
        target.inject_pressure(x, y)?;
        debug!("Hover on element ({}, {}) -> grid cell ({}, {})", i, j, x, y);
        Ok((x, y))
    }

    /// Shift every element inside the field by its grid cell's velocity
    ///
    /// Call once per tick, after the step. Velocities are rounded to whole
    /// pixels; elements already outside the field are left untouched. Returns
    /// the number of elements that moved.
    ///
    /// # Errors
    ///
    /// Returns `FluidError::OutOfBounds` if `grid` is smaller than the grid this
    /// layout was built for.
    pub fn apply_velocities(&mut self, grid: &FluidGrid) -> Result<usize, FluidError> {
        let mut moved = 0;

        for idx in 0..self.positions.len() {
            let position = self.positions[idx];
            if !self.config.contains(position) {
                continue;
            }

            let (i, j) = (idx % self.config.squares_x, idx / self.config.squares_x);
            let (x, y) = self.to_grid_coords(i, j);
            let velocity = grid.read_velocity(x, y)?;

            let dx = velocity.x.round() as i32;
            let dy = velocity.y.round() as i32;
            if dx != 0 || dy != 0 {
                self.positions[idx] = Position::new(
                    position.x.saturating_add(dx),
                    position.y.saturating_add(dy),
                );
                moved += 1;
            }
        }

        if moved > 0 {
            self.rebuild_tiles();
        }
        Ok(moved)
    }

    fn tile_of(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x.div_euclid(self.config.square_width),
            y.div_euclid(self.config.square_height),
        )
    }

    fn rebuild_tiles(&mut self) {
        self.tiles.clear();
        for (idx, pos) in self.positions.iter().enumerate() {
            let tile = (
                pos.x.div_euclid(self.config.square_width),
                pos.y.div_euclid(self.config.square_height),
            );
            self.tiles.entry(tile).or_default().push(idx);
        }
    }

    /// Element whose footprint covers pixel `(px, py)`
    ///
    /// Each element covers `square_width × square_height` pixels from its
    /// top-left corner. Where elements overlap, the one laid out last wins,
    /// matching paint order.
    pub fn element_at(&self, px: i32, py: i32) -> Option<(usize, usize)> {
        let (tx, ty) = self.tile_of(px, py);
        let (w, h) = (self.config.square_width, self.config.square_height);

        [(tx, ty), (tx - 1, ty), (tx, ty - 1), (tx - 1, ty - 1)]
            .iter()
            .filter_map(|tile| self.tiles.get(tile))
            .flatten()
            .copied()
            .filter(|&idx| {
                let pos = self.positions[idx];
                px >= pos.x
                    && px < pos.x.saturating_add(w)
                    && py >= pos.y
                    && py < pos.y.saturating_add(h)
            })
            .max()
            .map(|idx| (idx % self.config.squares_x, idx / self.config.squares_x))
    }
}
