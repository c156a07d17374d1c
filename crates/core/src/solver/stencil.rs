//! Pressure/velocity stencil
//!
//! One tick of the simplified fluid model. Each interior cell looks at its 3x3
//! neighbourhood in the previous generation:
//!
//! ```text
//! u' = u + s·( w·P(i-1,j-1) + P(i-1,j) + w·P(i-1,j+1)
//!            - w·P(i+1,j-1) - P(i+1,j) - w·P(i+1,j+1) )
//! v' = v + s·( w·P(i-1,j-1) + P(i,j-1) + w·P(i+1,j-1)
//!            - w·P(i-1,j+1) - P(i,j+1) - w·P(i+1,j+1) )
//! P' = s·( XP + YP )
//! ```
//!
//! where `XP`/`YP` are the same weighted differences taken over `u`/`v`,
//! `w` = [`DIAGONAL_WEIGHT`] and `s` = [`STENCIL_SCALE`].
//!
//! The coefficients are fixed; they define the look of the fountain rather than
//! any physical quantity.

use crate::core_types::Cell;
use rayon::prelude::*;

/// Weight applied to the diagonal neighbours
pub const DIAGONAL_WEIGHT: f32 = 0.5;

/// Overall scale applied to every weighted difference
pub const STENCIL_SCALE: f32 = 0.25;

/// Weighted left-minus-right difference of one cell component
#[inline(always)]
fn horizontal_difference(
    cells: &[Cell],
    width: usize,
    x: usize,
    y: usize,
    component: impl Fn(&Cell) -> f32,
) -> f32 {
    let at = |cx: usize, cy: usize| component(&cells[cy * width + cx]);

    DIAGONAL_WEIGHT * at(x - 1, y - 1) + at(x - 1, y) + DIAGONAL_WEIGHT * at(x - 1, y + 1)
        - DIAGONAL_WEIGHT * at(x + 1, y - 1)
        - at(x + 1, y)
        - DIAGONAL_WEIGHT * at(x + 1, y + 1)
}

/// Weighted top-minus-bottom difference of one cell component
#[inline(always)]
fn vertical_difference(
    cells: &[Cell],
    width: usize,
    x: usize,
    y: usize,
    component: impl Fn(&Cell) -> f32,
) -> f32 {
    let at = |cx: usize, cy: usize| component(&cells[cy * width + cx]);

    DIAGONAL_WEIGHT * at(x - 1, y - 1) + at(x, y - 1) + DIAGONAL_WEIGHT * at(x + 1, y - 1)
        - DIAGONAL_WEIGHT * at(x - 1, y + 1)
        - at(x, y + 1)
        - DIAGONAL_WEIGHT * at(x + 1, y + 1)
}

/// Next-generation value of interior cell `(x, y)`
///
/// Reads only from `cells`, the previous generation in row-major order.
/// The caller guarantees `1 <= x < width - 1` and `1 <= y < height - 1`.
#[must_use]
pub fn next_cell(cells: &[Cell], width: usize, x: usize, y: usize) -> Cell {
    let old = cells[y * width + x];

    let x_velocity = old.x_velocity()
        + horizontal_difference(cells, width, x, y, Cell::pressure) * STENCIL_SCALE;
    let y_velocity = old.y_velocity()
        + vertical_difference(cells, width, x, y, Cell::pressure) * STENCIL_SCALE;

    let xp = horizontal_difference(cells, width, x, y, Cell::x_velocity);
    let yp = vertical_difference(cells, width, x, y, Cell::y_velocity);
    let pressure = (xp + yp) * STENCIL_SCALE;

    Cell::new(x_velocity, y_velocity, pressure)
}

/// Advance `cells_in` by one tick into `cells_out`
///
/// Border rows and columns are copied through unchanged; every interior cell is
/// rebuilt with [`next_cell`]. Rows are processed in parallel, which is safe
/// because `cells_in` is never written during the pass.
///
/// # Arguments
///
/// * `cells_in` - Previous generation (row-major, `y * width + x`)
/// * `cells_out` - Scratch buffer receiving the next generation
/// * `width` - Grid width in cells (>= 3)
/// * `height` - Grid height in cells (>= 3)
pub fn step_stencil_cpu(cells_in: &[Cell], cells_out: &mut [Cell], width: usize, height: usize) {
    debug_assert_eq!(cells_in.len(), width * height);
    debug_assert_eq!(cells_out.len(), width * height);

    cells_out
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let row_in = &cells_in[y * width..(y + 1) * width];

            // Top and bottom rows form part of the static boundary
            if y == 0 || y == height - 1 {
                row.copy_from_slice(row_in);
                return;
            }

            row[0] = row_in[0];
            row[width - 1] = row_in[width - 1];
            for x in 1..width - 1 {
                row[x] = next_cell(cells_in, width, x, y);
            }
        });
}
