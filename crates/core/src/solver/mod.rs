//! Fluid solver module
//!
//! The stencil is a pure function of the previous generation, so the solver
//! holds no state of its own: [`crate::FluidGrid`] owns both buffers and calls
//! [`step_stencil_cpu`] once per tick.

mod stencil;

pub use stencil::{next_cell, step_stencil_cpu, DIAGONAL_WEIGHT, STENCIL_SCALE};
