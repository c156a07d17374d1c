//! Pressure Fountain Core Library
//!
//! A toy fluid model that drives a field of visual elements. Hovering an element
//! injects a burst of pressure into an underlying grid; every tick a fixed 3x3
//! stencil turns pressure gradients into velocity and velocity divergence back
//! into pressure, and the elements are pushed around by the resulting velocity
//! field, producing a fountain-like splash.
//!
//! ## Layers
//!
//! - [`Cell`] / [`FluidGrid`]: the double-buffered field and its stencil step
//! - [`TickDriver`]: one lock around the grid, fixed-cadence ticks that are
//!   dropped rather than queued when the grid is busy
//! - [`VisualGrid`]: pixel layout, hover mapping and per-tick displacement
//!
//! This is not a CFD solver: no stability guarantees, no clamping, and the
//! coefficients are chosen for the look of the effect.

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod display;
pub mod driver;
pub mod error;
pub mod grid;
pub mod solver;

// Re-export core types
pub use core_types::{Cell, Vec2};

pub use config::{FluidConfig, DEFAULT_INJECTION_PRESSURE, DEFAULT_TICK_INTERVAL};
pub use display::{DisplayConfig, Position, PressureInjector, VisualGrid};
pub use driver::{TickDriver, TickDue, TickOutcome, TickSchedule, TickStats, Ticker};
pub use error::FluidError;
pub use grid::{FluidGrid, MIN_GRID_DIMENSION};
