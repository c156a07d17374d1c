//! Core types and utilities

pub mod cell;
pub mod vec2;

pub use cell::Cell;
pub use vec2::Vec2;
