//! Vector type alias for 2D velocities.

use nalgebra::Vector2;

/// 2D vector type for cell velocities and pixel offsets.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`, used wherever a
/// velocity sample leaves the grid (display layer, FFI queries).
pub type Vec2 = Vector2<f32>;
