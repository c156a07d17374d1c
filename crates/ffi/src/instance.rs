use fountain_core::{FluidConfig, FluidGrid, TickDriver};
use std::ptr;
use tracing::info;

use crate::error::{DefaultFountainError, FountainErrorCode};
use crate::helpers::{track_error, track_result};

/// The fountain context handed to foreign callers.
///
/// # Thread Safety
/// `FountainInstance` can be shared across threads. The grid sits behind the
/// driver's single lock:
/// - `fountain_inject_pressure` and the queries wait for the lock
/// - `fountain_step` never waits; if the grid is busy the tick is dropped and
///   `TickSkipped` is returned
///
/// Readers therefore always observe a whole generation, never a half-stepped
/// grid.
///
/// # Usage
/// ```c
/// FountainInstance* fountain = NULL;
/// if (fountain_new(40, 40, 500.0f, &fountain) != Ok) {
///     return;
/// }
///
/// fountain_inject_pressure(fountain, 20, 20);
/// fountain_step(fountain);
///
/// float vx = 0.0f, vy = 0.0f;
/// fountain_read_velocity(fountain, 19, 20, &vx, &vy);
///
/// fountain_destroy(fountain);
/// ```
pub struct FountainInstance {
    pub(crate) driver: TickDriver,
}

impl FountainInstance {
    /// Creates a new fountain over a `width` x `height` grid.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if either dimension is below 3 and
    /// `InvalidParameter` if `injection_pressure` is not finite.
    pub(crate) fn new(
        width: usize,
        height: usize,
        injection_pressure: f32,
    ) -> Result<Box<Self>, DefaultFountainError> {
        let config = FluidConfig {
            width,
            height,
            injection_pressure,
        };
        let grid = FluidGrid::from_config(&config)?;
        info!("FFI instance created ({}x{})", width, height);

        Ok(Box::new(Self {
            driver: TickDriver::new(grid),
        }))
    }
}

/// Create a new fountain instance and return it via out-parameter.
///
/// This function follows standard C error handling conventions:
/// - Returns `FountainErrorCode::Ok` (0) on success with valid instance in `out_instance`
/// - Returns non-zero error code on failure with `out_instance` set to null
///
/// Parameters
/// - `width`, `height`: grid size in cells, border included. Both must be at least 3.
/// - `injection_pressure`: pressure written by `fountain_inject_pressure`. Must be finite.
/// - `out_instance`: Pointer to receive the created instance. Must be non-null.
///
/// Returns
/// - `FountainErrorCode::Ok` (0) - success, `out_instance` contains valid pointer
/// - `FountainErrorCode::NullPointer` - `out_instance` is null
/// - `FountainErrorCode::InvalidDimensions` - a dimension is below 3
/// - `FountainErrorCode::InvalidParameter` - `injection_pressure` is NaN or infinite
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller takes ownership of the returned instance and MUST call `fountain_destroy`
///   exactly once to avoid memory leaks.
#[no_mangle]
pub unsafe extern "C" fn fountain_new(
    width: usize,
    height: usize,
    injection_pressure: f32,
    out_instance: *mut *mut FountainInstance,
) -> FountainErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFountainError::null_pointer("out_instance"));
    }

    match track_result(FountainInstance::new(width, height, injection_pressure)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            FountainErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroys an instance previously created by `fountain_new`.
///
/// If `ptr` is null, this function is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `fountain_new`.
/// - The pointer MUST NOT have been freed already.
/// - After calling this function, the caller must not use the pointer again.
#[no_mangle]
pub unsafe extern "C" fn fountain_destroy(ptr: *mut FountainInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: the pointer came from `Box::into_raw` in `fountain_new` and is
    // reclaimed exactly once.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::fountain_get_last_error_code;

    #[test]
    fn test_new_and_destroy() {
        let mut instance = ptr::null_mut();
        let code = unsafe { fountain_new(5, 5, 500.0, &mut instance) };
        assert_eq!(code, FountainErrorCode::Ok);
        assert!(!instance.is_null());
        assert_eq!(fountain_get_last_error_code(), FountainErrorCode::Ok);
        unsafe { fountain_destroy(instance) };
    }

    #[test]
    fn test_new_rejects_small_grid() {
        let mut instance = ptr::null_mut();
        let code = unsafe { fountain_new(2, 9, 500.0, &mut instance) };
        assert_eq!(code, FountainErrorCode::InvalidDimensions);
        assert!(instance.is_null());
        assert_eq!(
            fountain_get_last_error_code(),
            FountainErrorCode::InvalidDimensions
        );
    }

    #[test]
    fn test_new_rejects_nan_pressure() {
        let mut instance = ptr::null_mut();
        let code = unsafe { fountain_new(5, 5, f32::NAN, &mut instance) };
        assert_eq!(code, FountainErrorCode::InvalidParameter);
        assert!(instance.is_null());
    }

    #[test]
    fn test_new_null_out_param() {
        let code = unsafe { fountain_new(5, 5, 500.0, ptr::null_mut()) };
        assert_eq!(code, FountainErrorCode::NullPointer);
    }

    #[test]
    fn test_destroy_null_is_noop() {
        unsafe { fountain_destroy(ptr::null_mut()) };
    }
}
