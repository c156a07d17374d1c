use fountain_core::FluidGrid;

use crate::error::{DefaultFountainError, FountainErrorCode};
use crate::helpers::{clear_last_error, instance_from_ptr, track_error, track_result};
use crate::instance::FountainInstance;

/// Read the velocity of cell `(x, y)`.
///
/// Waits for the grid lock, so the values always come from one whole
/// generation.
///
/// Returns
/// - `FountainErrorCode::Ok` on success with the components in `out_x` / `out_y`
/// - `FountainErrorCode::NullPointer` if `ptr`, `out_x` or `out_y` is null
/// - `FountainErrorCode::OutOfBounds` if `(x, y)` is outside the grid
/// - `FountainErrorCode::LockPoisoned` if the grid lock is poisoned
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fountain_new` or null.
/// - `out_x` and `out_y` must be valid, non-null pointers to writable `f32`s.
#[no_mangle]
pub unsafe extern "C" fn fountain_read_velocity(
    ptr: *const FountainInstance,
    x: usize,
    y: usize,
    out_x: *mut f32,
    out_y: *mut f32,
) -> FountainErrorCode {
    if out_x.is_null() {
        return track_error(&DefaultFountainError::null_pointer("out_x"));
    }
    if out_y.is_null() {
        return track_error(&DefaultFountainError::null_pointer("out_y"));
    }

    let instance = match unsafe { instance_from_ptr(ptr) } {
        Ok(instance) => instance,
        Err(error) => return track_error(&error),
    };

    match track_result(instance.driver.read_velocity(x, y)) {
        Ok(velocity) => {
            unsafe {
                *out_x = velocity.x;
                *out_y = velocity.y;
            }
            FountainErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Number of completed ticks since creation or the last reset.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fountain_new` or null.
/// - `out_generation` must be a valid, non-null pointer to a writable `u64`.
#[no_mangle]
pub unsafe extern "C" fn fountain_generation(
    ptr: *const FountainInstance,
    out_generation: *mut u64,
) -> FountainErrorCode {
    if out_generation.is_null() {
        return track_error(&DefaultFountainError::null_pointer("out_generation"));
    }

    let instance = match unsafe { instance_from_ptr(ptr) } {
        Ok(instance) => instance,
        Err(error) => return track_error(&error),
    };

    match track_result(instance.driver.with_grid(FluidGrid::generation)) {
        Ok(generation) => {
            unsafe {
                *out_generation = generation;
            }
            FountainErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Tick counters: ticks that advanced the grid and ticks that were dropped.
///
/// Counters survive `fountain_reset`.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `fountain_new` or null.
/// - `out_stepped` and `out_skipped` must be valid, non-null pointers to writable `u64`s.
#[no_mangle]
pub unsafe extern "C" fn fountain_tick_stats(
    ptr: *const FountainInstance,
    out_stepped: *mut u64,
    out_skipped: *mut u64,
) -> FountainErrorCode {
    if out_stepped.is_null() {
        return track_error(&DefaultFountainError::null_pointer("out_stepped"));
    }
    if out_skipped.is_null() {
        return track_error(&DefaultFountainError::null_pointer("out_skipped"));
    }

    let instance = match unsafe { instance_from_ptr(ptr) } {
        Ok(instance) => instance,
        Err(error) => return track_error(&error),
    };

    let stats = instance.driver.stats();
    unsafe {
        *out_stepped = stats.stepped;
        *out_skipped = stats.skipped;
    }
    clear_last_error();
    FountainErrorCode::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{fountain_get_last_error, fountain_get_last_error_code};
    use crate::instance::{fountain_destroy, fountain_new};
    use crate::simulation::{fountain_inject_pressure, fountain_step};
    use std::ptr;

    #[test]
    fn test_step_round_trip() {
        let mut instance = ptr::null_mut();
        unsafe {
            assert_eq!(
                fountain_new(5, 5, 500.0, &mut instance),
                FountainErrorCode::Ok
            );
            assert_eq!(fountain_inject_pressure(instance, 2, 2), FountainErrorCode::Ok);
            assert_eq!(fountain_step(instance), FountainErrorCode::Ok);
        }

        let (mut vx, mut vy) = (0.0_f32, 0.0_f32);
        let code = unsafe { fountain_read_velocity(instance, 1, 2, &mut vx, &mut vy) };
        assert_eq!(code, FountainErrorCode::Ok);
        assert_eq!(vx, -125.0);
        assert_eq!(vy, 0.0);

        let mut generation = 0;
        assert_eq!(
            unsafe { fountain_generation(instance, &mut generation) },
            FountainErrorCode::Ok
        );
        assert_eq!(generation, 1);

        let (mut stepped, mut skipped) = (0, 0);
        assert_eq!(
            unsafe { fountain_tick_stats(instance, &mut stepped, &mut skipped) },
            FountainErrorCode::Ok
        );
        assert_eq!((stepped, skipped), (1, 0));

        unsafe { fountain_destroy(instance) };
    }

    #[test]
    fn test_read_velocity_checks_arguments() {
        let mut instance = ptr::null_mut();
        unsafe { fountain_new(4, 4, 500.0, &mut instance) };

        let mut vx = 0.0_f32;
        let code = unsafe { fountain_read_velocity(instance, 0, 0, &mut vx, ptr::null_mut()) };
        assert_eq!(code, FountainErrorCode::NullPointer);

        let mut vy = 0.0_f32;
        let code = unsafe { fountain_read_velocity(instance, 4, 0, &mut vx, &mut vy) };
        assert_eq!(code, FountainErrorCode::OutOfBounds);

        let code = unsafe { fountain_read_velocity(ptr::null(), 0, 0, &mut vx, &mut vy) };
        assert_eq!(code, FountainErrorCode::NullPointer);

        unsafe { fountain_destroy(instance) };
    }

    #[test]
    fn test_tick_stats_clears_last_error() {
        let mut instance = ptr::null_mut();
        unsafe { fountain_new(5, 5, 500.0, &mut instance) };

        assert_eq!(
            unsafe { fountain_inject_pressure(instance, 9, 9) },
            FountainErrorCode::OutOfBounds
        );
        assert_eq!(fountain_get_last_error_code(), FountainErrorCode::OutOfBounds);

        let (mut stepped, mut skipped) = (0, 0);
        assert_eq!(
            unsafe { fountain_tick_stats(instance, &mut stepped, &mut skipped) },
            FountainErrorCode::Ok
        );
        assert_eq!(fountain_get_last_error_code(), FountainErrorCode::Ok);
        assert!(fountain_get_last_error().is_null());

        unsafe { fountain_destroy(instance) };
    }

    #[test]
    fn test_last_error_message_follows_calls() {
        let mut instance = ptr::null_mut();
        unsafe { fountain_new(5, 5, 500.0, &mut instance) };

        let (mut vx, mut vy) = (0.0_f32, 0.0_f32);
        let code = unsafe { fountain_read_velocity(instance, 7, 0, &mut vx, &mut vy) };
        assert_eq!(code, FountainErrorCode::OutOfBounds);
        let message = fountain_get_last_error();
        assert!(!message.is_null());
        let message = unsafe { std::ffi::CStr::from_ptr(message) };
        assert_eq!(message.to_str().unwrap(), "cell (7, 0) is outside the 5x5 grid");

        let mut generation = 0;
        assert_eq!(
            unsafe { fountain_generation(instance, &mut generation) },
            FountainErrorCode::Ok
        );
        assert!(fountain_get_last_error().is_null());
        assert_eq!(fountain_get_last_error_code(), FountainErrorCode::Ok);

        unsafe { fountain_destroy(instance) };
    }
}
