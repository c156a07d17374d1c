use fountain_core::{FluidGrid, TickOutcome};
use tracing::trace;

use crate::error::{DefaultFountainError, FountainErrorCode};
use crate::helpers::{instance_from_ptr, track_error, track_result, track_status};
use crate::instance::FountainInstance;

/// Set the pressure of cell `(x, y)` to the instance's injection pressure.
///
/// Overwrites rather than adds; velocities are left alone. The burst is
/// picked up by the next `fountain_step`. Waits for the grid lock.
///
/// Returns
/// - `FountainErrorCode::Ok` on success
/// - `FountainErrorCode::NullPointer` if `ptr` is null
/// - `FountainErrorCode::OutOfBounds` if `(x, y)` is outside the grid
/// - `FountainErrorCode::LockPoisoned` if the grid lock is poisoned
///
/// # Safety
///
/// `ptr` must be a valid pointer returned by `fountain_new` or null.
#[no_mangle]
pub unsafe extern "C" fn fountain_inject_pressure(
    ptr: *const FountainInstance,
    x: usize,
    y: usize,
) -> FountainErrorCode {
    let instance = match unsafe { instance_from_ptr(ptr) } {
        Ok(instance) => instance,
        Err(error) => return track_error(&error),
    };

    track_status(instance.driver.inject_pressure(x, y))
}

/// Advance the grid by one tick.
///
/// Never waits: if another thread holds the grid the tick is dropped and
/// `TickSkipped` is returned. Dropped ticks are not replayed.
///
/// Returns
/// - `FountainErrorCode::Ok` if the grid advanced one generation
/// - `FountainErrorCode::TickSkipped` if the grid was busy
/// - `FountainErrorCode::NullPointer` if `ptr` is null
/// - `FountainErrorCode::LockPoisoned` if the grid lock is poisoned
///
/// # Safety
///
/// `ptr` must be a valid pointer returned by `fountain_new` or null.
#[no_mangle]
pub unsafe extern "C" fn fountain_step(ptr: *const FountainInstance) -> FountainErrorCode {
    let instance = match unsafe { instance_from_ptr(ptr) } {
        Ok(instance) => instance,
        Err(error) => return track_error(&error),
    };

    match track_result(instance.driver.try_tick()) {
        Ok(TickOutcome::Stepped { generation }) => {
            trace!("FFI step reached generation {}", generation);
            FountainErrorCode::Ok
        }
        Ok(TickOutcome::Skipped) => track_error(&DefaultFountainError::tick_skipped()),
        Err(code) => code,
    }
}

/// Zero every cell and restart the generation counter.
///
/// # Safety
///
/// `ptr` must be a valid pointer returned by `fountain_new` or null.
#[no_mangle]
pub unsafe extern "C" fn fountain_reset(ptr: *const FountainInstance) -> FountainErrorCode {
    let instance = match unsafe { instance_from_ptr(ptr) } {
        Ok(instance) => instance,
        Err(error) => return track_error(&error),
    };

    track_status(instance.driver.with_grid_mut(FluidGrid::reset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::fountain_get_last_error_code;
    use crate::instance::{fountain_destroy, fountain_new};
    use std::ptr;
    use std::sync::mpsc;
    use std::thread;

    fn new_instance(width: usize, height: usize) -> *mut FountainInstance {
        let mut instance = ptr::null_mut();
        let code = unsafe { fountain_new(width, height, 500.0, &mut instance) };
        assert_eq!(code, FountainErrorCode::Ok);
        instance
    }

    #[test]
    fn test_inject_out_of_bounds() {
        let instance = new_instance(5, 5);
        let code = unsafe { fountain_inject_pressure(instance, 5, 0) };
        assert_eq!(code, FountainErrorCode::OutOfBounds);
        assert_eq!(fountain_get_last_error_code(), FountainErrorCode::OutOfBounds);

        // A later success clears the recorded error
        let code = unsafe { fountain_inject_pressure(instance, 2, 2) };
        assert_eq!(code, FountainErrorCode::Ok);
        assert_eq!(fountain_get_last_error_code(), FountainErrorCode::Ok);
        unsafe { fountain_destroy(instance) };
    }

    #[test]
    fn test_null_instance() {
        assert_eq!(
            unsafe { fountain_inject_pressure(ptr::null(), 1, 1) },
            FountainErrorCode::NullPointer
        );
        assert_eq!(
            unsafe { fountain_step(ptr::null()) },
            FountainErrorCode::NullPointer
        );
        assert_eq!(
            unsafe { fountain_reset(ptr::null()) },
            FountainErrorCode::NullPointer
        );
    }

    #[test]
    fn test_step_skips_while_grid_is_held() {
        let instance = new_instance(5, 5);
        let driver = unsafe { &*instance }.driver.clone();
        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let holder = thread::spawn(move || {
            driver
                .with_grid(|_| {
                    locked_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                })
                .unwrap();
        });

        locked_rx.recv().unwrap();
        assert_eq!(
            unsafe { fountain_step(instance) },
            FountainErrorCode::TickSkipped
        );
        release_tx.send(()).unwrap();
        holder.join().unwrap();

        assert_eq!(unsafe { fountain_step(instance) }, FountainErrorCode::Ok);
        unsafe { fountain_destroy(instance) };
    }

    #[test]
    fn test_reset_restarts_generation() {
        let instance = new_instance(5, 5);
        unsafe {
            fountain_inject_pressure(instance, 2, 2);
            fountain_step(instance);
            assert_eq!(fountain_reset(instance), FountainErrorCode::Ok);
        }
        let driver = &unsafe { &*instance }.driver;
        assert_eq!(driver.with_grid(FluidGrid::generation).unwrap(), 0);
        unsafe { fountain_destroy(instance) };
    }
}
