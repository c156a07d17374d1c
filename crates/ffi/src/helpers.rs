use crate::error::{with_last_error_mut, DefaultFountainError, FountainError, FountainErrorCode};
use crate::instance::FountainInstance;
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
/// Accepts any type implementing `FountainError` trait.
pub(crate) fn set_last_error(error: &impl FountainError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
/// More efficient than handling results for immediate errors.
#[inline]
pub(crate) fn track_error(error: &impl FountainError) -> FountainErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Internal helper called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FountainErrorCode::Ok;
    });
}

/// Record the outcome of a fallible operation.
///
/// On success the last error is cleared and the value passed through; on
/// failure the error is recorded and its code returned.
pub(crate) fn track_result<T, E>(result: Result<T, E>) -> Result<T, FountainErrorCode>
where
    E: Into<DefaultFountainError>,
{
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error.into())),
    }
}

/// Collapse a unit result into the code returned across the boundary.
pub(crate) fn track_status<E>(result: Result<(), E>) -> FountainErrorCode
where
    E: Into<DefaultFountainError>,
{
    match track_result(result) {
        Ok(()) => FountainErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow the instance behind a raw pointer.
///
/// # Safety
///
/// `ptr` must be null or a pointer returned by `fountain_new` that has not
/// been passed to `fountain_destroy`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const FountainInstance,
) -> Result<&'a FountainInstance, DefaultFountainError> {
    // SAFETY: caller guarantees the pointer is null or a live instance.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFountainError::null_pointer("ptr"))
}
