use fountain_core::FluidError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait FountainError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> FountainErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `FountainError` for FFI failures.
///
/// Wraps a `FountainErrorCode` together with a message; core errors convert
/// into it through `From<FluidError>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFountainError {
    code: FountainErrorCode,
    msg: String,
}

impl DefaultFountainError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FountainErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a tick dropped because the grid was busy.
    pub fn tick_skipped() -> Self {
        Self {
            code: FountainErrorCode::TickSkipped,
            msg: "Grid busy, tick dropped".to_string(),
        }
    }
}

impl From<FluidError> for DefaultFountainError {
    fn from(error: FluidError) -> Self {
        let code = match error {
            FluidError::InvalidDimensions { .. } => FountainErrorCode::InvalidDimensions,
            FluidError::OutOfBounds { .. } => FountainErrorCode::OutOfBounds,
            FluidError::InvalidConfig(_) => FountainErrorCode::InvalidParameter,
            FluidError::LockPoisoned => FountainErrorCode::LockPoisoned,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl FountainError for DefaultFountainError {
    fn code(&self) -> FountainErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by fountain functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FountainErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: the grid lock was poisoned by a panic.
    LockPoisoned = 2,

    /// Grid dimensions below the 3x3 minimum.
    InvalidDimensions = 3,

    /// Invalid parameter passed to function (e.g. non-finite injection pressure).
    InvalidParameter = 4,

    /// Cell coordinates outside the grid.
    OutOfBounds = 5,

    /// The grid was busy and the tick was dropped. Not a failure; try again
    /// on the next scheduled tick.
    TickSkipped = 6,
}

impl From<DefaultFountainError> for FountainErrorCode {
    fn from(error: DefaultFountainError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The `CString` is stored to keep the pointer handed out by
    /// `fountain_get_last_error` valid.
    static LAST_ERROR: RefCell<(Option<CString>, FountainErrorCode)> =
        const { RefCell::new((None, FountainErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FountainErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FountainErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// FountainInstance* fountain = NULL;
/// if (fountain_new(2, 2, 500.0f, &fountain) != Ok) {
///     printf("fountain_new failed: %s\n", fountain_get_last_error());
/// }
/// ```
#[no_mangle]
pub extern "C" fn fountain_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
#[no_mangle]
pub extern "C" fn fountain_get_last_error_code() -> FountainErrorCode {
    with_last_error(|(_cstring, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fluid_errors_map_to_codes() {
        let err = DefaultFountainError::from(FluidError::InvalidDimensions {
            width: 2,
            height: 2,
        });
        assert_eq!(err.code(), FountainErrorCode::InvalidDimensions);
        assert_eq!(err.msg(), "grid must be at least 3x3, got 2x2");

        let err = DefaultFountainError::from(FluidError::OutOfBounds {
            x: 9,
            y: 0,
            width: 4,
            height: 4,
        });
        assert_eq!(FountainErrorCode::from(err), FountainErrorCode::OutOfBounds);

        let err = DefaultFountainError::from(FluidError::LockPoisoned);
        assert_eq!(err.code(), FountainErrorCode::LockPoisoned);
    }

    #[test]
    fn test_null_pointer_message() {
        let err = DefaultFountainError::null_pointer("out_x");
        assert_eq!(err.code(), FountainErrorCode::NullPointer);
        assert_eq!(err.msg(), "Parameter 'out_x' cannot be null");
    }
}
