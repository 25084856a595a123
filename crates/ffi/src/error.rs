//! FFI error reporting: error codes plus a thread-local last-error message.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use weather_core::CoreError;

/// FFI error codes returned by weather station functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Null pointer passed where non-null required.
    NullPointer = 1,

    /// A string argument was not valid UTF-8.
    InvalidUtf8 = 2,

    /// A JSON payload failed to parse.
    InvalidJson = 3,

    /// A required input was missing from the snapshot.
    InsufficientInput = 4,

    /// Relative humidity outside the valid range.
    InvalidHumidity = 5,

    /// A numeric input outside its physically valid range.
    InvalidRange = 6,

    /// Observation timestamp precedes the last accepted observation.
    OutOfOrderObservation = 7,

    /// Invalid parameter passed to a function.
    InvalidParameter = 8,
}

impl From<&CoreError> for WeatherErrorCode {
    fn from(error: &CoreError) -> Self {
        match error {
            CoreError::InsufficientInput { .. } => WeatherErrorCode::InsufficientInput,
            CoreError::InvalidHumidity { .. } => WeatherErrorCode::InvalidHumidity,
            CoreError::InvalidRange { .. } => WeatherErrorCode::InvalidRange,
            CoreError::OutOfOrderObservation { .. } => WeatherErrorCode::OutOfOrderObservation,
        }
    }
}

thread_local! {
    /// Most recent FFI error (C string, error code), stored per thread so the
    /// caller can retrieve diagnostics after an operation returns null.
    static LAST_ERROR: RefCell<(Option<CString>, WeatherErrorCode)> =
        const { RefCell::new((None, WeatherErrorCode::Ok)) };
}

/// Record an error for later retrieval by the caller.
pub(crate) fn set_last_error(code: WeatherErrorCode, message: &str) {
    let cstring = CString::new(message).ok();
    LAST_ERROR.with_borrow_mut(|slot| *slot = (cstring, code));
}

/// Clear the error slot; called at the start of every fallible operation.
pub(crate) fn clear_last_error() {
    LAST_ERROR.with_borrow_mut(|slot| *slot = (None, WeatherErrorCode::Ok));
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns null if no error has occurred. The pointer is valid until the next
/// FFI call on this thread; do not free it.
#[no_mangle]
pub extern "C" fn weather_get_last_error() -> *const c_char {
    LAST_ERROR.with_borrow(|(cstring, _)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code for this thread.
#[no_mangle]
pub extern "C" fn weather_get_last_error_code() -> WeatherErrorCode {
    LAST_ERROR.with_borrow(|(_, code)| *code)
}
