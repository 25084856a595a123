//! C ABI for the weather inference core.
//!
//! The host automation platform talks to the core through an opaque station
//! handle and JSON payloads: a JSON configuration creates a station, each
//! JSON snapshot observation returns a JSON inference, and the forecast call
//! returns JSON daily/hourly arrays. Errors surface as codes plus a
//! thread-local last-error message.
//!
//! Strings returned by this library are owned by the caller and must be
//! released with [`weather_string_free`].

mod error;

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use error::{clear_last_error, set_last_error, WeatherErrorCode};
use weather_core::{forecast, observe, ForecastHorizon, SensorSnapshot, StationConfig, StationState};

pub use error::{weather_get_last_error, weather_get_last_error_code};

/// Opaque station handle owning the pipeline state.
pub struct WeatherStation {
    state: StationState,
}

/// Read a required C string argument, recording an error on failure.
///
/// # Safety
/// `ptr` must be null or a valid null-terminated C string.
unsafe fn read_c_str<'a>(ptr: *const c_char, name: &str) -> Option<&'a str> {
    if ptr.is_null() {
        set_last_error(
            WeatherErrorCode::NullPointer,
            &format!("Parameter '{name}' cannot be null"),
        );
        return None;
    }
    match unsafe { CStr::from_ptr(ptr) }.to_str() {
        Ok(s) => Some(s),
        Err(_) => {
            set_last_error(
                WeatherErrorCode::InvalidUtf8,
                &format!("Parameter '{name}' is not valid UTF-8"),
            );
            None
        }
    }
}

/// Hand a JSON payload to the caller as an owned C string.
fn into_c_string(json: String) -> *mut c_char {
    match CString::new(json) {
        Ok(cstring) => cstring.into_raw(),
        Err(_) => {
            set_last_error(
                WeatherErrorCode::InvalidParameter,
                "Payload contained an interior NUL byte",
            );
            ptr::null_mut()
        }
    }
}

/// Create a weather station from a JSON configuration.
///
/// An empty or `{}` configuration uses the defaults. Returns null on error;
/// inspect [`weather_get_last_error`].
///
/// # Safety
/// `config_json` must be null or a valid null-terminated C string. The
/// returned pointer must be released with [`weather_station_free`].
#[no_mangle]
pub unsafe extern "C" fn weather_station_new(config_json: *const c_char) -> *mut WeatherStation {
    clear_last_error();
    let config = if config_json.is_null() {
        StationConfig::default()
    } else {
        let Some(text) = (unsafe { read_c_str(config_json, "config_json") }) else {
            return ptr::null_mut();
        };
        if text.trim().is_empty() {
            StationConfig::default()
        } else {
            match serde_json::from_str(text) {
                Ok(config) => config,
                Err(e) => {
                    set_last_error(
                        WeatherErrorCode::InvalidJson,
                        &format!("Configuration did not parse: {e}"),
                    );
                    return ptr::null_mut();
                }
            }
        }
    };
    Box::into_raw(Box::new(WeatherStation {
        state: StationState::new(config),
    }))
}

/// Release a station handle created by [`weather_station_new`].
///
/// # Safety
/// `station` must be null or a pointer previously returned by
/// [`weather_station_new`] that has not been freed.
#[no_mangle]
pub unsafe extern "C" fn weather_station_free(station: *mut WeatherStation) {
    if !station.is_null() {
        drop(unsafe { Box::from_raw(station) });
    }
}

/// Process one JSON sensor snapshot and return the JSON inference.
///
/// On success the station's internal state advances to the post-observation
/// state. Returns null on error with the station state unchanged; inspect
/// [`weather_get_last_error`].
///
/// # Safety
/// `station` must be a valid handle; `snapshot_json` must be null or a valid
/// null-terminated C string. The returned string must be released with
/// [`weather_string_free`].
#[no_mangle]
pub unsafe extern "C" fn weather_station_observe_json(
    station: *mut WeatherStation,
    snapshot_json: *const c_char,
) -> *mut c_char {
    clear_last_error();
    if station.is_null() {
        set_last_error(
            WeatherErrorCode::NullPointer,
            "Parameter 'station' cannot be null",
        );
        return ptr::null_mut();
    }
    let Some(text) = (unsafe { read_c_str(snapshot_json, "snapshot_json") }) else {
        return ptr::null_mut();
    };
    let snapshot: SensorSnapshot = match serde_json::from_str(text) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            set_last_error(
                WeatherErrorCode::InvalidJson,
                &format!("Snapshot did not parse: {e}"),
            );
            return ptr::null_mut();
        }
    };

    let station = unsafe { &mut *station };
    match observe(&snapshot, &station.state) {
        Ok((inference, next_state)) => {
            station.state = next_state;
            match serde_json::to_string(&inference) {
                Ok(json) => into_c_string(json),
                Err(e) => {
                    set_last_error(
                        WeatherErrorCode::InvalidParameter,
                        &format!("Inference failed to serialize: {e}"),
                    );
                    ptr::null_mut()
                }
            }
        }
        Err(core_error) => {
            set_last_error(WeatherErrorCode::from(&core_error), &core_error.to_string());
            ptr::null_mut()
        }
    }
}

/// Produce the JSON forecast for a 24- or 120-hour horizon.
///
/// Returns null on error; inspect [`weather_get_last_error`].
///
/// # Safety
/// `station` must be a valid handle. The returned string must be released
/// with [`weather_string_free`].
#[no_mangle]
pub unsafe extern "C" fn weather_station_forecast_json(
    station: *const WeatherStation,
    horizon_hours: u32,
) -> *mut c_char {
    clear_last_error();
    if station.is_null() {
        set_last_error(
            WeatherErrorCode::NullPointer,
            "Parameter 'station' cannot be null",
        );
        return ptr::null_mut();
    }
    let horizon = match horizon_hours {
        24 => ForecastHorizon::Hours24,
        120 => ForecastHorizon::Hours120,
        other => {
            set_last_error(
                WeatherErrorCode::InvalidParameter,
                &format!("Horizon must be 24 or 120 hours, got {other}"),
            );
            return ptr::null_mut();
        }
    };
    let station = unsafe { &*station };
    match forecast(&station.state, horizon) {
        Ok(result) => match serde_json::to_string(&result) {
            Ok(json) => into_c_string(json),
            Err(e) => {
                set_last_error(
                    WeatherErrorCode::InvalidParameter,
                    &format!("Forecast failed to serialize: {e}"),
                );
                ptr::null_mut()
            }
        },
        Err(core_error) => {
            set_last_error(WeatherErrorCode::from(&core_error), &core_error.to_string());
            ptr::null_mut()
        }
    }
}

/// Release a string returned by an observe or forecast call.
///
/// # Safety
/// `string` must be null or a pointer previously returned by this library
/// that has not been freed.
#[no_mangle]
pub unsafe extern "C" fn weather_string_free(string: *mut c_char) {
    if !string.is_null() {
        drop(unsafe { CString::from_raw(string) });
    }
}
