//! C-ABI wrapper around `clientkit-core`.
//!
//! # Overview
//! Exposes the host allow-list and the scalar codec through `extern "C"`
//! functions so generated clients in any language with a C FFI share the
//! same normalization and formatting rules.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Fallible operations return a single `FfiResult` envelope with
//!   `FfiDataTag` + `void* data` conveying payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `clientkit_*_free` / `clientkit_free_*` function to release them.

pub mod logging;
pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use chrono::{DateTime, FixedOffset};
use clientkit_core::{scalar, AllowedHostsValidator, Error, IsoDuration};

use types::*;

/// Read `len` C strings from `hosts`. Returns `None` if the array or any
/// entry is null.
fn read_c_strings(hosts: *const *const c_char, len: u32) -> Option<Vec<String>> {
    if len == 0 {
        return Some(Vec::new());
    }
    if hosts.is_null() {
        return None;
    }
    let ptrs = unsafe { std::slice::from_raw_parts(hosts, len as usize) };
    ptrs.iter()
        .map(|&p| {
            if p.is_null() {
                None
            } else {
                Some(unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned())
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Allow-list lifecycle
// ---------------------------------------------------------------------------

/// Create an allow-list from `len` host strings (with or without scheme).
///
/// Returns null if `hosts` or one of its entries is null, or if an internal
/// panic occurs. The caller must free the returned pointer with
/// `clientkit_allowed_hosts_free`.
#[unsafe(no_mangle)]
pub extern "C" fn clientkit_allowed_hosts_new(
    hosts: *const *const c_char,
    len: u32,
) -> *mut FfiAllowedHosts {
    catch_unwind(|| match read_c_strings(hosts, len) {
        Some(hosts) => Box::into_raw(Box::new(FfiAllowedHosts {
            inner: AllowedHostsValidator::new(hosts),
        })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free an allow-list created by `clientkit_allowed_hosts_new`. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn clientkit_allowed_hosts_free(validator: *mut FfiAllowedHosts) {
    if !validator.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(validator) });
        });
    }
}

// ---------------------------------------------------------------------------
// Allow-list operations
// ---------------------------------------------------------------------------

/// Merge `len` hosts into the allow-list. Existing hosts are kept.
#[unsafe(no_mangle)]
pub extern "C" fn clientkit_allowed_hosts_set(
    validator: *mut FfiAllowedHosts,
    hosts: *const *const c_char,
    len: u32,
) -> FfiErrorCode {
    catch_unwind(|| {
        if validator.is_null() {
            return FfiErrorCode::NullArg;
        }
        let Some(hosts) = read_c_strings(hosts, len) else {
            return FfiErrorCode::NullArg;
        };
        let validator = unsafe { &mut *validator };
        validator.inner.set_allowed_hosts(hosts);
        FfiErrorCode::Ok
    })
    .unwrap_or(FfiErrorCode::Panic)
}

/// List the normalized hosts in the allow-list.
///
/// Returns a result with `data_tag = StringList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn clientkit_allowed_hosts_get(validator: *const FfiAllowedHosts) -> *mut FfiResult {
    catch_unwind(|| {
        if validator.is_null() {
            return FfiResult::null_arg("validator");
        }
        let validator = unsafe { &*validator };
        FfiResult::ok_string_list(validator.inner.allowed_hosts())
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in clientkit_allowed_hosts_get"))
}

/// Check whether credentials may be sent to the host of `url`.
///
/// Returns a result with `data_tag = Bool` on success, or `InvalidInput` if
/// `url` is malformed or has no host.
#[unsafe(no_mangle)]
pub extern "C" fn clientkit_is_url_host_valid(
    validator: *const FfiAllowedHosts,
    url: *const c_char,
) -> *mut FfiResult {
    catch_unwind(|| {
        if validator.is_null() {
            return FfiResult::null_arg("validator");
        }
        if url.is_null() {
            return FfiResult::null_arg("url");
        }
        let validator = unsafe { &*validator };
        let url = unsafe { CStr::from_ptr(url) }.to_string_lossy();
        match validator.inner.is_url_host_valid(&url) {
            Ok(valid) => FfiResult::ok_bool(valid),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in clientkit_is_url_host_valid"))
}

// ---------------------------------------------------------------------------
// Scalar codec
// ---------------------------------------------------------------------------

/// Render a boolean as `"true"` or `"false"`.
/// The caller must free the returned string with `clientkit_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn clientkit_boolean_to_string(value: bool) -> *mut c_char {
    catch_unwind(|| to_c_string(scalar::boolean_to_string(value))).unwrap_or(std::ptr::null_mut())
}

/// Render the instant `unix_seconds` at UTC offset `offset_seconds` as an
/// ISO-8601 date-time, e.g. `2024-04-29T15:12:00+00:00`.
///
/// Returns a result with `data_tag = String` on success.
#[unsafe(no_mangle)]
pub extern "C" fn clientkit_date_time_to_string(
    unix_seconds: i64,
    offset_seconds: i32,
) -> *mut FfiResult {
    catch_unwind(|| {
        let Some(offset) = FixedOffset::east_opt(offset_seconds) else {
            return FfiResult::from_error(Error::InvalidInput(format!(
                "utc offset out of range: {offset_seconds} seconds"
            )));
        };
        let Some(utc) = DateTime::from_timestamp(unix_seconds, 0) else {
            return FfiResult::from_error(Error::InvalidInput(format!(
                "timestamp out of range: {unix_seconds}"
            )));
        };
        match scalar::date_time_to_string(&utc.with_timezone(&offset)) {
            Ok(s) => FfiResult::ok_string(s),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in clientkit_date_time_to_string"))
}

/// Render `duration` as an ISO-8601 duration, e.g. `P1DT11S`.
///
/// Returns a result with `data_tag = String` on success.
#[unsafe(no_mangle)]
pub extern "C" fn clientkit_duration_to_string(duration: *const FfiDuration) -> *mut FfiResult {
    catch_unwind(|| {
        if duration.is_null() {
            return FfiResult::null_arg("duration");
        }
        let duration = IsoDuration::from(unsafe { &*duration });
        match scalar::duration_to_string(&duration) {
            Ok(s) => FfiResult::ok_string(s),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in clientkit_duration_to_string"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiResult` returned by any fallible function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn clientkit_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data.is_null() {
            match result.data_tag {
                FfiDataTag::Bool => {
                    drop(unsafe { Box::from_raw(result.data as *mut bool) });
                }
                FfiDataTag::String => {
                    drop(unsafe { CString::from_raw(result.data as *mut c_char) });
                }
                FfiDataTag::StringList => {
                    let list = unsafe { Box::from_raw(result.data as *mut FfiStringList) };
                    if !list.items.is_null() && list.len > 0 {
                        let items = unsafe {
                            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                                list.items,
                                list.len as usize,
                            ))
                        };
                        for &item in items.iter() {
                            if !item.is_null() {
                                drop(unsafe { CString::from_raw(item) });
                            }
                        }
                    }
                }
                FfiDataTag::None => {}
            }
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn clientkit_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn c_strings(values: &[&str]) -> Vec<CString> {
        values.iter().map(|v| CString::new(*v).unwrap()).collect()
    }

    fn new_validator(hosts: &[&str]) -> *mut FfiAllowedHosts {
        let owned = c_strings(hosts);
        let ptrs: Vec<*const c_char> = owned.iter().map(|s| s.as_ptr()).collect();
        clientkit_allowed_hosts_new(ptrs.as_ptr(), ptrs.len() as u32)
    }

    fn result_string(result: *mut FfiResult) -> String {
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        assert!(matches!(r.data_tag, FfiDataTag::String));
        unsafe { CStr::from_ptr(r.data as *const c_char) }
            .to_str()
            .unwrap()
            .to_string()
    }

    fn check_url(validator: *const FfiAllowedHosts, url: &str) -> *mut FfiResult {
        let url = CString::new(url).unwrap();
        clientkit_is_url_host_valid(validator, url.as_ptr())
    }

    #[test]
    fn allowed_hosts_new_and_free() {
        let validator = new_validator(&["https://example.com"]);
        assert!(!validator.is_null());
        clientkit_allowed_hosts_free(validator);
    }

    #[test]
    fn allowed_hosts_new_empty_with_null_array() {
        let validator = clientkit_allowed_hosts_new(std::ptr::null(), 0);
        assert!(!validator.is_null());
        let result = check_url(validator, "https://anything.example");
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        assert!(unsafe { *(r.data as *const bool) });
        clientkit_free_result(result);
        clientkit_allowed_hosts_free(validator);
    }

    #[test]
    fn allowed_hosts_new_null_array_with_len_returns_null() {
        let validator = clientkit_allowed_hosts_new(std::ptr::null(), 2);
        assert!(validator.is_null());
    }

    #[test]
    fn allowed_hosts_free_null_is_safe() {
        clientkit_allowed_hosts_free(std::ptr::null_mut());
    }

    #[test]
    fn is_url_host_valid_reports_bool() {
        let validator = new_validator(&["HTTPS://Example.com"]);

        let result = check_url(validator, "http://EXAMPLE.com/path");
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        assert!(matches!(r.data_tag, FfiDataTag::Bool));
        assert!(unsafe { *(r.data as *const bool) });
        clientkit_free_result(result);

        let result = check_url(validator, "https://other.example.org");
        let r = unsafe { &*result };
        assert!(!unsafe { *(r.data as *const bool) });
        clientkit_free_result(result);

        clientkit_allowed_hosts_free(validator);
    }

    #[test]
    fn is_url_host_valid_malformed_url_is_invalid_input() {
        let validator = new_validator(&["example.com"]);
        for url in ["::::", "mailto:foo@bar.com"] {
            let result = check_url(validator, url);
            let r = unsafe { &*result };
            assert!(matches!(r.error_code, FfiErrorCode::InvalidInput), "{url}");
            assert!(!r.error_message.is_null());
            assert!(r.data.is_null());
            clientkit_free_result(result);
        }
        clientkit_allowed_hosts_free(validator);
    }

    #[test]
    fn is_url_host_valid_null_args() {
        let url = CString::new("https://example.com").unwrap();
        let result = clientkit_is_url_host_valid(std::ptr::null(), url.as_ptr());
        assert!(matches!(unsafe { &*result }.error_code, FfiErrorCode::NullArg));
        clientkit_free_result(result);

        let validator = new_validator(&[]);
        let result = clientkit_is_url_host_valid(validator, std::ptr::null());
        assert!(matches!(unsafe { &*result }.error_code, FfiErrorCode::NullArg));
        clientkit_free_result(result);
        clientkit_allowed_hosts_free(validator);
    }

    #[test]
    fn set_is_additive_and_get_lists_normalized_hosts() {
        let validator = new_validator(&["a.example.com"]);
        let more = c_strings(&["https://B.example.com"]);
        let ptrs: Vec<*const c_char> = more.iter().map(|s| s.as_ptr()).collect();
        let code = clientkit_allowed_hosts_set(validator, ptrs.as_ptr(), 1);
        assert_eq!(code, FfiErrorCode::Ok);

        let result = clientkit_allowed_hosts_get(validator);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        assert!(matches!(r.data_tag, FfiDataTag::StringList));
        let list = unsafe { &*(r.data as *const FfiStringList) };
        let items = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
        let mut hosts: Vec<String> = items
            .iter()
            .map(|&p| unsafe { CStr::from_ptr(p) }.to_str().unwrap().to_string())
            .collect();
        hosts.sort();
        assert_eq!(hosts, vec!["a.example.com", "b.example.com"]);

        clientkit_free_result(result);
        clientkit_allowed_hosts_free(validator);
    }

    #[test]
    fn get_on_empty_list_has_no_items() {
        let validator = new_validator(&[]);
        let result = clientkit_allowed_hosts_get(validator);
        let list = unsafe { &*(((*result).data) as *const FfiStringList) };
        assert_eq!(list.len, 0);
        assert!(list.items.is_null());
        clientkit_free_result(result);
        clientkit_allowed_hosts_free(validator);
    }

    #[test]
    fn list_len_rejects_lengths_beyond_u32() {
        assert_eq!(types::list_len(3), Ok(3));
        assert_eq!(types::list_len(u32::MAX as usize), Ok(u32::MAX));
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            types::list_len(u32::MAX as usize + 1),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn set_null_validator_returns_null_arg() {
        let code = clientkit_allowed_hosts_set(std::ptr::null_mut(), std::ptr::null(), 0);
        assert_eq!(code, FfiErrorCode::NullArg);
    }

    #[test]
    fn boolean_to_string_values() {
        let t = clientkit_boolean_to_string(true);
        assert_eq!(unsafe { CStr::from_ptr(t) }.to_str().unwrap(), "true");
        clientkit_free_string(t);
        let f = clientkit_boolean_to_string(false);
        assert_eq!(unsafe { CStr::from_ptr(f) }.to_str().unwrap(), "false");
        clientkit_free_string(f);
    }

    #[test]
    fn date_time_to_string_utc_and_offset() {
        // 2024-04-29T15:12:00Z
        let result = clientkit_date_time_to_string(1_714_403_520, 0);
        assert_eq!(result_string(result), "2024-04-29T15:12:00+00:00");
        clientkit_free_result(result);

        let result = clientkit_date_time_to_string(1_714_403_520, 3600);
        assert_eq!(result_string(result), "2024-04-29T16:12:00+01:00");
        clientkit_free_result(result);
    }

    #[test]
    fn date_time_to_string_rejects_bad_offset() {
        let result = clientkit_date_time_to_string(0, 86_400);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::InvalidInput));
        clientkit_free_result(result);
    }

    #[test]
    fn duration_to_string_values() {
        let d = FfiDuration {
            inverted: true,
            years: 0,
            months: 0,
            days: 1,
            hours: 0,
            minutes: 0,
            seconds: 0,
            microseconds: 0,
        };
        let result = clientkit_duration_to_string(&d);
        assert_eq!(result_string(result), "-P1D");
        clientkit_free_result(result);

        let d = FfiDuration {
            inverted: false,
            seconds: 11,
            ..d
        };
        let result = clientkit_duration_to_string(&d);
        assert_eq!(result_string(result), "P1DT11S");
        clientkit_free_result(result);
    }

    #[test]
    fn duration_to_string_invalid_fraction() {
        let d = FfiDuration {
            inverted: false,
            years: 0,
            months: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 1,
            microseconds: 2_000_000,
        };
        let result = clientkit_duration_to_string(&d);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::InvalidInput));
        clientkit_free_result(result);
    }

    #[test]
    fn duration_to_string_null_returns_null_arg() {
        let result = clientkit_duration_to_string(std::ptr::null());
        assert!(matches!(unsafe { &*result }.error_code, FfiErrorCode::NullArg));
        clientkit_free_result(result);
    }

    #[test]
    fn init_logging_only_installs_once() {
        let first = logging::clientkit_init_logging();
        let second = logging::clientkit_init_logging();
        assert!(first);
        assert!(!second);
    }

    #[test]
    fn free_result_null_is_safe() {
        clientkit_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        clientkit_free_string(std::ptr::null_mut());
    }
}
