//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use clientkit_core::{AllowedHostsValidator, Error, IsoDuration};

/// Opaque handle to an `AllowedHostsValidator`. C callers receive a pointer
/// to this and pass it back into every allow-list function.
///
/// The handle is not synchronized. Callers sharing it across threads must
/// serialize `clientkit_allowed_hosts_set` against every other call.
pub struct FfiAllowedHosts {
    pub(crate) inner: AllowedHostsValidator,
}

// ---------------------------------------------------------------------------
// Input types (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An ISO-8601 duration as C-compatible plain data.
#[repr(C)]
pub struct FfiDuration {
    pub inverted: bool,
    pub years: u64,
    pub months: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub microseconds: u32,
}

impl From<&FfiDuration> for IsoDuration {
    fn from(d: &FfiDuration) -> Self {
        IsoDuration {
            inverted: d.inverted,
            years: d.years,
            months: d.months,
            days: d.days,
            hours: d.hours,
            minutes: d.minutes,
            seconds: d.seconds,
            microseconds: d.microseconds,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidInput = 1,
    Config = 2,
    TokenProvider = 3,
    Panic = 4,
    NullArg = 5,
}

impl From<&Error> for FfiErrorCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::InvalidInput(_) => FfiErrorCode::InvalidInput,
            Error::Config(_) => FfiErrorCode::Config,
            Error::TokenProvider(_) => FfiErrorCode::TokenProvider,
        }
    }
}

/// Tag that tells `clientkit_free_result` what `FfiResult::data` points to.
#[repr(C)]
pub enum FfiDataTag {
    None = 0,
    Bool = 1,
    String = 2,
    StringList = 3,
}

/// A list of C strings exposed to C.
#[repr(C)]
pub struct FfiStringList {
    pub items: *mut *mut c_char,
    pub len: u32,
}

/// Result envelope for fallible operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

/// Length of a list as the `u32` used in `FfiStringList::len`.
pub(crate) fn list_len(len: usize) -> Result<u32, Error> {
    u32::try_from(len)
        .map_err(|_| Error::InvalidInput(format!("list of {len} items does not fit in a u32 length")))
}

pub(crate) fn to_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

impl FfiResult {
    fn ok(data_tag: FfiDataTag, data: *mut std::ffi::c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: to_c_string(msg),
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build a success result carrying a `bool`.
    pub(crate) fn ok_bool(value: bool) -> *mut Self {
        Self::ok(FfiDataTag::Bool, Box::into_raw(Box::new(value)) as *mut std::ffi::c_void)
    }

    /// Build a success result carrying a C string.
    pub(crate) fn ok_string(value: String) -> *mut Self {
        Self::ok(FfiDataTag::String, to_c_string(value) as *mut std::ffi::c_void)
    }

    /// Build a success result carrying a `FfiStringList`.
    ///
    /// Lists longer than `u32::MAX` produce an `InvalidInput` result.
    pub(crate) fn ok_string_list(values: Vec<String>) -> *mut Self {
        let len = match list_len(values.len()) {
            Ok(len) => len,
            Err(e) => return Self::from_error(e),
        };
        let items = if values.is_empty() {
            std::ptr::null_mut()
        } else {
            let raw: Box<[*mut c_char]> = values.into_iter().map(to_c_string).collect();
            Box::into_raw(raw) as *mut *mut c_char
        };
        let list = Box::new(FfiStringList { items, len });
        Self::ok(FfiDataTag::StringList, Box::into_raw(list) as *mut std::ffi::c_void)
    }

    /// Build an error result from a core `Error`.
    pub(crate) fn from_error(err: Error) -> *mut Self {
        Self::err(FfiErrorCode::from(&err), err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, msg.to_string())
    }
}
