//! Uniform success/failure carrier used across the lifecycle core.
//!
//! `Status` plays the role `result_status` plays in the C++ source: a cheap,
//! value-semantic `{code, message}` pair that every fallible operation in
//! this crate (and, by convention, in code built on top of it) returns
//! instead of a bespoke error enum per call site.

use std::fmt;

/// Outcome of a fallible operation.
///
/// `code == 0` iff the status is OK, in which case `message` is always
/// empty. Constructing an error status with a format string materializes
/// the message eagerly — there is no lazy formatting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    code: i32,
    message: String,
}

impl Status {
    /// An OK status. Allocation-free: `String::new()` never allocates.
    pub fn ok() -> Self {
        Status { code: 0, message: String::new() }
    }

    /// Construct an error status from a code and a literal/owned message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        if code == 0 {
            return Status::ok();
        }
        Status { code, message: message.into() }
    }

    /// Construct an error status, formatting the message eagerly.
    ///
    /// `args` is anything that already implements `Display`; callers that
    /// need `format!`-style interpolation should format before calling this
    /// (mirrors the C++ constructor, which forwards to a format function and
    /// stores the result immediately).
    pub fn from_format(code: i32, args: fmt::Arguments<'_>) -> Self {
        Status::new(code, fmt::format(args))
    }

    /// Reset to OK, dropping any stored message.
    pub fn reset(&mut self) {
        self.code = 0;
        self.message.clear();
    }

    /// Atomically replace both fields.
    pub fn set_error(&mut self, code: i32, message: impl Into<String>) {
        self.code = code;
        self.message = message.into();
    }

    /// True iff `code == 0`.
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }

    /// The stored integer code (0 for OK).
    pub fn code(&self) -> i32 {
        self.code
    }

    /// `"OK"` when OK, otherwise the stored message, truncated at the first
    /// embedded NUL byte (mirrors `error_cstr`'s C-string semantics).
    pub fn message_cstr(&self) -> &str {
        if self.code == 0 {
            return "OK";
        }
        match self.message.as_bytes().iter().position(|&b| b == 0) {
            Some(nul) => std::str::from_utf8(&self.message.as_bytes()[..nul])
                .unwrap_or(&self.message),
            None => &self.message,
        }
    }

    /// The full message, including any bytes past an embedded NUL.
    ///
    /// Unlike [`Status::message_cstr`], this never truncates — it preserves
    /// the full byte length for messages that contain embedded NULs.
    pub fn message(&self) -> &str {
        if self.code == 0 {
            "OK"
        } else {
            &self.message
        }
    }

    /// Look up a platform error string for `code` (as `errno`).
    pub fn from_errno(code: i32) -> Self {
        Status::new(code, errno_message(code))
    }

    /// As [`Status::from_errno`], with extra context appended.
    pub fn from_errno_with_context(code: i32, extra: impl fmt::Display) -> Self {
        Status::new(code, format!("{} {}", errno_message(code), extra))
    }

    /// Adopt a `std::io::Error`'s raw OS error code and message.
    pub fn from_error_code(err: &std::io::Error) -> Self {
        match err.raw_os_error() {
            Some(code) => Status::new(code, err.to_string()),
            None => Status::new(-1, err.to_string()),
        }
    }

    /// Snapshot the platform's current `errno`-equivalent.
    pub fn from_last_error() -> Self {
        Status::from_error_code(&std::io::Error::last_os_error())
    }
}

impl fmt::Display for Status {
    /// Prints the message, never the code — an OK status prints exactly
    /// `OK`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<Status> for anyhow::Error {
    fn from(status: Status) -> Self {
        anyhow::anyhow!("{} (code {})", status.message(), status.code())
    }
}

fn errno_message(code: i32) -> String {
    std::io::Error::from_raw_os_error(code).to_string()
}

/// Builds an error [`Status`] with a `format!`-style message, eagerly
/// materialized.
#[macro_export]
macro_rules! status_error {
    ($code:expr, $($arg:tt)*) => {
        $crate::status::Status::from_format($code, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_prints_ok() {
        assert_eq!(Status::ok().to_string(), "OK");
        assert_eq!(Status::default().to_string(), "OK");
    }

    #[test]
    fn ok_is_ok() {
        let s = Status::ok();
        assert!(s.is_ok());
        assert_eq!(s.code(), 0);
    }

    #[test]
    fn error_carries_code_and_message() {
        let s = Status::new(17, "no memory");
        assert!(!s.is_ok());
        assert_eq!(s.code(), 17);
        assert_eq!(s.to_string(), "no memory");
        assert_eq!(s.message_cstr(), "no memory");
    }

    #[test]
    fn format_constructor_formats_eagerly() {
        let s = status_error!(3, "{}{}", "no memory", "no cpu");
        assert_eq!(s.to_string(), "no memoryno cpu");
    }

    #[test]
    fn reset_clears_code_and_message() {
        let mut s = Status::new(5, "boom");
        s.reset();
        assert!(s.is_ok());
        assert_eq!(s.to_string(), "OK");
    }

    #[test]
    fn set_error_replaces_both_fields_atomically() {
        let mut s = Status::new(1, "first");
        s.set_error(2, "second");
        assert_eq!(s.code(), 2);
        assert_eq!(s.to_string(), "second");
    }

    #[test]
    fn embedded_nul_preserves_length_but_cstr_truncates() {
        let mut bytes = b"hello".to_vec();
        bytes.push(0);
        bytes.extend_from_slice(b"world");
        assert_eq!(bytes.len(), 11);
        let msg = unsafe { String::from_utf8_unchecked(bytes) };
        let s = Status::new(9, msg);
        assert_eq!(s.message().len(), 11);
        assert_eq!(s.message_cstr().len(), 5);
        assert_eq!(s.message_cstr(), "hello");
    }

    #[test]
    fn assigning_long_message_preserves_length() {
        let long = Status::new(1, "x".repeat(200));
        let mut short = Status::new(2, "y");
        short = long.clone();
        assert_eq!(short.message().len(), 200);
    }

    #[test]
    fn code_zero_forces_ok_even_via_new() {
        let s = Status::new(0, "should be dropped");
        assert!(s.is_ok());
        assert_eq!(s.to_string(), "OK");
    }
}
