//! Error reporter
//!
//! Turns OS error codes into the system's own message text.

use std::io;

/// Characters trimmed from the end of a system message
const TRAILING_WHITESPACE: [char; 4] = [' ', '\t', '\n', '\r'];

/// Describe an OS error code.
///
/// Uses the system message for `code` with trailing whitespace removed, or
/// `Error code (<code>)` when the lookup fails or yields nothing.
pub fn describe_error_code(code: i32) -> String {
    format_message(system_message(code), code)
}

/// Trim a looked-up system message, falling back to the numeric form
fn format_message(message: Option<String>, code: i32) -> String {
    message
        .map(|message| message.trim_end_matches(TRAILING_WHITESPACE).to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("Error code ({})", code))
}

/// Describe an I/O error, preferring the system message for its OS code
pub fn describe_io_error(err: &io::Error) -> String {
    match err.raw_os_error() {
        Some(code) => describe_error_code(code),
        None => err.to_string(),
    }
}

#[cfg(windows)]
fn system_message(code: i32) -> Option<String> {
    use std::ptr;
    use windows_sys::Win32::Foundation::LocalFree;
    use windows_sys::Win32::System::Diagnostics::Debug::{
        FormatMessageW, FORMAT_MESSAGE_ALLOCATE_BUFFER, FORMAT_MESSAGE_FROM_SYSTEM,
        FORMAT_MESSAGE_IGNORE_INSERTS,
    };

    /// MAKELANGID(LANG_NEUTRAL, SUBLANG_DEFAULT)
    const LANGUAGE_DEFAULT: u32 = 0x0400;

    /// Buffer allocated by FormatMessageW, released with LocalFree
    struct LocalBuffer(*mut u16);

    impl Drop for LocalBuffer {
        fn drop(&mut self) {
            if !self.0.is_null() {
                unsafe {
                    LocalFree(self.0.cast());
                }
            }
        }
    }

    let mut buffer = LocalBuffer(ptr::null_mut());
    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_FROM_SYSTEM
                | FORMAT_MESSAGE_IGNORE_INSERTS
                | FORMAT_MESSAGE_ALLOCATE_BUFFER,
            ptr::null(),
            code as u32,
            LANGUAGE_DEFAULT,
            // With ALLOCATE_BUFFER the function stores the new buffer's address here
            (&mut buffer.0 as *mut *mut u16).cast(),
            0,
            ptr::null(),
        )
    };

    if len == 0 || buffer.0.is_null() {
        return None;
    }

    let wide = unsafe { std::slice::from_raw_parts(buffer.0, len as usize) };
    Some(String::from_utf16_lossy(wide))
}

#[cfg(unix)]
fn system_message(code: i32) -> Option<String> {
    use std::ffi::CStr;

    let mut buf = [0 as libc::c_char; 256];
    // libc binds the XSI variant, which fills `buf` and returns 0 on success
    let ret = unsafe { libc::strerror_r(code, buf.as_mut_ptr(), buf.len()) };
    if ret != 0 {
        return None;
    }

    let message = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Some(message.to_string_lossy().into_owned())
}

#[cfg(not(any(unix, windows)))]
fn system_message(_code: i32) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_error_code_has_no_trailing_whitespace() {
        for code in [1, 2, 5, 13, 999_999] {
            let message = describe_error_code(code);
            assert!(!message.is_empty());
            assert_eq!(message, message.trim_end_matches(TRAILING_WHITESPACE));
        }
    }

    #[test]
    fn test_format_message_trims_trailing_whitespace() {
        assert_eq!(
            format_message(Some("Access is denied.\r\n".to_string()), 5),
            "Access is denied."
        );
        assert_eq!(
            format_message(Some("Not found. \t\n".to_string()), 2),
            "Not found."
        );
    }

    #[test]
    fn test_format_message_keeps_leading_and_non_ascii_whitespace() {
        assert_eq!(
            format_message(Some("  Access is denied.\u{a0}".to_string()), 5),
            "  Access is denied.\u{a0}"
        );
    }

    #[test]
    fn test_format_message_falls_back_to_code() {
        assert_eq!(format_message(None, 5), "Error code (5)");
        assert_eq!(format_message(Some(String::new()), 5), "Error code (5)");
        assert_eq!(format_message(Some(" \r\n".to_string()), 5), "Error code (5)");
    }

    #[cfg(all(unix, target_env = "gnu"))]
    #[test]
    fn test_describe_error_code_unknown_code() {
        assert_eq!(describe_error_code(999_999), "Error code (999999)");
    }

    #[cfg(unix)]
    #[test]
    fn test_describe_error_code_uses_system_message() {
        let message = describe_error_code(libc::ENOENT);
        assert!(
            message.contains("No such file"),
            "Unexpected message: {}",
            message
        );
    }

    #[test]
    fn test_describe_io_error_with_os_code() {
        let err = io::Error::from_raw_os_error(2);
        assert_eq!(describe_io_error(&err), describe_error_code(2));
    }

    #[test]
    fn test_describe_io_error_without_os_code() {
        let err = io::Error::new(io::ErrorKind::InvalidInput, "program name is empty");
        assert_eq!(describe_io_error(&err), "program name is empty");
    }
}
