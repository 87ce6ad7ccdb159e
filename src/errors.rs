// SPDX-License-Identifier: MPL-2.0

//! Error types for the pipeline driver

use crate::backends::framework::{status_to_string, BackendError, Status};
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// A framework call failed
    Framework(FrameworkError),
    /// Framework backend could not be brought up
    Backend(BackendError),
    /// Configuration errors
    Config(String),
    /// Filesystem errors
    Io(String),
}

/// A framework call returned a non-success status
///
/// Carries the source location and text of the failing call so that the
/// diagnostic line points at the exact step of the setup sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkError {
    pub status: Status,
    pub call: String,
    pub file: &'static str,
    pub line: u32,
}

impl FrameworkError {
    pub fn new(status: Status, call: impl Into<String>, file: &'static str, line: u32) -> Self {
        Self {
            status,
            call: call.into(),
            file,
            line,
        }
    }
}

/// Evaluate a framework call, returning a [`FrameworkError`] from the
/// enclosing function if it fails
#[macro_export]
macro_rules! check {
    ($call:expr) => {
        match $call {
            Ok(value) => value,
            Err(status) => {
                return Err($crate::errors::FrameworkError::new(
                    status,
                    stringify!($call),
                    file!(),
                    line!(),
                )
                .into());
            }
        }
    };
}

impl fmt::Display for FrameworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {} (0x{:08x})",
            self.file,
            self.line,
            self.call,
            status_to_string(self.status.code()),
            self.status.code()
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // The diagnostic line is printed as-is
            AppError::Framework(e) => write!(f, "{}", e),
            AppError::Backend(e) => write!(f, "Backend error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for FrameworkError {}

impl From<FrameworkError> for AppError {
    fn from(err: FrameworkError) -> Self {
        AppError::Framework(err)
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Backend(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails() -> Result<u32, FrameworkError> {
        let value: Result<u32, Status> = Err(Status::Invalid);
        Ok(check!(value))
    }

    #[test]
    fn test_diagnostic_line_format() {
        let err = FrameworkError::new(Status::Invalid, "commit(port)", "src/x.rs", 42);
        assert_eq!(err.to_string(), "src/x.rs:42: commit(port): EINVAL (0x00000003)");
    }

    #[test]
    fn test_check_macro_captures_call() {
        let err = fails().unwrap_err();
        assert_eq!(err.status, Status::Invalid);
        assert_eq!(err.call, "value");
        assert!(err.file.ends_with("errors.rs"));
    }

    #[test]
    fn test_framework_error_displays_verbatim_through_app_error() {
        let err = FrameworkError::new(Status::NoMemory, "create()", "a.rs", 1);
        let app: AppError = err.clone().into();
        assert_eq!(app.to_string(), err.to_string());
    }
}
