//! MechnetErrorCode trait for the presentation boundary.

/// Every error enum implements this so the API layer can surface a stable,
/// machine-readable code next to the human message.
pub trait MechnetErrorCode {
    /// Returns the error code string (e.g., "NOT_FOUND").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn api_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const NOT_FOUND: &str = "NOT_FOUND";
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
pub const MISSING_DATA: &str = "MISSING_DATA";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
