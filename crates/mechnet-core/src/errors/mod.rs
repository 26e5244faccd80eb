//! Error handling for mechnet.
//! One error enum per concern, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod mechanism_error;

pub use config_error::ConfigError;
pub use error_code::MechnetErrorCode;
pub use mechanism_error::{EntityKind, MechanismError, MechnetResult};
