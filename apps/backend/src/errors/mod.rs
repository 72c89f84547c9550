//! Error handling for the chat backend.

pub mod error_code;

pub use error_code::ErrorCode;
