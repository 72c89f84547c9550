//! Backend test support utilities
//!
//! Shared logging initialization and error-body assertions for the chat
//! backend's integration tests.

pub mod logging;
pub mod problem_details;
