//! Utilities.

pub mod timeout;

pub use timeout::{timeout_millis, with_timeout};
