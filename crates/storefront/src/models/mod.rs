//! Request-scoped models and session persistence helpers.

pub mod session;

pub use session::session_keys;
