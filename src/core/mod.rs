//! Core logic layer
//!
//! Event routing and gesture handling. NO imports from frontend rendering
//! code; frontends read AppCore and paint it.

pub mod app_core;
pub mod drag;

pub use app_core::AppCore;
