//! Core use-case services.
//!
//! # Responsibility
//! - Own live app state and expose its mutation operations.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod plan_store;
pub mod session;
