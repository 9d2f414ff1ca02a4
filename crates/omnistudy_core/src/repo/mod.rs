//! Storage contracts and the persistence adapter for app state.
//!
//! # Responsibility
//! - Define the durable local key-value contract and its implementations.
//! - Serialize and deserialize state records without owning live state.
//!
//! # Invariants
//! - Loading never fails the caller; malformed records degrade to defaults.
//! - An absent plan is represented by a deleted key, never a null marker.

pub mod kv_repo;
pub mod state_repo;
