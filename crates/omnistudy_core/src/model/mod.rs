//! Domain model for the user profile and multi-intensity study plans.
//!
//! # Responsibility
//! - Define the value types owned by the plan state store.
//! - Provide pure copy-on-write transformations over those values.
//!
//! # Invariants
//! - Transformations never mutate their input; they return a new value.
//! - `StudyPlan::selected_intensity` names a key of `StudyPlan::variants`
//!   for every plan accepted by `StudyPlan::validate()`.

pub mod plan;
pub mod profile;
