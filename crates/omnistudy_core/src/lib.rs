//! Core state model for OmniStudy.
//! This crate is the single source of truth for plan and profile invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::plan::{
    DayPlan, Details, IntensityLevel, PlanProgress, PlanValidationError, PlanVariant, StudyPlan,
    Task,
};
pub use model::profile::UserProfile;
pub use repo::kv_repo::{
    KeyValueStore, MemoryKvStore, SqliteKvStore, StorageError, StorageResult,
};
pub use repo::state_repo::{
    PersistenceError, PersistenceResult, StatePersistence, PLAN_KEY, USER_KEY,
};
pub use service::plan_store::{PlanStore, StoreError, StoreOptions, StoreResult, ToggleOutcome};
pub use service::session::{Intent, IntentOutcome, Session, SessionError, SessionResult};
pub use view::router::{SidebarDescriptor, ViewDescriptor, ViewRouter};
pub use view::{Callback, View};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
