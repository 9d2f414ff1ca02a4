//! Persistence adapter for the user profile and active plan records.
//!
//! # Responsibility
//! - Map `UserProfile` / `StudyPlan` values to two JSON records.
//! - Recover from missing, unparsable, legacy or invalid records.
//!
//! # Invariants
//! - `load_*` never returns an error; failures degrade to the default profile
//!   or an absent plan and are logged with a `reason` code.
//! - `save_plan(None)` deletes the plan record.
//! - `save_*` refuses records whose opaque fields shadow typed ones, so every
//!   written record loads back equal.
//! - The adapter only serializes copies; it never holds live state.

use crate::model::plan::{PlanValidationError, StudyPlan};
use crate::model::profile::UserProfile;
use crate::repo::kv_repo::{KeyValueStore, StorageError};
use log::{debug, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key of the serialized `UserProfile`.
pub const USER_KEY: &str = "omnistudy_user";
/// Storage key of the serialized active `StudyPlan`; absent when no plan.
pub const PLAN_KEY: &str = "omnistudy_plan";

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug)]
pub enum PersistenceError {
    Storage(StorageError),
    Serialize(serde_json::Error),
    /// The plan would not load back; nothing was written.
    InvalidPlan(PlanValidationError),
    /// A profile detail field reuses a typed field name; nothing was written.
    ReservedProfileKey(&'static str),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "state storage failed: {err}"),
            Self::Serialize(err) => write!(f, "state serialization failed: {err}"),
            Self::InvalidPlan(err) => write!(f, "refusing to save plan: {err}"),
            Self::ReservedProfileKey(key) => write!(
                f,
                "refusing to save profile: detail field `{key}` shadows a built-in field"
            ),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::InvalidPlan(err) => Some(err),
            Self::ReservedProfileKey(_) => None,
        }
    }
}

impl From<StorageError> for PersistenceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Reads and writes app state records on a key-value store.
pub struct StatePersistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StatePersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying key-value store.
    pub fn storage(&self) -> &S {
        &self.store
    }

    pub fn into_storage(self) -> S {
        self.store
    }

    /// Loads the user profile, falling back to the guest profile.
    pub fn load_user(&self) -> UserProfile {
        let Some(raw) = self.read_record(USER_KEY) else {
            return UserProfile::default();
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => {
                debug!("event=state_load module=repo status=ok record=user");
                profile
            }
            Err(err) => {
                warn!(
                    "event=state_load module=repo status=fallback record=user reason=parse_error error={err}"
                );
                UserProfile::default()
            }
        }
    }

    /// Loads the active plan.
    ///
    /// Returns `None` for a missing record, unparsable JSON, a legacy record
    /// without `variants`, or a plan failing `StudyPlan::validate()`.
    pub fn load_plan(&self) -> Option<StudyPlan> {
        let raw = self.read_record(PLAN_KEY)?;

        let value = match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=state_load module=repo status=fallback record=plan reason=parse_error error={err}"
                );
                return None;
            }
        };

        if value.get("variants").is_none() {
            warn!("event=state_load module=repo status=fallback record=plan reason=legacy_format");
            return None;
        }

        let plan = match serde_json::from_value::<StudyPlan>(value) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(
                    "event=state_load module=repo status=fallback record=plan reason=invalid_shape error={err}"
                );
                return None;
            }
        };

        if let Err(err) = plan.validate() {
            warn!(
                "event=state_load module=repo status=fallback record=plan reason={} error={err}",
                err.code()
            );
            return None;
        }

        debug!(
            "event=state_load module=repo status=ok record=plan variants={}",
            plan.variants.len()
        );
        Some(plan)
    }

    /// Writes the user record, replacing any prior value.
    ///
    /// # Errors
    /// - `ReservedProfileKey` when `details` shadows `name`, `planType` or `avatar`.
    pub fn save_user(&self, profile: &UserProfile) -> PersistenceResult<()> {
        if let Some(key) = profile.shadowed_detail_key() {
            warn!("event=state_save module=repo status=rejected record=user reason=reserved_detail_key");
            return Err(PersistenceError::ReservedProfileKey(key));
        }
        let raw = serde_json::to_string(profile)?;
        self.store.set(USER_KEY, &raw)?;
        debug!("event=state_save module=repo status=ok record=user");
        Ok(())
    }

    /// Writes the plan record, or deletes it when `plan` is `None`.
    ///
    /// # Errors
    /// - `InvalidPlan` when `plan` fails `StudyPlan::validate()`.
    pub fn save_plan(&self, plan: Option<&StudyPlan>) -> PersistenceResult<()> {
        match plan {
            Some(plan) => {
                if let Err(err) = plan.validate() {
                    warn!(
                        "event=state_save module=repo status=rejected record=plan reason={}",
                        err.code()
                    );
                    return Err(PersistenceError::InvalidPlan(err));
                }
                let raw = serde_json::to_string(plan)?;
                self.store.set(PLAN_KEY, &raw)?;
                debug!(
                    "event=state_save module=repo status=ok record=plan bytes={}",
                    raw.len()
                );
            }
            None => {
                self.store.remove(PLAN_KEY)?;
                debug!("event=state_save module=repo status=ok record=plan action=delete");
            }
        }
        Ok(())
    }

    fn read_record(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    "event=state_load module=repo status=fallback key={key} reason=storage_error error={err}"
                );
                None
            }
        }
    }
}
