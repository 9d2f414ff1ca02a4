//! Plan state store: single source of truth for profile and active plan.
//!
//! # Responsibility
//! - Hold the live `UserProfile` and optional `StudyPlan` snapshots.
//! - Apply mutations as copy-on-write rebuilds and commit them.
//! - Persist every committed transition with exactly one save.
//!
//! # Invariants
//! - Every commit installs a fresh `Arc`; readers use `Arc::ptr_eq` on
//!   snapshots to detect change, and a held snapshot is never mutated.
//! - State is read from storage only in `PlanStore::initialize`.
//! - A save failure never rolls back the committed in-memory state.

use crate::model::plan::{PlanValidationError, StudyPlan};
use crate::model::profile::UserProfile;
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::state_repo::{PersistenceError, StatePersistence};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type StoreResult<T> = Result<T, StoreError>;

/// Behavior knobs for [`PlanStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// When set, a toggle that matches no task commits nothing and skips the
    /// plan write. When cleared, an identical plan is re-committed and written.
    pub skip_unmatched_toggle_writes: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            skip_unmatched_toggle_writes: true,
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    /// Plan handed to `replace_plan` violates structural invariants.
    InvalidPlan(PlanValidationError),
    /// Operation needs an active plan.
    NoActivePlan,
    /// Requested intensity is not a variant of the active plan.
    UnknownIntensity(String),
    /// State was committed but the save failed.
    Persistence(PersistenceError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPlan(err) => write!(f, "invalid plan: {err}"),
            Self::NoActivePlan => write!(f, "no active plan"),
            Self::UnknownIntensity(level) => write!(f, "unknown plan intensity `{level}`"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPlan(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::NoActivePlan | Self::UnknownIntensity(_) => None,
        }
    }
}

impl From<PlanValidationError> for StoreError {
    fn from(value: PlanValidationError) -> Self {
        Self::InvalidPlan(value)
    }
}

impl From<PersistenceError> for StoreError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// Result of a `toggle_task` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The task was flipped; carries its new `completed` value.
    Toggled { completed: bool },
    /// No task in the selected variant matched `(day, task_id)`.
    NoMatch,
    /// No plan is active; nothing happened.
    NoActivePlan,
}

/// Session-scoped owner of profile and plan state.
pub struct PlanStore<S: KeyValueStore> {
    persistence: StatePersistence<S>,
    options: StoreOptions,
    profile: Arc<UserProfile>,
    plan: Option<Arc<StudyPlan>>,
}

impl<S: KeyValueStore> PlanStore<S> {
    /// Loads persisted state once and builds the store.
    ///
    /// Never fails: unusable records fall back to the guest profile and no
    /// active plan.
    pub fn initialize(storage: S, options: StoreOptions) -> Self {
        let persistence = StatePersistence::new(storage);
        let profile = persistence.load_user();
        let plan = persistence.load_plan();

        info!(
            "event=store_init module=service status=ok has_plan={}",
            plan.is_some()
        );

        Self {
            persistence,
            options,
            profile: Arc::new(profile),
            plan: plan.map(Arc::new),
        }
    }

    pub fn profile(&self) -> &Arc<UserProfile> {
        &self.profile
    }

    pub fn plan(&self) -> Option<&Arc<StudyPlan>> {
        self.plan.as_ref()
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Borrows the backing key-value store.
    pub fn storage(&self) -> &S {
        self.persistence.storage()
    }

    /// Replaces the profile name and persists the user record.
    pub fn update_name(&mut self, name: impl Into<String>) -> StoreResult<()> {
        let next = self.profile.with_name(name);
        self.commit_profile(next)
    }

    /// Replaces the active plan wholesale, or clears it with `None`.
    ///
    /// # Errors
    /// - `InvalidPlan` when `plan` fails validation; state is unchanged and
    ///   nothing is written.
    /// - `Persistence` when the committed plan could not be saved.
    pub fn replace_plan(&mut self, plan: Option<StudyPlan>) -> StoreResult<()> {
        if let Some(plan) = plan.as_ref() {
            if let Err(err) = plan.validate() {
                warn!(
                    "event=plan_replace module=service status=rejected reason={}",
                    err.code()
                );
                return Err(err.into());
            }
        }
        self.commit_plan(plan)
    }

    /// Flips `completed` of task `task_id` on day `day` of the selected variant.
    ///
    /// Other variants, days and tasks are carried over unchanged. With no
    /// active plan this is a no-op returning `ToggleOutcome::NoActivePlan`.
    pub fn toggle_task(&mut self, day: i64, task_id: &str) -> StoreResult<ToggleOutcome> {
        let Some(current) = self.plan.as_ref() else {
            debug!("event=task_toggle module=service status=skipped reason=no_active_plan");
            return Ok(ToggleOutcome::NoActivePlan);
        };

        match current.with_task_toggled(day, task_id) {
            Some(next) => {
                let completed = next
                    .find_task(day, task_id)
                    .is_some_and(|task| task.completed);
                self.commit_plan(Some(next))?;
                Ok(ToggleOutcome::Toggled { completed })
            }
            None if self.options.skip_unmatched_toggle_writes => {
                debug!("event=task_toggle module=service status=skipped reason=no_match day={day}");
                Ok(ToggleOutcome::NoMatch)
            }
            None => {
                let unchanged = StudyPlan::clone(current);
                self.commit_plan(Some(unchanged))?;
                Ok(ToggleOutcome::NoMatch)
            }
        }
    }

    /// Switches the selected variant of the active plan.
    ///
    /// # Errors
    /// - `NoActivePlan` when no plan is active.
    /// - `UnknownIntensity` when `level` is not a variant key.
    pub fn select_intensity(&mut self, level: &str) -> StoreResult<()> {
        let current = self.plan.as_ref().ok_or(StoreError::NoActivePlan)?;
        if current.selected_intensity == level {
            return Ok(());
        }
        let next = current
            .with_selected_intensity(level)
            .ok_or_else(|| StoreError::UnknownIntensity(level.to_string()))?;
        self.commit_plan(Some(next))
    }

    fn commit_profile(&mut self, profile: UserProfile) -> StoreResult<()> {
        self.profile = Arc::new(profile);
        if let Err(err) = self.persistence.save_user(&self.profile) {
            error!("event=state_commit module=service status=error record=user error={err}");
            return Err(err.into());
        }
        Ok(())
    }

    fn commit_plan(&mut self, plan: Option<StudyPlan>) -> StoreResult<()> {
        self.plan = plan.map(Arc::new);
        if let Err(err) = self.persistence.save_plan(self.plan.as_deref()) {
            error!("event=state_commit module=service status=error record=plan error={err}");
            return Err(err.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PlanStore, StoreOptions, ToggleOutcome};
    use crate::repo::kv_repo::{KeyValueStore, MemoryKvStore};
    use crate::repo::state_repo::PLAN_KEY;
    use std::sync::Arc;

    #[test]
    fn toggle_without_plan_is_a_no_op() {
        let mut store = PlanStore::initialize(MemoryKvStore::new(), StoreOptions::default());
        let outcome = store.toggle_task(1, "t1").unwrap();
        assert_eq!(outcome, ToggleOutcome::NoActivePlan);
        assert!(store.plan().is_none());
        assert!(!store.storage().contains(PLAN_KEY).unwrap());
    }

    #[test]
    fn update_name_installs_a_new_snapshot() {
        let mut store = PlanStore::initialize(MemoryKvStore::new(), StoreOptions::default());
        let before = Arc::clone(store.profile());
        store.update_name("Ada").unwrap();
        assert!(!Arc::ptr_eq(&before, store.profile()));
        assert_eq!(before.name, "Guest Student");
        assert_eq!(store.profile().name, "Ada");
    }

    #[test]
    fn select_intensity_requires_active_plan() {
        let mut store = PlanStore::initialize(MemoryKvStore::new(), StoreOptions::default());
        let err = store.select_intensity("light").unwrap_err();
        assert_eq!(err.to_string(), "no active plan");
    }
}
