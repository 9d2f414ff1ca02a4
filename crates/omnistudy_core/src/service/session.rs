//! Session shell coupling the plan state store with the view router.
//!
//! # Responsibility
//! - Route UI intents to store mutations and view switches.
//! - Enforce which view may invoke which store callback.
//!
//! # Invariants
//! - One session owns exactly one store; sessions never share state.
//! - Sidebar intents (`SetView`, `UpdateName`) are accepted from any view.

use crate::model::plan::StudyPlan;
use crate::repo::kv_repo::KeyValueStore;
use crate::service::plan_store::{PlanStore, StoreError, StoreOptions, ToggleOutcome};
use crate::view::router::{SidebarDescriptor, ViewDescriptor, ViewRouter};
use crate::view::{Callback, View};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum SessionError {
    /// The active view is not entitled to the requested callback.
    NotPermitted { view: View, callback: Callback },
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPermitted { view, callback } => {
                write!(f, "view `{view}` may not invoke {callback:?}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotPermitted { .. } => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// User interaction forwarded by presentation components.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetView(View),
    UpdateName(String),
    ToggleTask { day: i64, task_id: String },
    ReplacePlan(Option<StudyPlan>),
    /// Planner intensity switch; gated like `ReplacePlan`.
    SelectIntensity(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    ViewChanged(View),
    ProfileUpdated,
    PlanReplaced,
    TaskToggle(ToggleOutcome),
    IntensitySelected,
}

/// One user session: a plan store plus the current view.
pub struct Session<S: KeyValueStore> {
    store: PlanStore<S>,
    router: ViewRouter,
}

impl<S: KeyValueStore> Session<S> {
    /// Initializes the store from `storage` and starts on the dashboard.
    pub fn start(storage: S, options: StoreOptions) -> Self {
        Self {
            store: PlanStore::initialize(storage, options),
            router: ViewRouter::new(),
        }
    }

    pub fn store(&self) -> &PlanStore<S> {
        &self.store
    }

    pub fn current_view(&self) -> View {
        self.router.current_view()
    }

    pub fn current_component(&self) -> ViewDescriptor<'_> {
        self.router.current_component(&self.store)
    }

    pub fn sidebar(&self) -> SidebarDescriptor<'_> {
        self.router.sidebar(&self.store)
    }

    /// Applies one intent.
    ///
    /// # Errors
    /// - `NotPermitted` when a view-bound intent comes from the wrong view;
    ///   state is unchanged.
    /// - `Store` for store-level failures.
    pub fn dispatch(&mut self, intent: Intent) -> SessionResult<IntentOutcome> {
        match intent {
            Intent::SetView(view) => {
                self.router.set_view(view);
                Ok(IntentOutcome::ViewChanged(view))
            }
            Intent::UpdateName(name) => {
                self.store.update_name(name)?;
                Ok(IntentOutcome::ProfileUpdated)
            }
            Intent::ToggleTask { day, task_id } => {
                self.ensure_permitted(Callback::ToggleTask)?;
                let outcome = self.store.toggle_task(day, &task_id)?;
                Ok(IntentOutcome::TaskToggle(outcome))
            }
            Intent::ReplacePlan(plan) => {
                self.ensure_permitted(Callback::ReplacePlan)?;
                self.store.replace_plan(plan)?;
                Ok(IntentOutcome::PlanReplaced)
            }
            Intent::SelectIntensity(level) => {
                self.ensure_permitted(Callback::ReplacePlan)?;
                self.store.select_intensity(&level)?;
                Ok(IntentOutcome::IntensitySelected)
            }
        }
    }

    fn ensure_permitted(&self, callback: Callback) -> SessionResult<()> {
        let view = self.router.current_view();
        if view.permits(callback) {
            return Ok(());
        }
        warn!("event=intent_dispatch module=service status=rejected view={view} callback={callback:?}");
        Err(SessionError::NotPermitted { view, callback })
    }
}
