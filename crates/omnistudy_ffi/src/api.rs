//! FFI use-case API for the UI shell.
//!
//! # Responsibility
//! - Expose the session's state reads and mutation callbacks to Dart via FRB.
//! - Hold one session-scoped store for the lifetime of the process.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Plans cross the boundary as JSON in the persisted record layout.
//! - The session is opened lazily on first use and never torn down.

use log::error;
use omnistudy_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Callback, Intent, IntentOutcome, Session, SqliteKvStore, StoreOptions, StudyPlan,
    ToggleOutcome, View, ViewDescriptor,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

const STATE_DB_FILE_NAME: &str = "omnistudy_state.sqlite3";
static STATE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<Session<SqliteKvStore>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Profile fields shown by the sidebar and dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePayload {
    pub name: String,
    pub plan_type: String,
    pub avatar: String,
}

/// Render payload for the active view.
///
/// Fields outside the view's entitlement are always `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPayload {
    /// Active view id (`dashboard|planner|calendar|assistant`).
    pub view: String,
    pub profile: Option<ProfilePayload>,
    /// Active plan JSON, when the view may read it and a plan exists.
    pub plan_json: Option<String>,
    /// Callbacks the view may invoke (`toggle_task`, `replace_plan`).
    pub callbacks: Vec<String>,
    /// Empty on success; diagnostics otherwise.
    pub message: String,
}

/// Navigation entry for sidebar and compact action bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub id: String,
    pub label: String,
    pub active: bool,
}

/// Generic action response envelope for mutation callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// New `completed` value after a successful toggle.
    pub completed: Option<bool>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            completed: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            completed: None,
            message: message.into(),
        }
    }
}

/// Returns the sidebar profile.
#[flutter_rust_bridge::frb(sync)]
pub fn current_profile() -> Option<ProfilePayload> {
    with_session(|session| {
        let sidebar = session.sidebar();
        ProfilePayload {
            name: sidebar.profile.name.clone(),
            plan_type: sidebar.profile.plan_type.clone(),
            avatar: sidebar.profile.avatar.clone(),
        }
    })
    .ok()
}

/// Lists navigation entries in display order with the active one flagged.
#[flutter_rust_bridge::frb(sync)]
pub fn nav_items() -> Vec<NavItem> {
    let current = with_session(|session| session.current_view()).unwrap_or_default();
    View::ALL
        .iter()
        .map(|view| NavItem {
            id: view.id().to_string(),
            label: view.nav_label().to_string(),
            active: *view == current,
        })
        .collect()
}

/// Switches the active view; unknown ids select the dashboard.
///
/// Returns the id of the view actually selected.
#[flutter_rust_bridge::frb(sync)]
pub fn set_view(view: String) -> String {
    let target = View::from_id(view.as_str());
    match with_session(|session| session.dispatch(Intent::SetView(target))) {
        Ok(Ok(IntentOutcome::ViewChanged(view))) => view.id().to_string(),
        _ => View::default().id().to_string(),
    }
}

/// Builds the render payload for the active view.
#[flutter_rust_bridge::frb(sync)]
pub fn current_view() -> ViewPayload {
    let result = with_session(|session| {
        let descriptor = session.current_component();
        let (profile, plan) = match descriptor {
            ViewDescriptor::Dashboard { profile, plan } => (
                Some(ProfilePayload {
                    name: profile.name.clone(),
                    plan_type: profile.plan_type.clone(),
                    avatar: profile.avatar.clone(),
                }),
                plan,
            ),
            ViewDescriptor::Planner { plan } | ViewDescriptor::Calendar { plan } => (None, plan),
            ViewDescriptor::Assistant => (None, None),
        };
        let plan_json = plan.map(serde_json::to_string).transpose();
        (descriptor.view(), descriptor.callbacks(), profile, plan_json)
    });

    match result {
        Ok((view, callbacks, profile, Ok(plan_json))) => ViewPayload {
            view: view.id().to_string(),
            profile,
            plan_json,
            callbacks: callbacks
                .iter()
                .map(|callback| callback_label(*callback).to_string())
                .collect(),
            message: String::new(),
        },
        Ok((view, _, _, Err(err))) => ViewPayload {
            view: view.id().to_string(),
            profile: None,
            plan_json: None,
            callbacks: Vec::new(),
            message: format!("current_view failed: {err}"),
        },
        Err(err) => ViewPayload {
            view: View::default().id().to_string(),
            profile: None,
            plan_json: None,
            callbacks: Vec::new(),
            message: format!("current_view failed: {err}"),
        },
    }
}

/// Renames the user from the sidebar. The name is stored exactly as given.
#[flutter_rust_bridge::frb(sync)]
pub fn update_name(name: String) -> ActionResponse {
    dispatch_action("update_name", Intent::UpdateName(name))
}

/// Toggles one task of the selected plan variant.
///
/// # FFI contract
/// - `ok=true, completed=Some(_)` when a task flipped.
/// - `ok=true, completed=None` when no plan is active or nothing matched.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_task(day: i64, task_id: String) -> ActionResponse {
    dispatch_action("toggle_task", Intent::ToggleTask { day, task_id })
}

/// Replaces the active plan with a generated plan, or clears it.
///
/// `plan_json = None` clears the plan. Malformed JSON or an invalid plan is
/// rejected and leaves state unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn replace_plan(plan_json: Option<String>) -> ActionResponse {
    let plan = match plan_json.as_deref().map(serde_json::from_str::<StudyPlan>) {
        None => None,
        Some(Ok(plan)) => Some(plan),
        Some(Err(err)) => {
            return ActionResponse::failure(format!("replace_plan failed: invalid plan JSON: {err}"))
        }
    };
    dispatch_action("replace_plan", Intent::ReplacePlan(plan))
}

/// Switches the selected intensity of the active plan.
#[flutter_rust_bridge::frb(sync)]
pub fn select_intensity(level: String) -> ActionResponse {
    dispatch_action(
        "select_intensity",
        Intent::SelectIntensity(level.trim().to_string()),
    )
}

fn dispatch_action(operation: &str, intent: Intent) -> ActionResponse {
    match with_session(|session| session.dispatch(intent)) {
        Ok(Ok(outcome)) => outcome_response(outcome),
        Ok(Err(err)) => ActionResponse::failure(format!("{operation} failed: {err}")),
        Err(err) => ActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn outcome_response(outcome: IntentOutcome) -> ActionResponse {
    match outcome {
        IntentOutcome::ViewChanged(view) => ActionResponse::success(format!("View: {view}.")),
        IntentOutcome::ProfileUpdated => ActionResponse::success("Profile updated."),
        IntentOutcome::PlanReplaced => ActionResponse::success("Plan saved."),
        IntentOutcome::IntensitySelected => ActionResponse::success("Intensity selected."),
        IntentOutcome::TaskToggle(ToggleOutcome::Toggled { completed }) => ActionResponse {
            ok: true,
            completed: Some(completed),
            message: "Task updated.".to_string(),
        },
        IntentOutcome::TaskToggle(ToggleOutcome::NoMatch) => {
            ActionResponse::success("No matching task.")
        }
        IntentOutcome::TaskToggle(ToggleOutcome::NoActivePlan) => {
            ActionResponse::success("No active plan.")
        }
    }
}

fn callback_label(callback: Callback) -> &'static str {
    match callback {
        Callback::ToggleTask => "toggle_task",
        Callback::ReplacePlan => "replace_plan",
    }
}

fn resolve_state_db_path() -> PathBuf {
    STATE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("OMNISTUDY_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STATE_DB_FILE_NAME)
        })
        .clone()
}

fn lock_session() -> MutexGuard<'static, Option<Session<SqliteKvStore>>> {
    // A panic mid-call cannot leave a half-built state tree: commits swap
    // whole snapshots.
    SESSION
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_session<T>(f: impl FnOnce(&mut Session<SqliteKvStore>) -> T) -> Result<T, String> {
    let mut guard = lock_session();
    if guard.is_none() {
        let db_path = resolve_state_db_path();
        let storage = SqliteKvStore::open(&db_path).map_err(|err| {
            error!("event=session_open module=ffi status=error error={err}");
            format!("state DB open failed: {err}")
        })?;
        *guard = Some(Session::start(storage, StoreOptions::default()));
    }

    match guard.as_mut() {
        Some(session) => Ok(f(session)),
        None => Err("session unavailable".to_string()),
    }
}
