//! View selection and render dispatch.
//!
//! # Responsibility
//! - Identify the app's top-level views.
//! - Hand each view exactly the state subset and callbacks it may use.
//!
//! # Invariants
//! - The router starts on `View::Dashboard`.
//! - Unknown view identifiers resolve to `View::Dashboard`.

pub mod router;

use log::debug;
use std::fmt::{Display, Formatter};

/// Top-level app views. Any view is reachable from any other in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Dashboard,
    Planner,
    Calendar,
    Assistant,
}

impl View {
    /// Navigation order used by the sidebar and the mobile action bar.
    pub const ALL: [View; 4] = [
        View::Dashboard,
        View::Planner,
        View::Calendar,
        View::Assistant,
    ];

    /// Stable identifier exchanged with the UI shell.
    pub fn id(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Planner => "planner",
            Self::Calendar => "calendar",
            Self::Assistant => "assistant",
        }
    }

    /// Resolves an identifier, falling back to `Dashboard` for unknown input.
    pub fn from_id(id: &str) -> Self {
        match id.trim() {
            "dashboard" => Self::Dashboard,
            "planner" => Self::Planner,
            "calendar" => Self::Calendar,
            "assistant" => Self::Assistant,
            _ => {
                debug!("event=view_resolve module=view status=fallback view=dashboard");
                Self::Dashboard
            }
        }
    }

    /// Short label for compact navigation.
    pub fn nav_label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dash",
            Self::Planner => "Plan",
            Self::Calendar => "Cal",
            Self::Assistant => "AI",
        }
    }

    /// Mutation callbacks this view is entitled to invoke.
    pub fn callbacks(self) -> &'static [Callback] {
        match self {
            Self::Dashboard => &[Callback::ToggleTask],
            Self::Planner => &[Callback::ToggleTask, Callback::ReplacePlan],
            Self::Calendar | Self::Assistant => &[],
        }
    }

    pub fn permits(self, callback: Callback) -> bool {
        self.callbacks().contains(&callback)
    }
}

impl Display for View {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// View-bound mutation callbacks of the plan state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback {
    ToggleTask,
    ReplacePlan,
}

#[cfg(test)]
mod tests {
    use super::{Callback, View};

    #[test]
    fn ids_round_trip_and_unknown_falls_back() {
        for view in View::ALL {
            assert_eq!(View::from_id(view.id()), view);
        }
        assert_eq!(View::from_id("settings"), View::Dashboard);
        assert_eq!(View::from_id(""), View::Dashboard);
    }

    #[test]
    fn callback_entitlements_per_view() {
        assert!(View::Dashboard.permits(Callback::ToggleTask));
        assert!(!View::Dashboard.permits(Callback::ReplacePlan));
        assert!(View::Planner.permits(Callback::ReplacePlan));
        assert!(View::Calendar.callbacks().is_empty());
        assert!(View::Assistant.callbacks().is_empty());
    }

    #[test]
    fn nav_labels_match_action_bar() {
        let labels: Vec<_> = View::ALL.iter().map(|view| view.nav_label()).collect();
        assert_eq!(labels, ["Dash", "Plan", "Cal", "AI"]);
    }
}
