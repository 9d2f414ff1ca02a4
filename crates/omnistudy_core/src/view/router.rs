//! Current-view state and render descriptors.

use crate::model::plan::StudyPlan;
use crate::model::profile::UserProfile;
use crate::repo::kv_repo::KeyValueStore;
use crate::service::plan_store::PlanStore;
use crate::view::{Callback, View};
use log::debug;
use std::sync::Arc;

/// What the rendering layer needs for the active view.
///
/// Each variant borrows only the state its view is entitled to read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewDescriptor<'a> {
    Dashboard {
        profile: &'a UserProfile,
        plan: Option<&'a StudyPlan>,
    },
    Planner {
        plan: Option<&'a StudyPlan>,
    },
    Calendar {
        plan: Option<&'a StudyPlan>,
    },
    Assistant,
}

impl ViewDescriptor<'_> {
    pub fn view(&self) -> View {
        match self {
            Self::Dashboard { .. } => View::Dashboard,
            Self::Planner { .. } => View::Planner,
            Self::Calendar { .. } => View::Calendar,
            Self::Assistant => View::Assistant,
        }
    }

    pub fn callbacks(&self) -> &'static [Callback] {
        self.view().callbacks()
    }
}

/// Always-visible navigation chrome; may rename the user and switch views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidebarDescriptor<'a> {
    pub current_view: View,
    pub profile: &'a UserProfile,
}

/// Holds the selected view. Switching has no side effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewRouter {
    current: View,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_view(&self) -> View {
        self.current
    }

    pub fn set_view(&mut self, view: View) {
        debug!(
            "event=view_switch module=view status=ok from={} to={}",
            self.current, view
        );
        self.current = view;
    }

    /// Switches by identifier; unknown identifiers select the dashboard.
    pub fn set_view_id(&mut self, id: &str) -> View {
        let view = View::from_id(id);
        self.set_view(view);
        view
    }

    /// Builds the descriptor for the current view from live store state.
    pub fn current_component<'a, S: KeyValueStore>(
        &self,
        store: &'a PlanStore<S>,
    ) -> ViewDescriptor<'a> {
        let plan = store.plan().map(Arc::as_ref);
        match self.current {
            View::Dashboard => ViewDescriptor::Dashboard {
                profile: Arc::as_ref(store.profile()),
                plan,
            },
            View::Planner => ViewDescriptor::Planner { plan },
            View::Calendar => ViewDescriptor::Calendar { plan },
            View::Assistant => ViewDescriptor::Assistant,
        }
    }

    pub fn sidebar<'a, S: KeyValueStore>(&self, store: &'a PlanStore<S>) -> SidebarDescriptor<'a> {
        SidebarDescriptor {
            current_view: self.current,
            profile: Arc::as_ref(store.profile()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewDescriptor, ViewRouter};
    use crate::repo::kv_repo::MemoryKvStore;
    use crate::service::plan_store::{PlanStore, StoreOptions};
    use crate::view::{Callback, View};

    #[test]
    fn starts_on_dashboard_with_profile() {
        let store = PlanStore::initialize(MemoryKvStore::new(), StoreOptions::default());
        let router = ViewRouter::new();
        assert_eq!(router.current_view(), View::Dashboard);
        match router.current_component(&store) {
            ViewDescriptor::Dashboard { profile, plan } => {
                assert_eq!(profile.name, "Guest Student");
                assert!(plan.is_none());
            }
            other => panic!("unexpected descriptor: {other:?}"),
        }
    }

    #[test]
    fn every_view_reachable_from_every_other() {
        let store = PlanStore::initialize(MemoryKvStore::new(), StoreOptions::default());
        let mut router = ViewRouter::new();
        for from in View::ALL {
            for to in View::ALL {
                router.set_view(from);
                router.set_view(to);
                assert_eq!(router.current_component(&store).view(), to);
            }
        }
    }

    #[test]
    fn unknown_id_falls_back_to_dashboard() {
        let mut router = ViewRouter::new();
        router.set_view(View::Calendar);
        assert_eq!(router.set_view_id("reports"), View::Dashboard);
        assert_eq!(router.current_view(), View::Dashboard);
    }

    #[test]
    fn descriptors_expose_view_callbacks() {
        let store = PlanStore::initialize(MemoryKvStore::new(), StoreOptions::default());
        let mut router = ViewRouter::new();

        router.set_view(View::Planner);
        let planner = router.current_component(&store);
        assert_eq!(
            planner.callbacks(),
            &[Callback::ToggleTask, Callback::ReplacePlan]
        );

        router.set_view(View::Assistant);
        assert_eq!(router.current_component(&store), ViewDescriptor::Assistant);

        let sidebar = router.sidebar(&store);
        assert_eq!(sidebar.current_view, View::Assistant);
        assert_eq!(sidebar.profile.name, "Guest Student");
    }
}
