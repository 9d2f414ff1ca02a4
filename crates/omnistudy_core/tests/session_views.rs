mod common;

use omnistudy_core::{
    Callback, Intent, IntentOutcome, MemoryKvStore, Session, SessionError, StoreOptions,
    ToggleOutcome, View, ViewDescriptor,
};

fn session() -> Session<MemoryKvStore> {
    Session::start(MemoryKvStore::new(), StoreOptions::default())
}

#[test]
fn planner_generates_plan_and_dashboard_sees_it() {
    let mut session = session();
    session.dispatch(Intent::SetView(View::Planner)).unwrap();
    let outcome = session
        .dispatch(Intent::ReplacePlan(Some(common::moderate_plan())))
        .unwrap();
    assert_eq!(outcome, IntentOutcome::PlanReplaced);

    session.dispatch(Intent::SetView(View::Dashboard)).unwrap();
    match session.current_component() {
        ViewDescriptor::Dashboard { profile, plan } => {
            assert_eq!(profile.name, "Guest Student");
            assert_eq!(plan.unwrap().selected_intensity, "moderate");
        }
        other => panic!("unexpected descriptor: {other:?}"),
    }
}

#[test]
fn dashboard_toggles_tasks() {
    let mut session = session();
    session.dispatch(Intent::SetView(View::Planner)).unwrap();
    session
        .dispatch(Intent::ReplacePlan(Some(common::moderate_plan())))
        .unwrap();
    session.dispatch(Intent::SetView(View::Dashboard)).unwrap();

    let outcome = session
        .dispatch(Intent::ToggleTask {
            day: 3,
            task_id: "t1".to_string(),
        })
        .unwrap();
    assert_eq!(
        outcome,
        IntentOutcome::TaskToggle(ToggleOutcome::Toggled { completed: true })
    );
}

#[test]
fn calendar_is_read_only() {
    let mut session = session();
    session.dispatch(Intent::SetView(View::Calendar)).unwrap();

    let err = session
        .dispatch(Intent::ToggleTask {
            day: 3,
            task_id: "t1".to_string(),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::NotPermitted {
            view: View::Calendar,
            callback: Callback::ToggleTask,
        }
    ));

    let err = session
        .dispatch(Intent::ReplacePlan(Some(common::moderate_plan())))
        .unwrap_err();
    assert!(matches!(err, SessionError::NotPermitted { .. }));
    assert!(session.store().plan().is_none());
    assert_eq!(
        session.current_component(),
        ViewDescriptor::Calendar { plan: None }
    );
}

#[test]
fn dashboard_cannot_replace_plan() {
    let mut session = session();
    let err = session.dispatch(Intent::ReplacePlan(None)).unwrap_err();
    assert!(matches!(
        err,
        SessionError::NotPermitted {
            view: View::Dashboard,
            callback: Callback::ReplacePlan,
        }
    ));
}

#[test]
fn sidebar_renames_from_any_view() {
    let mut session = session();
    session.dispatch(Intent::SetView(View::Assistant)).unwrap();
    session
        .dispatch(Intent::UpdateName("Ada".to_string()))
        .unwrap();

    let sidebar = session.sidebar();
    assert_eq!(sidebar.current_view, View::Assistant);
    assert_eq!(sidebar.profile.name, "Ada");
    assert_eq!(session.current_component(), ViewDescriptor::Assistant);
}

#[test]
fn planner_switches_intensity() {
    let mut session = session();
    session.dispatch(Intent::SetView(View::Planner)).unwrap();
    session
        .dispatch(Intent::ReplacePlan(Some(common::moderate_plan())))
        .unwrap();
    session
        .dispatch(Intent::SelectIntensity("light".to_string()))
        .unwrap();

    match session.current_component() {
        ViewDescriptor::Planner { plan } => {
            let plan = plan.unwrap();
            assert_eq!(plan.selected_intensity, "light");
            assert_eq!(plan.selected_variant().unwrap().progress().total, 1);
        }
        other => panic!("unexpected descriptor: {other:?}"),
    }
}
