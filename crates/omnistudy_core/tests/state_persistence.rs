mod common;

use omnistudy_core::{
    KeyValueStore, MemoryKvStore, SqliteKvStore, StatePersistence, UserProfile, PLAN_KEY,
    USER_KEY,
};
use serde_json::json;

#[test]
fn plan_round_trips_through_sqlite() {
    let persistence = StatePersistence::new(SqliteKvStore::open_in_memory().unwrap());
    let plan = common::moderate_plan();

    persistence.save_plan(Some(&plan)).unwrap();
    assert_eq!(persistence.load_plan(), Some(plan));
}

#[test]
fn saved_plan_uses_camel_case_layout() {
    let persistence = StatePersistence::new(MemoryKvStore::new());
    persistence.save_plan(Some(&common::moderate_plan())).unwrap();

    let raw = persistence.storage().get(PLAN_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["selectedIntensity"], json!("moderate"));
    assert_eq!(value["title"], json!("Linear Algebra Finals"));
    assert!(value["variants"]["light"]["schedule"].is_array());
}

#[test]
fn saving_absent_plan_deletes_the_record() {
    let persistence = StatePersistence::new(SqliteKvStore::open_in_memory().unwrap());
    persistence.save_plan(Some(&common::moderate_plan())).unwrap();

    persistence.save_plan(None).unwrap();
    assert_eq!(persistence.load_plan(), None);
    assert!(!persistence.storage().contains(PLAN_KEY).unwrap());

    let rows: i64 = persistence
        .storage()
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM kv_entries WHERE key = ?1;",
            [PLAN_KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn legacy_plan_without_variants_loads_as_absent() {
    let store = MemoryKvStore::new();
    store
        .set(
            PLAN_KEY,
            &json!({
                "schedule": [{ "day": 1, "tasks": [{ "id": "t1", "completed": true }] }]
            })
            .to_string(),
        )
        .unwrap();

    let persistence = StatePersistence::new(store);
    assert_eq!(persistence.load_plan(), None);
}

#[test]
fn null_plan_record_loads_as_absent() {
    let store = MemoryKvStore::new();
    store.set(PLAN_KEY, "null").unwrap();
    assert_eq!(StatePersistence::new(store).load_plan(), None);
}

#[test]
fn plan_with_dangling_selection_loads_as_absent() {
    let mut plan = common::moderate_plan();
    plan.selected_intensity = "intense".to_string();

    let store = MemoryKvStore::new();
    store
        .set(PLAN_KEY, &serde_json::to_string(&plan).unwrap())
        .unwrap();
    assert_eq!(StatePersistence::new(store).load_plan(), None);
}

#[test]
fn user_round_trips_and_defaults_when_missing() {
    let persistence = StatePersistence::new(SqliteKvStore::open_in_memory().unwrap());
    assert_eq!(persistence.load_user(), UserProfile::default());

    let profile = UserProfile::default().with_name("Ada Lovelace");
    persistence.save_user(&profile).unwrap();
    assert_eq!(persistence.load_user(), profile);

    let raw = persistence.storage().get(USER_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        json!({
            "name": "Ada Lovelace",
            "planType": "Free Plan",
            "avatar": "https://picsum.photos/seed/omni/40/40"
        })
    );
}

#[test]
fn unknown_user_fields_survive_save() {
    let store = MemoryKvStore::new();
    store
        .set(
            USER_KEY,
            r#"{"name":"Ada","planType":"Free Plan","avatar":"a.png","theme":{"dark":true}}"#,
        )
        .unwrap();
    let persistence = StatePersistence::new(store);

    let profile = persistence.load_user();
    assert_eq!(profile.details["theme"], json!({ "dark": true }));

    persistence.save_user(&profile).unwrap();
    assert_eq!(persistence.load_user(), profile);
    let raw = persistence.storage().get(USER_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["theme"], json!({ "dark": true }));
}
