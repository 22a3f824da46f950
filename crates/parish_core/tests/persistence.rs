//! Persistence integration tests across storage backends.

use parish_core::{Entity, Kind, Store, StoreConfig};
use serde_json::json;
use tempfile::tempdir;

fn entity(value: serde_json::Value) -> Entity {
    Entity::from_map(value.as_object().unwrap().clone()).unwrap()
}

fn sample_member(id: &str) -> Entity {
    entity(json!({
        "type_tag": "member",
        "id": id,
        "first_name": "Ama",
        "last_name": "Mensah",
        "email": "ama@example.com",
        "phone_number": "0244123456",
    }))
}

fn sample_event(id: &str) -> Entity {
    entity(json!({
        "type_tag": "event",
        "id": id,
        "name": "Harvest Service",
        "start_date": "2026-09-06",
        "start_time": "09:00:00",
        "location": "Main auditorium",
    }))
}

#[test]
fn file_backend_roundtrips_after_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("parish.json");

    let store = Store::open(StoreConfig::file(&path)).unwrap();
    let member = store.add(sample_member("m-1")).unwrap();
    let event = store.add(sample_event("e-1")).unwrap();
    store.persist().unwrap();
    store.shutdown().unwrap();

    let reopened = Store::open(StoreConfig::file(&path)).unwrap();
    assert_eq!(reopened.count(None), 2);
    assert_eq!(reopened.get(Kind::Member, "m-1").unwrap(), member);
    assert_eq!(reopened.get(Kind::Event, "e-1").unwrap(), event);
}

#[test]
fn sqlite_backend_roundtrips_after_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("parish.db");

    let store = Store::open(StoreConfig::sqlite(&path)).unwrap();
    let member = store.add(sample_member("m-1")).unwrap();
    let event = store.add(sample_event("e-1")).unwrap();
    store.persist().unwrap();
    store.shutdown().unwrap();

    let reopened = Store::open(StoreConfig::sqlite(&path)).unwrap();
    assert_eq!(reopened.count(None), 2);
    assert_eq!(reopened.get(Kind::Member, "m-1").unwrap(), member);
    assert_eq!(reopened.get(Kind::Event, "e-1").unwrap(), event);
}

#[test]
fn unpersisted_file_changes_are_lost() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("parish.json");

    let store = Store::open(StoreConfig::file(&path)).unwrap();
    store.add(sample_member("m-1")).unwrap();
    store.persist().unwrap();
    store.add(sample_member("m-2")).unwrap();
    drop(store);

    let reopened = Store::open(StoreConfig::file(&path)).unwrap();
    assert!(reopened.get(Kind::Member, "m-1").is_some());
    assert!(reopened.get(Kind::Member, "m-2").is_none());
}

#[test]
fn unpersisted_sqlite_changes_roll_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("parish.db");

    let store = Store::open(StoreConfig::sqlite(&path)).unwrap();
    store.add(sample_member("m-1")).unwrap();
    store.persist().unwrap();
    store.add(sample_member("m-2")).unwrap();
    drop(store);

    let reopened = Store::open(StoreConfig::sqlite(&path)).unwrap();
    assert!(reopened.get(Kind::Member, "m-1").is_some());
    assert!(reopened.get(Kind::Member, "m-2").is_none());
}

#[test]
fn removal_survives_reopen_on_both_backends() {
    let dir = tempdir().unwrap();
    for config in [
        StoreConfig::file(dir.path().join("parish.json")),
        StoreConfig::sqlite(dir.path().join("parish.db")),
    ] {
        let store = Store::open(config.clone()).unwrap();
        let member = store.add(sample_member("m-1")).unwrap();
        store.add(sample_member("m-2")).unwrap();
        store.persist().unwrap();
        store.remove(&member).unwrap();
        store.persist().unwrap();
        store.shutdown().unwrap();

        let reopened = Store::open(config).unwrap();
        assert!(reopened.get(Kind::Member, "m-1").is_none());
        assert!(reopened.get(Kind::Member, "m-2").is_some());
        assert_eq!(reopened.count(Some(Kind::Member)), 1);
    }
}

#[test]
fn reload_skips_unknown_kinds_in_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("parish.json");

    let snapshot = json!({
        "department.d-1": {
            "type_tag": "department",
            "id": "d-1",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
            "name": "Media",
            "description": "",
        },
        "sermon.s-1": {
            "type_tag": "sermon",
            "id": "s-1",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
            "title": "On patience",
        },
    });
    std::fs::write(&path, serde_json::to_vec_pretty(&snapshot).unwrap()).unwrap();

    let store = Store::open(StoreConfig::file(&path)).unwrap();
    assert_eq!(store.count(None), 1);
    assert!(store.get(Kind::Department, "d-1").is_some());
}

#[test]
fn sqlite_reset_discards_existing_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("parish.db");

    let store = Store::open(StoreConfig::sqlite(&path)).unwrap();
    store.add(sample_member("m-1")).unwrap();
    store.persist().unwrap();
    store.shutdown().unwrap();

    let reset = Store::open(StoreConfig::sqlite(&path).with_reset(true)).unwrap();
    assert_eq!(reset.count(None), 0);
}

#[test]
fn file_reset_discards_existing_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("parish.json");

    let store = Store::open(StoreConfig::file(&path)).unwrap();
    store.add(sample_member("m-1")).unwrap();
    store.persist().unwrap();
    store.shutdown().unwrap();

    let reset = Store::open(StoreConfig::file(&path).with_reset(true)).unwrap();
    assert_eq!(reset.count(None), 0);
}

#[test]
fn minimal_member_map_fills_defaults() {
    let store = Store::open(StoreConfig::memory()).unwrap();
    let added = store.add(sample_member("m-1")).unwrap();

    match added {
        Entity::Member(m) => {
            assert_eq!(m.status, parish_core::model::MemberStatus::Active);
            assert_eq!(m.role, parish_core::model::MemberRole::Member);
            assert_eq!(m.date_joined, chrono::Utc::now().date_naive());
            assert_eq!(m.meta.created_at, m.meta.updated_at);
        }
        other => panic!("unexpected entity: {other:?}"),
    }
}
