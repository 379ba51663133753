use goteam::manager::{AddKind, LocationManager};
use goteam::model::Location;
use goteam::remote::{MemoryStore, RawRecord, RecordClass};
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_same_coordinates_same_id() {
    let a = Location::new(48.8584, 2.2945).with_title("Eiffel Tower");
    let b = Location::new(48.8584, 2.2945).with_title("Tour Eiffel");
    assert_eq!(a.id(), b.id());
    assert_eq!(Location::new(-0.0, 0.0).id(), Location::new(0.0, -0.0).id());
    assert_ne!(a.id(), Location::new(48.8584, 2.2946).id());
}

#[tokio::test]
async fn test_duplicate_coordinates_become_an_edit() {
    let store = Arc::new(MemoryStore::new(RecordClass::Location));
    let mut manager = LocationManager::new(store.clone(), "alice");

    let first = Location::new(48.8584, 2.2945).with_title("Eiffel Tower");
    assert_eq!(manager.classify(&first), AddKind::Create);
    let (kind, handle) = manager.add(first);
    assert_eq!(kind, AddKind::Create);
    handle.await.unwrap();

    let second = Location::new(48.8584, 2.2945)
        .with_title("Tour Eiffel")
        .with_subtitle("Paris");
    assert_eq!(manager.classify(&second), AddKind::Edit);
    let id = second.id().to_string();
    let (kind, handle) = manager.add(second);
    assert_eq!(kind, AddKind::Edit);
    handle.await.unwrap();

    assert_eq!(manager.len(), 1);
    let stored = manager.find(&id).unwrap();
    assert_eq!(stored.title.as_deref(), Some("Tour Eiffel"));
    assert_eq!(stored.subtitle.as_deref(), Some("Paris"));

    let records = store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get_str("title"), Some("Tour Eiffel"));
    assert_eq!(records[0].get_str("locationID"), Some(id.as_str()));
}

#[tokio::test]
async fn test_fetch_update_and_delete() {
    let store = Arc::new(MemoryStore::new(RecordClass::Location));
    let mut writer = LocationManager::new(store.clone(), "alice");
    writer.add(Location::new(1.0, 2.0).with_title("Home")).1.await.unwrap();
    writer.add(Location::new(3.0, 4.0).with_title("Office")).1.await.unwrap();

    let mut reader = LocationManager::new(store.clone(), "alice");
    assert!(reader.all_locations(false).await.unwrap().is_empty());
    assert_eq!(reader.all_locations(true).await.unwrap().len(), 2);

    let mut renamed = reader.find(&Location::coordinate_id(3.0, 4.0)).cloned().unwrap();
    renamed.title = Some("HQ".to_string());
    reader.update(renamed).unwrap().await.unwrap();
    assert!(reader.update(Location::new(9.0, 9.0)).is_none());

    let (removed, handle) = reader.delete(&Location::coordinate_id(1.0, 2.0)).unwrap();
    handle.await.unwrap();
    assert_eq!(removed.title.as_deref(), Some("Home"));
    assert_eq!(reader.len(), 1);

    let mut fresh = LocationManager::new(store, "alice");
    let all = fresh.all_locations(true).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title.as_deref(), Some("HQ"));
}

#[tokio::test]
async fn test_other_users_locations_are_invisible() {
    let store = Arc::new(MemoryStore::new(RecordClass::Location));
    let mut bob = LocationManager::new(store.clone(), "bob");
    bob.add(Location::new(5.0, 5.0).with_title("Bob's place")).1.await.unwrap();

    let mut alice = LocationManager::new(store, "alice");
    assert!(alice.all_locations(true).await.unwrap().is_empty());
    assert!(alice.is_empty());
}

#[tokio::test]
async fn test_records_without_stored_id_are_keyed_by_coordinates() {
    let seeded: RawRecord = serde_json::from_value(json!({
        "UserName": "alice",
        "latitude": 1.0,
        "longitude": 2.0,
        "title": "Home"
    }))
    .unwrap();
    let store = Arc::new(MemoryStore::with_records(RecordClass::Location, vec![seeded]));
    let mut manager = LocationManager::new(store.clone(), "alice");
    assert_eq!(manager.all_locations(true).await.unwrap().len(), 1);

    let (kind, handle) = manager.add(Location::new(1.0, 2.0).with_title("Renamed"));
    assert_eq!(kind, AddKind::Edit);
    handle.await.unwrap();
    let records = store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get_str("title"), Some("Renamed"));

    let (_, handle) = manager.delete(&Location::coordinate_id(1.0, 2.0)).unwrap();
    handle.await.unwrap();
    assert!(store.is_empty().await);

    let mut fresh = LocationManager::new(store, "alice");
    assert!(fresh.all_locations(true).await.unwrap().is_empty());
}
