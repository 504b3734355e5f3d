#![cfg(feature = "fs")]

use serde_json::{Value, json};
use shardlayer::{error::DocumentStoreError, fs::LocalStorage, prelude::*};
use std::{fs, path::Path};
use tempfile::tempdir;

const SCHEMA: &str = r#"{
    "name": "logs",
    "tuples_limit": 2,
    "structure": {
        "events": {"host": "string"},
        "alerts": {}
    }
}"#;

fn write_schema(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("schema.json");
    fs::write(&path, SCHEMA).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn shards_are_pretty_printed_json_files() {
    let dir = tempdir().unwrap();
    let data_root = dir.path().join("data");
    let database = Database::open_with_schema_file(LocalStorage::new(), write_schema(dir.path()), "logs", &data_root).unwrap();

    let events_dir = data_root.join("logs/events");
    assert_eq!(fs::read_to_string(events_dir.join("1.json")).unwrap(), "[]");
    assert_eq!(fs::read_to_string(data_root.join("logs/alerts/1.json")).unwrap(), "[]");

    database.get_collection("events").unwrap().insert(json!({"_id": "a", "host": "web-1"})).unwrap();

    assert_eq!(
        fs::read_to_string(events_dir.join("1.json")).unwrap(),
        "[\n    {\n        \"_id\": \"a\",\n        \"host\": \"web-1\"\n    }\n]"
    );
}

#[test]
fn documents_survive_reopening() {
    let dir = tempdir().unwrap();
    let schema_path = write_schema(dir.path());
    let data_root = dir.path().join("data");

    {
        let database = Database::open_with_schema_file(LocalStorage::new(), &schema_path, "logs", &data_root).unwrap();
        let events = database.get_collection("events").unwrap();
        for id in ["a", "b", "c"] {
            events.insert(json!({"_id": id, "host": "web-1"})).unwrap();
        }
    }

    let database = Database::open_with_schema_file(LocalStorage::new().with_sync(true), &schema_path, "logs", &data_root).unwrap();
    let events = database.get_collection("events").unwrap();

    assert_eq!(read_json(&data_root.join("logs/events/1.json")), json!([{"_id": "a", "host": "web-1"}, {"_id": "b", "host": "web-1"}]));
    assert_eq!(read_json(&data_root.join("logs/events/2.json")), json!([{"_id": "c", "host": "web-1"}]));
    assert_eq!(events.count(&json!({"host": "web-1"})), 3);
    assert!(matches!(
        events.insert(json!({"_id": "b"})),
        Err(DocumentStoreError::DocumentAlreadyExists(..))
    ));
}

#[test]
fn crud_on_disk() {
    let dir = tempdir().unwrap();
    let data_root = dir.path().join("data");
    let database = Database::open_with_schema_file(LocalStorage::new(), write_schema(dir.path()), "logs", &data_root).unwrap();
    let events = database.get_collection("events").unwrap();

    events
        .insert_many(vec![json!({"_id": "a", "key": 1}), json!({"_id": "b", "key": 2}), json!({"_id": "c", "key": 3})])
        .unwrap();

    assert_eq!(events.update_one(&json!({"_id": "a"}), &json!({"$set": {"key": 99}})).unwrap(), 1);
    assert_eq!(events.update_one(&json!({"_id": "a"}), &json!({"$set": {"key": 99}})).unwrap(), 1);

    let over_two = events.find(&json!({"key": {"$gt": 2}}), &json!({}), &json!({}), 0);
    assert_eq!(over_two, vec![json!({"_id": "a", "key": 99}), json!({"_id": "c", "key": 3})]);

    assert_eq!(events.delete_many(&json!({})).unwrap(), 3);
    assert_eq!(fs::read_to_string(data_root.join("logs/events/1.json")).unwrap(), "[]");
    assert_eq!(fs::read_to_string(data_root.join("logs/events/2.json")).unwrap(), "[]");
}

#[test]
fn hand_corrupted_shards_are_skipped() {
    let dir = tempdir().unwrap();
    let data_root = dir.path().join("data");
    let database = Database::open_with_schema_file(LocalStorage::new(), write_schema(dir.path()), "logs", &data_root).unwrap();
    let events = database.get_collection("events").unwrap();

    events.insert_many(vec![json!({"_id": "a"}), json!({"_id": "b"}), json!({"_id": "c"})]).unwrap();
    fs::write(data_root.join("logs/events/1.json"), "[{\"_id\": \"a\"},").unwrap();

    let found = events.find(&json!({}), &json!({}), &json!({}), 0);
    assert_eq!(found, vec![json!({"_id": "c"})]);
    assert_eq!(fs::read_to_string(data_root.join("logs/events/1.json")).unwrap(), "[{\"_id\": \"a\"},");
}

#[test]
fn missing_schema_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let result = Database::open_with_schema_file(LocalStorage::new(), dir.path().join("nope.json"), "logs", dir.path());

    assert!(matches!(result, Err(DocumentStoreError::Io { .. })));
}

#[test]
fn invalid_schema_file_is_rejected() {
    let dir = tempdir().unwrap();
    let schema_path = dir.path().join("schema.json");
    fs::write(&schema_path, r#"{"name": "logs", "tuples_limit": 0, "structure": {}}"#).unwrap();

    let result = Database::open_with_schema_file(LocalStorage::new(), &schema_path, "logs", dir.path());
    assert!(matches!(result, Err(DocumentStoreError::Validation(_))));

    fs::write(&schema_path, "not json").unwrap();
    let result = Database::open_with_schema_file(LocalStorage::new(), &schema_path, "logs", dir.path());
    assert!(matches!(result, Err(DocumentStoreError::Serialization(_))));
}
