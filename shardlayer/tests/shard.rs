use serde_json::json;
use shardlayer::{memory::InMemoryStorage, prelude::*, shard::ShardStore};
use std::path::Path;

fn store_dir() -> &'static Path {
    Path::new("data/db/events")
}

#[test]
fn init_creates_the_directory_and_first_shard() {
    let storage = InMemoryStorage::new();
    let shards = ShardStore::new(store_dir(), &storage);

    assert_eq!(shards.shard_count(), 0);
    shards.init().unwrap();

    assert!(storage.is_dir(store_dir()));
    assert_eq!(shards.shard_count(), 1);
    assert_eq!(storage.contents(&store_dir().join("1.json")), Some(b"[]".to_vec()));

    // A second init keeps existing content.
    shards.write_shard(1, &[json!({"_id": "a"})]).unwrap();
    shards.init().unwrap();
    assert_eq!(shards.count_documents(1), 1);
}

#[test]
fn shard_paths_are_numbered() {
    let storage = InMemoryStorage::new();
    let shards = ShardStore::new(store_dir(), &storage);

    assert_eq!(shards.dir(), store_dir());
    assert_eq!(shards.shard_path(7), Path::new("data/db/events/7.json"));
}

#[test]
fn numbering_stops_at_the_first_gap() {
    let storage = InMemoryStorage::new();
    let shards = ShardStore::new(store_dir(), &storage);
    shards.init().unwrap();
    shards.write_shard(2, &[]).unwrap();
    shards.write_shard(4, &[]).unwrap();

    assert_eq!(shards.numbers().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(shards.last_shard_number(), 2);
    assert_eq!(shards.shard_paths().len(), 2);
}

#[test]
fn insert_target_rolls_over_full_shards() {
    let storage = InMemoryStorage::new();
    let shards = ShardStore::new(store_dir(), &storage);
    shards.init().unwrap();

    assert_eq!(shards.insert_target(2).unwrap(), 1);
    assert_eq!(shards.append(json!({"_id": "a"}), 2).unwrap(), 1);
    assert_eq!(shards.append(json!({"_id": "b"}), 2).unwrap(), 1);
    assert_eq!(shards.shard_count(), 1);

    assert_eq!(shards.insert_target(2).unwrap(), 2);
    assert_eq!(shards.shard_count(), 2);
    assert_eq!(shards.count_documents(2), 0);
    assert_eq!(shards.append(json!({"_id": "c"}), 2).unwrap(), 2);
}

#[test]
fn insert_target_creates_a_missing_first_shard() {
    let storage = InMemoryStorage::new();
    let shards = ShardStore::new(store_dir(), &storage);
    storage.create_dir_all(store_dir()).unwrap();

    assert_eq!(shards.insert_target(5).unwrap(), 1);
    assert!(shards.exists(1));
}

#[test]
fn unreadable_shards_read_as_none() {
    let storage = InMemoryStorage::new();
    let shards = ShardStore::new(store_dir(), &storage);
    shards.init().unwrap();

    storage.write(&shards.shard_path(1), b"[1, 2").unwrap();
    assert_eq!(shards.read_shard(1), None);
    assert_eq!(shards.count_documents(1), 0);

    storage.write(&shards.shard_path(1), b"{}").unwrap();
    assert_eq!(shards.read_shard(1), None);

    assert_eq!(shards.read_shard(9), None);
    assert_eq!(shards.count_documents(9), 0);
}

#[test]
fn shards_are_written_with_four_space_indent() {
    let storage = InMemoryStorage::new();
    let shards = ShardStore::new(store_dir(), &storage);
    shards.init().unwrap();

    shards.write_shard(1, &[json!({"_id": "a", "n": [1]})]).unwrap();

    let text = String::from_utf8(storage.contents(&shards.shard_path(1)).unwrap()).unwrap();
    assert_eq!(text, "[\n    {\n        \"_id\": \"a\",\n        \"n\": [\n            1\n        ]\n    }\n]");
}
