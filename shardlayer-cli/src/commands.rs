//! Subcommand implementations.

use serde_json::{Value, json};
use std::error::Error;
use tracing::{debug, info};

use shardlayer::{Database, backend::StorageBackend};

type CommandResult = Result<(), Box<dyn Error>>;

fn parse_json(text: &str, what: &str) -> Result<Value, Box<dyn Error>> {
    serde_json::from_str(text).map_err(|err| format!("invalid {what} JSON: {err}").into())
}

fn print_json(value: &Value) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn collections<B: StorageBackend>(database: &Database<B>) {
    for name in database.collection_names() {
        println!("{name}");
    }
}

pub fn shards<B: StorageBackend>(database: &Database<B>, collection: &str) -> CommandResult {
    let collection = database.get_collection(collection)?;
    let shards = collection.shards();

    for number in shards.numbers() {
        println!("{}\t{}", shards.shard_path(number).display(), shards.count_documents(number));
    }

    Ok(())
}

pub fn dump<B: StorageBackend>(database: &Database<B>, collection: &str) -> CommandResult {
    let collection = database.get_collection(collection)?;
    let shards = collection.shards();

    for number in shards.numbers() {
        println!("# {}", shards.shard_path(number).display());
        match shards.read_shard(number) {
            Some(documents) => print_json(&Value::Array(documents))?,
            None => println!("(unreadable)"),
        }
    }

    Ok(())
}

pub fn find<B: StorageBackend>(
    database: &Database<B>,
    collection: &str,
    filter: &str,
    projection: &str,
    sort: &str,
    limit: usize,
) -> CommandResult {
    let collection = database.get_collection(collection)?;
    let filter = parse_json(filter, "filter")?;
    let projection = parse_json(projection, "projection")?;
    let sort = parse_json(sort, "sort")?;

    let documents = collection.find(&filter, &projection, &sort, limit);
    debug!(count = documents.len(), "found documents");

    print_json(&Value::Array(documents))
}

pub fn insert<B: StorageBackend>(database: &Database<B>, collection: &str, document: &str) -> CommandResult {
    let collection = database.get_collection(collection)?;

    let inserted = match parse_json(document, "document")? {
        Value::Array(documents) => collection.insert_many(documents)?,
        document => {
            collection.insert(document)?;
            1
        }
    };

    info!(collection = collection.name(), inserted, "inserted documents");
    print_json(&json!({ "inserted": inserted }))
}

pub fn update<B: StorageBackend>(database: &Database<B>, collection: &str, filter: &str, update: &str, many: bool) -> CommandResult {
    let collection = database.get_collection(collection)?;
    let filter = parse_json(filter, "filter")?;
    let update = parse_json(update, "update")?;

    let updated = if many {
        collection.update_many(&filter, &update)?
    } else {
        collection.update_one(&filter, &update)?
    };

    print_json(&json!({ "updated": updated }))
}

pub fn delete<B: StorageBackend>(database: &Database<B>, collection: &str, filter: &str, many: bool) -> CommandResult {
    let collection = database.get_collection(collection)?;
    let filter = parse_json(filter, "filter")?;

    let deleted = if many {
        collection.delete_many(&filter)?
    } else {
        collection.delete_one(&filter)?
    };

    print_json(&json!({ "deleted": deleted }))
}
