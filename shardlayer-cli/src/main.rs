//! Shardlayer CLI
//!
//! Command-line tools for inspecting and editing a shardlayer database.
//!
//! # Commands
//!
//! - `collections` - List the collections declared by the schema
//! - `shards` - List the shard files of a collection
//! - `dump` - Print the content of every shard of a collection
//! - `find` - Query a collection
//! - `insert` - Insert one document or an array of documents
//! - `update` - Apply an update to matching documents
//! - `delete` - Delete matching documents

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use shardlayer::{Database, fs::LocalStorage};

/// Shardlayer command-line database tools.
#[derive(Parser)]
#[command(name = "shardlayer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the schema descriptor
    #[arg(global = true, short, long, default_value = "schema.json")]
    schema: PathBuf,

    /// Directory holding the databases
    #[arg(global = true, short = 'r', long, default_value = "data")]
    data_root: PathBuf,

    /// Name of the database to operate on
    #[arg(global = true, short, long, default_value = "default")]
    database: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the collections declared by the schema
    Collections,

    /// List the shard files of a collection with their document counts
    Shards {
        /// Collection name
        collection: String,
    },

    /// Print the content of every shard of a collection
    Dump {
        /// Collection name
        collection: String,
    },

    /// Find documents in a collection
    Find {
        /// Collection name
        collection: String,

        /// Filter as JSON
        #[arg(short, long, default_value = "{}")]
        filter: String,

        /// Projection as JSON
        #[arg(short, long, default_value = "{}")]
        projection: String,

        /// Sort specification as JSON
        #[arg(long, default_value = "{}")]
        sort: String,

        /// Maximum number of documents (0 for all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Insert a document, or every document of a JSON array
    Insert {
        /// Collection name
        collection: String,

        /// Document or array of documents as JSON
        document: String,
    },

    /// Update documents matching a filter
    Update {
        /// Collection name
        collection: String,

        /// Filter as JSON
        filter: String,

        /// Update specification as JSON
        update: String,

        /// Update every match instead of the first one
        #[arg(short, long)]
        many: bool,
    },

    /// Delete documents matching a filter
    Delete {
        /// Collection name
        collection: String,

        /// Filter as JSON
        filter: String,

        /// Delete every match instead of the first one
        #[arg(short, long)]
        many: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let database = Database::open_with_schema_file(LocalStorage::new(), &cli.schema, &cli.database, &cli.data_root)?;

    match cli.command {
        Commands::Collections => commands::collections(&database),
        Commands::Shards { collection } => commands::shards(&database, &collection)?,
        Commands::Dump { collection } => commands::dump(&database, &collection)?,
        Commands::Find {
            collection,
            filter,
            projection,
            sort,
            limit,
        } => commands::find(&database, &collection, &filter, &projection, &sort, limit)?,
        Commands::Insert { collection, document } => commands::insert(&database, &collection, &document)?,
        Commands::Update {
            collection,
            filter,
            update,
            many,
        } => commands::update(&database, &collection, &filter, &update, many)?,
        Commands::Delete { collection, filter, many } => commands::delete(&database, &collection, &filter, many)?,
    }

    Ok(())
}
