//! SQLite bootstrap for the `kv_entries` table behind `SqliteKvStore`.
//!
//! Connections handed out here are migrated to `migrations::latest_version()`;
//! failures surface as `StorageError`.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
