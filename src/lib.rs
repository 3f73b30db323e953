//! Campus radio station server.
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog_store;
pub mod config;
pub mod profiles;
pub mod radio;
pub mod seed;
pub mod server;
pub mod sqlite_persistence;

pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use profiles::{ProfileStore, SqliteProfileStore};
pub use server::{run_server, RequestsLoggingLevel};
