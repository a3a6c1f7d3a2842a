//! `PostgreSQL` adapters for agent registry persistence.

mod models;
mod queries;
mod registry_store;
mod schema;

pub use registry_store::{PostgresRegistryStore, REGISTRY_SCHEMA_SQL, RegistryPgPool};
