//! Store de documentos durable para anuncios sobre Diesel + r2d2.
//! SQLite por defecto; Postgres con la feature `pg`. La implementación está
//! en `document_persistence.rs`.

mod config;
mod document_persistence;
pub mod schema;

pub use config::PersistenceConfig;
pub use document_persistence::{new_from_env, DieselDocumentStore, DieselSession, MIGRATIONS};
