//! In-memory storage backing every REST endpoint.
//!
//! `MemStorage` owns one `MemTable` per entity kind. Tables hand out clones,
//! assign ids from a per-table counter, and answer lookups by linear scan.

pub mod entity;
pub mod error;
pub mod fixture;
pub mod memory;
pub mod repository;
pub mod table;

pub use entity::Entity;
pub use error::StorageError;
pub use fixture::{Fixture, FixtureError};
pub use memory::MemStorage;
pub use repository::Repository;
pub use table::MemTable;
