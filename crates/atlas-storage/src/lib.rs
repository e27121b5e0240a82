//! atlas-storage: Storage interface and backends
//!
//! This crate defines the [`CatalogStore`] trait consumed by the API layer
//! and provides the in-memory backend. SQL backends would implement the
//! same trait.

pub mod error;
pub mod memory;
pub mod records;
pub mod traits;

pub use chrono::Utc;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryCatalogStore;
pub use records::{
    Animal, AnimalChanges, AnimalFilter, Country, CountryChanges, CountryFilter, Domain, Grant,
    NewAnimal, NewCountry, User,
};
pub use traits::CatalogStore;
