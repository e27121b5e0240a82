//! Adapters bridging the storage layer to the domain traits.
//!
//! The domain crate is storage-agnostic: the resolver reads a
//! [`DomainGraphReader`] and the page engine a [`RecordSource`]. These
//! adapters implement both over any [`CatalogStore`], so the core works with
//! every backend that implements the storage trait.

use std::sync::Arc;

use async_trait::async_trait;

use atlas_domain::access::DomainGraphReader;
use atlas_domain::page::{OrderSpec, RecordSource, ResumePredicate};
use atlas_domain::{DomainError, DomainResult};
use atlas_storage::{Animal, AnimalFilter, CatalogStore, Country, CountryFilter};

/// [`DomainGraphReader`] over a catalog store.
pub struct StoreDomainGraph<S> {
    storage: Arc<S>,
}

impl<S> StoreDomainGraph<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: CatalogStore> DomainGraphReader for StoreDomainGraph<S> {
    async fn children_of(&self, domain_id: i64) -> DomainResult<Vec<i64>> {
        self.storage
            .children_of(domain_id)
            .await
            .map_err(DomainError::storage)
    }

    async fn grants_of(&self, user_id: i64) -> DomainResult<Vec<i64>> {
        self.storage
            .grants_of(user_id)
            .await
            .map_err(DomainError::storage)
    }
}

/// Country [`RecordSource`] over a catalog store.
pub struct CountrySource<S> {
    storage: Arc<S>,
}

impl<S> CountrySource<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: CatalogStore> RecordSource for CountrySource<S> {
    type Record = Country;
    type Filter = CountryFilter;

    async fn find_page(
        &self,
        filter: &CountryFilter,
        resume: Option<&ResumePredicate>,
        order: &OrderSpec,
        limit: usize,
    ) -> DomainResult<Vec<Country>> {
        self.storage
            .find_countries(filter, resume, order, limit)
            .await
            .map_err(DomainError::storage)
    }

    async fn count(&self, filter: &CountryFilter) -> DomainResult<u64> {
        self.storage
            .count_countries(filter)
            .await
            .map_err(DomainError::storage)
    }
}

/// Animal [`RecordSource`] over a catalog store.
pub struct AnimalSource<S> {
    storage: Arc<S>,
}

impl<S> AnimalSource<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: CatalogStore> RecordSource for AnimalSource<S> {
    type Record = Animal;
    type Filter = AnimalFilter;

    async fn find_page(
        &self,
        filter: &AnimalFilter,
        resume: Option<&ResumePredicate>,
        order: &OrderSpec,
        limit: usize,
    ) -> DomainResult<Vec<Animal>> {
        self.storage
            .find_animals(filter, resume, order, limit)
            .await
            .map_err(DomainError::storage)
    }

    async fn count(&self, filter: &AnimalFilter) -> DomainResult<u64> {
        self.storage
            .count_animals(filter)
            .await
            .map_err(DomainError::storage)
    }
}
