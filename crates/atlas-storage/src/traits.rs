//! CatalogStore trait definition.

use async_trait::async_trait;

use atlas_domain::page::{OrderSpec, ResumePredicate};

use crate::error::StorageResult;
use crate::records::{
    Animal, AnimalChanges, AnimalFilter, Country, CountryChanges, CountryFilter, Domain, Grant,
    NewAnimal, NewCountry, User,
};

/// Abstract storage interface for the catalog.
///
/// Implementations must be thread-safe (Send + Sync) and support async
/// operations. Record lookups by id return `Ok(None)` when absent rather
/// than an error; write operations with missing referents fail.
///
/// Page fetches take a resume predicate and a compound order and never use
/// numeric offsets.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    // Domain operations

    /// Creates a domain; `parent_id` must name an existing domain when set.
    async fn create_domain(
        &self,
        name: &str,
        parent_id: Option<i64>,
        created_by: i64,
    ) -> StorageResult<Domain>;

    async fn get_domain(&self, id: i64) -> StorageResult<Option<Domain>>;

    async fn list_domains(&self) -> StorageResult<Vec<Domain>>;

    /// The ids of the immediate children of a domain.
    async fn children_of(&self, domain_id: i64) -> StorageResult<Vec<i64>>;

    // User operations

    async fn create_user(&self, username: &str, email: &str) -> StorageResult<User>;

    async fn get_user(&self, id: i64) -> StorageResult<Option<User>>;

    // Grant operations

    /// Grants a user access to a domain. Granting an existing edge is
    /// idempotent and returns the existing grant.
    async fn grant_access(
        &self,
        user_id: i64,
        domain_id: i64,
        granted_by: i64,
    ) -> StorageResult<Grant>;

    /// Revokes a grant, returning it; revoking a missing edge is a no-op
    /// `None`.
    async fn revoke_access(&self, user_id: i64, domain_id: i64) -> StorageResult<Option<Grant>>;

    /// The ids of the domains a user is directly granted.
    async fn grants_of(&self, user_id: i64) -> StorageResult<Vec<i64>>;

    // Country operations

    async fn create_country(&self, input: NewCountry) -> StorageResult<Country>;

    async fn get_country(&self, id: i64) -> StorageResult<Option<Country>>;

    async fn update_country(
        &self,
        id: i64,
        changes: CountryChanges,
    ) -> StorageResult<Option<Country>>;

    async fn find_countries(
        &self,
        filter: &CountryFilter,
        resume: Option<&ResumePredicate>,
        order: &OrderSpec,
        limit: usize,
    ) -> StorageResult<Vec<Country>>;

    async fn count_countries(&self, filter: &CountryFilter) -> StorageResult<u64>;

    // Animal operations

    async fn create_animal(&self, input: NewAnimal) -> StorageResult<Animal>;

    async fn get_animal(&self, id: i64) -> StorageResult<Option<Animal>>;

    async fn update_animal(&self, id: i64, changes: AnimalChanges)
        -> StorageResult<Option<Animal>>;

    async fn find_animals(
        &self,
        filter: &AnimalFilter,
        resume: Option<&ResumePredicate>,
        order: &OrderSpec,
        limit: usize,
    ) -> StorageResult<Vec<Animal>>;

    async fn count_animals(&self, filter: &AnimalFilter) -> StorageResult<u64>;
}
