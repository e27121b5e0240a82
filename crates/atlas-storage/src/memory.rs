//! In-memory storage implementation.
//!
//! Uses DashMap for thread-safe concurrent access without explicit locks
//! and per-entity atomic counters for id assignment (the catalog keeps
//! numeric auto-increment ids).
//!
//! # Performance Characteristics
//!
//! - **Writes**: O(1) average (DashMap insert)
//! - **Page fetch**: O(N log N) in the matching set (filter, sort, seek)
//! - **Lookups**: O(1) (DashMap get)

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::instrument;

use atlas_domain::page::{OrderSpec, PageItem, ResumePredicate};

use crate::error::{StorageError, StorageResult};
use crate::records::{
    Animal, AnimalChanges, AnimalFilter, Country, CountryChanges, CountryFilter, Domain, Grant,
    NewAnimal, NewCountry, User,
};
use crate::traits::CatalogStore;

/// In-memory implementation of [`CatalogStore`].
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    domains: DashMap<i64, Domain>,
    users: DashMap<i64, User>,
    /// Grant edges keyed by (user_id, domain_id); the key encodes the
    /// uniqueness constraint, making grant writes idempotent.
    grants: DashMap<(i64, i64), Grant>,
    countries: DashMap<i64, Country>,
    animals: DashMap<i64, Animal>,
    domain_seq: AtomicI64,
    user_seq: AtomicI64,
    country_seq: AtomicI64,
    animal_seq: AtomicI64,
}

impl MemoryCatalogStore {
    /// Creates a new in-memory catalog store.
    pub fn new() -> Self {
        Self {
            domain_seq: AtomicI64::new(1),
            user_seq: AtomicI64::new(1),
            country_seq: AtomicI64::new(1),
            animal_seq: AtomicI64::new(1),
            ..Self::default()
        }
    }
}

/// Sorts, seeks past the resume anchor and bounds one page of records.
fn page_of<T: PageItem>(
    mut matching: Vec<T>,
    resume: Option<&ResumePredicate>,
    order: &OrderSpec,
    limit: usize,
) -> Vec<T> {
    if let Some(predicate) = resume {
        matching.retain(|r| predicate.matches(r));
    }
    matching.sort_by(|a, b| order.compare_items(a, b));
    matching.truncate(limit);
    matching
}

fn non_empty(value: &str, what: &str) -> StorageResult<()> {
    if value.trim().is_empty() {
        return Err(StorageError::InvalidInput {
            message: format!("{what} must not be empty"),
        });
    }
    Ok(())
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    #[instrument(skip(self))]
    async fn create_domain(
        &self,
        name: &str,
        parent_id: Option<i64>,
        created_by: i64,
    ) -> StorageResult<Domain> {
        non_empty(name, "domain name")?;
        if let Some(parent) = parent_id {
            if !self.domains.contains_key(&parent) {
                return Err(StorageError::DomainNotFound { domain_id: parent });
            }
        }

        let domain = Domain {
            id: self.domain_seq.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            parent_id,
            created_by,
            created_at: chrono::Utc::now(),
        };
        self.domains.insert(domain.id, domain.clone());
        Ok(domain)
    }

    async fn get_domain(&self, id: i64) -> StorageResult<Option<Domain>> {
        Ok(self.domains.get(&id).map(|d| d.value().clone()))
    }

    async fn list_domains(&self) -> StorageResult<Vec<Domain>> {
        let mut domains: Vec<Domain> = self.domains.iter().map(|d| d.value().clone()).collect();
        domains.sort_by_key(|d| d.id);
        Ok(domains)
    }

    async fn children_of(&self, domain_id: i64) -> StorageResult<Vec<i64>> {
        Ok(self
            .domains
            .iter()
            .filter(|d| d.value().parent_id == Some(domain_id))
            .map(|d| d.value().id)
            .collect())
    }

    async fn create_user(&self, username: &str, email: &str) -> StorageResult<User> {
        non_empty(username, "username")?;
        non_empty(email, "email")?;

        let user = User {
            id: self.user_seq.fetch_add(1, Ordering::Relaxed),
            username: username.to_string(),
            email: email.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> StorageResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    #[instrument(skip(self))]
    async fn grant_access(
        &self,
        user_id: i64,
        domain_id: i64,
        granted_by: i64,
    ) -> StorageResult<Grant> {
        if !self.users.contains_key(&user_id) {
            return Err(StorageError::UserNotFound { user_id });
        }
        if !self.domains.contains_key(&domain_id) {
            return Err(StorageError::DomainNotFound { domain_id });
        }

        // Atomic entry API: an existing edge wins, making the call
        // idempotent under concurrency.
        use dashmap::mapref::entry::Entry;
        let grant = match self.grants.entry((user_id, domain_id)) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => entry
                .insert(Grant {
                    user_id,
                    domain_id,
                    created_by: granted_by,
                    created_at: chrono::Utc::now(),
                })
                .clone(),
        };
        Ok(grant)
    }

    async fn revoke_access(&self, user_id: i64, domain_id: i64) -> StorageResult<Option<Grant>> {
        Ok(self
            .grants
            .remove(&(user_id, domain_id))
            .map(|(_, grant)| grant))
    }

    async fn grants_of(&self, user_id: i64) -> StorageResult<Vec<i64>> {
        Ok(self
            .grants
            .iter()
            .filter(|g| g.value().user_id == user_id)
            .map(|g| g.value().domain_id)
            .collect())
    }

    async fn create_country(&self, input: NewCountry) -> StorageResult<Country> {
        non_empty(&input.name, "country name")?;
        non_empty(&input.continent, "continent")?;

        let country = Country {
            id: self.country_seq.fetch_add(1, Ordering::Relaxed),
            name: input.name,
            capital: input.capital,
            population: input.population,
            area: input.area,
            currency: input.currency,
            continent: input.continent,
            domain_id: input.domain_id,
        };
        self.countries.insert(country.id, country.clone());
        Ok(country)
    }

    async fn get_country(&self, id: i64) -> StorageResult<Option<Country>> {
        Ok(self.countries.get(&id).map(|c| c.value().clone()))
    }

    async fn update_country(
        &self,
        id: i64,
        changes: CountryChanges,
    ) -> StorageResult<Option<Country>> {
        let mut entry = match self.countries.get_mut(&id) {
            Some(entry) => entry,
            None => return Ok(None),
        };
        if let Some(name) = changes.name {
            entry.name = name;
        }
        if let Some(capital) = changes.capital {
            entry.capital = Some(capital);
        }
        if let Some(population) = changes.population {
            entry.population = Some(population);
        }
        if let Some(area) = changes.area {
            entry.area = Some(area);
        }
        if let Some(currency) = changes.currency {
            entry.currency = Some(currency);
        }
        if let Some(continent) = changes.continent {
            entry.continent = continent;
        }
        if let Some(domain_id) = changes.domain_id {
            entry.domain_id = Some(domain_id);
        }
        Ok(Some(entry.clone()))
    }

    async fn find_countries(
        &self,
        filter: &CountryFilter,
        resume: Option<&ResumePredicate>,
        order: &OrderSpec,
        limit: usize,
    ) -> StorageResult<Vec<Country>> {
        let matching: Vec<Country> = self
            .countries
            .iter()
            .filter(|c| filter.matches(c.value()))
            .map(|c| c.value().clone())
            .collect();
        Ok(page_of(matching, resume, order, limit))
    }

    async fn count_countries(&self, filter: &CountryFilter) -> StorageResult<u64> {
        Ok(self
            .countries
            .iter()
            .filter(|c| filter.matches(c.value()))
            .count() as u64)
    }

    async fn create_animal(&self, input: NewAnimal) -> StorageResult<Animal> {
        non_empty(&input.name, "animal name")?;
        non_empty(&input.category, "category")?;

        let animal = Animal {
            id: self.animal_seq.fetch_add(1, Ordering::Relaxed),
            name: input.name,
            species: input.species,
            category: input.category,
            habitat: input.habitat,
            diet: input.diet,
            conservation_status: input.conservation_status,
            domain_id: input.domain_id,
        };
        self.animals.insert(animal.id, animal.clone());
        Ok(animal)
    }

    async fn get_animal(&self, id: i64) -> StorageResult<Option<Animal>> {
        Ok(self.animals.get(&id).map(|a| a.value().clone()))
    }

    async fn update_animal(
        &self,
        id: i64,
        changes: AnimalChanges,
    ) -> StorageResult<Option<Animal>> {
        let mut entry = match self.animals.get_mut(&id) {
            Some(entry) => entry,
            None => return Ok(None),
        };
        if let Some(name) = changes.name {
            entry.name = name;
        }
        if let Some(species) = changes.species {
            entry.species = Some(species);
        }
        if let Some(category) = changes.category {
            entry.category = category;
        }
        if let Some(habitat) = changes.habitat {
            entry.habitat = Some(habitat);
        }
        if let Some(diet) = changes.diet {
            entry.diet = Some(diet);
        }
        if let Some(status) = changes.conservation_status {
            entry.conservation_status = Some(status);
        }
        if let Some(domain_id) = changes.domain_id {
            entry.domain_id = Some(domain_id);
        }
        Ok(Some(entry.clone()))
    }

    async fn find_animals(
        &self,
        filter: &AnimalFilter,
        resume: Option<&ResumePredicate>,
        order: &OrderSpec,
        limit: usize,
    ) -> StorageResult<Vec<Animal>> {
        let matching: Vec<Animal> = self
            .animals
            .iter()
            .filter(|a| filter.matches(a.value()))
            .map(|a| a.value().clone())
            .collect();
        Ok(page_of(matching, resume, order, limit))
    }

    async fn count_animals(&self, filter: &AnimalFilter) -> StorageResult<u64> {
        Ok(self
            .animals
            .iter()
            .filter(|a| filter.matches(a.value()))
            .count() as u64)
    }
}
