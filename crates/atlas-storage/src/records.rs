//! Catalog record types, write inputs and query filters.

use atlas_domain::page::{PageItem, SortValue};
use chrono::{DateTime, Utc};

/// A node of the organizational tree. `parent_id: None` marks a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A user→domain access edge. Access extends to all descendants of the
/// granted domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub user_id: i64,
    pub domain_id: i64,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub capital: Option<String>,
    pub population: Option<i64>,
    pub area: Option<i64>,
    pub currency: Option<String>,
    pub continent: String,
    /// `None` marks an orphaned record: invisible to domain-scoped queries.
    pub domain_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animal {
    pub id: i64,
    pub name: String,
    pub species: Option<String>,
    pub category: String,
    pub habitat: Option<String>,
    pub diet: Option<String>,
    pub conservation_status: Option<String>,
    /// `None` marks an orphaned record: invisible to domain-scoped queries.
    pub domain_id: Option<i64>,
}

impl PageItem for Country {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "id" => SortValue::Int(self.id),
            "name" => SortValue::Text(self.name.clone()),
            "population" => self.population.into(),
            "area" => self.area.into(),
            _ => SortValue::Null,
        }
    }
}

impl PageItem for Animal {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "id" => SortValue::Int(self.id),
            "name" => SortValue::Text(self.name.clone()),
            "species" => self
                .species
                .as_deref()
                .map_or(SortValue::Null, SortValue::from),
            "category" => SortValue::Text(self.category.clone()),
            _ => SortValue::Null,
        }
    }
}

// ============================================================
// Write inputs
// ============================================================

#[derive(Debug, Clone)]
pub struct NewCountry {
    pub name: String,
    pub capital: Option<String>,
    pub population: Option<i64>,
    pub area: Option<i64>,
    pub currency: Option<String>,
    pub continent: String,
    pub domain_id: Option<i64>,
}

/// Field updates for a country; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct CountryChanges {
    pub name: Option<String>,
    pub capital: Option<String>,
    pub population: Option<i64>,
    pub area: Option<i64>,
    pub currency: Option<String>,
    pub continent: Option<String>,
    pub domain_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewAnimal {
    pub name: String,
    pub species: Option<String>,
    pub category: String,
    pub habitat: Option<String>,
    pub diet: Option<String>,
    pub conservation_status: Option<String>,
    pub domain_id: Option<i64>,
}

/// Field updates for an animal; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct AnimalChanges {
    pub name: Option<String>,
    pub species: Option<String>,
    pub category: Option<String>,
    pub habitat: Option<String>,
    pub diet: Option<String>,
    pub conservation_status: Option<String>,
    pub domain_id: Option<i64>,
}

// ============================================================
// Query filters
// ============================================================

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn opt_contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.map_or(false, |h| contains(h, needle))
}

/// Filter for country queries. All set conditions are conjoined; `search`
/// matches any of several fields.
#[derive(Debug, Clone, Default)]
pub struct CountryFilter {
    pub continent: Option<String>,
    pub name: Option<String>,
    pub capital: Option<String>,
    pub currency: Option<String>,
    pub population_min: Option<i64>,
    pub population_max: Option<i64>,
    pub area_min: Option<i64>,
    pub area_max: Option<i64>,
    pub search: Option<String>,
    /// Domain-scoping predicate: when present, only records assigned to one
    /// of these domains match. Orphans (no domain) never match a scoped
    /// filter.
    pub domain_ids: Option<Vec<i64>>,
}

impl CountryFilter {
    pub fn matches(&self, c: &Country) -> bool {
        if let Some(ids) = &self.domain_ids {
            if !c.domain_id.map_or(false, |d| ids.contains(&d)) {
                return false;
            }
        }
        if self.continent.as_deref().map_or(false, |v| c.continent != v) {
            return false;
        }
        if self.name.as_deref().map_or(false, |v| !contains(&c.name, v)) {
            return false;
        }
        if self
            .capital
            .as_deref()
            .map_or(false, |v| !opt_contains(c.capital.as_deref(), v))
        {
            return false;
        }
        if self
            .currency
            .as_deref()
            .map_or(false, |v| !opt_contains(c.currency.as_deref(), v))
        {
            return false;
        }
        if self
            .population_min
            .map_or(false, |min| c.population.map_or(true, |p| p < min))
        {
            return false;
        }
        if self
            .population_max
            .map_or(false, |max| c.population.map_or(true, |p| p > max))
        {
            return false;
        }
        if self
            .area_min
            .map_or(false, |min| c.area.map_or(true, |a| a < min))
        {
            return false;
        }
        if self
            .area_max
            .map_or(false, |max| c.area.map_or(true, |a| a > max))
        {
            return false;
        }
        if let Some(term) = self.search.as_deref() {
            return contains(&c.name, term)
                || opt_contains(c.capital.as_deref(), term)
                || opt_contains(c.currency.as_deref(), term)
                || c.continent == term;
        }
        true
    }
}

/// Filter for animal queries, same conjunction semantics as
/// [`CountryFilter`].
#[derive(Debug, Clone, Default)]
pub struct AnimalFilter {
    pub category: Option<String>,
    pub species: Option<String>,
    pub habitat: Option<String>,
    pub diet: Option<String>,
    pub conservation_status: Option<String>,
    pub name: Option<String>,
    pub search: Option<String>,
    pub domain_ids: Option<Vec<i64>>,
}

impl AnimalFilter {
    pub fn matches(&self, a: &Animal) -> bool {
        if let Some(ids) = &self.domain_ids {
            if !a.domain_id.map_or(false, |d| ids.contains(&d)) {
                return false;
            }
        }
        if self.category.as_deref().map_or(false, |v| a.category != v) {
            return false;
        }
        if self.name.as_deref().map_or(false, |v| !contains(&a.name, v)) {
            return false;
        }
        if self
            .species
            .as_deref()
            .map_or(false, |v| !opt_contains(a.species.as_deref(), v))
        {
            return false;
        }
        if self
            .habitat
            .as_deref()
            .map_or(false, |v| !opt_contains(a.habitat.as_deref(), v))
        {
            return false;
        }
        if self
            .diet
            .as_deref()
            .map_or(false, |v| !opt_contains(a.diet.as_deref(), v))
        {
            return false;
        }
        if self
            .conservation_status
            .as_deref()
            .map_or(false, |v| !opt_contains(a.conservation_status.as_deref(), v))
        {
            return false;
        }
        if let Some(term) = self.search.as_deref() {
            return contains(&a.name, term)
                || opt_contains(a.species.as_deref(), term)
                || opt_contains(a.habitat.as_deref(), term)
                || opt_contains(a.diet.as_deref(), term)
                || opt_contains(a.conservation_status.as_deref(), term)
                || a.category == term;
        }
        true
    }
}
