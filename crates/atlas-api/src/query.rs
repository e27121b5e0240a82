//! Query-parameter translation: wire order tokens and filter fields into
//! the domain's order specs and the storage filters.

use serde::Deserialize;
use std::collections::HashSet;

use atlas_domain::page::{OrderSpec, PageRequest, SortDirection};
use atlas_storage::{AnimalFilter, CountryFilter};

/// Maps a country order token to its field name. Unrecognized tokens fall
/// back to the name field.
pub fn map_country_order_field(token: &str) -> &'static str {
    match token.to_ascii_uppercase().as_str() {
        "NAME" => "name",
        "POPULATION" => "population",
        "AREA" => "area",
        "ID" => "id",
        _ => "name",
    }
}

/// Maps an animal order token to its field name. Unrecognized tokens fall
/// back to the name field.
pub fn map_animal_order_field(token: &str) -> &'static str {
    match token.to_ascii_uppercase().as_str() {
        "NAME" => "name",
        "SPECIES" => "species",
        "CATEGORY" => "category",
        "ID" => "id",
        _ => "name",
    }
}

/// Query parameters for the country list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CountryListQuery {
    pub continent: Option<String>,
    pub name: Option<String>,
    pub capital: Option<String>,
    pub currency: Option<String>,
    pub population_min: Option<i64>,
    pub population_max: Option<i64>,
    pub area_min: Option<i64>,
    pub area_max: Option<i64>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub direction: Option<String>,
    pub first: Option<u32>,
    pub after: Option<String>,
    pub last: Option<u32>,
    pub before: Option<String>,
    /// Comma-separated domain ids to narrow the view set.
    pub domains: Option<String>,
}

impl CountryListQuery {
    /// Builds the storage filter, conjoined with the resolved view set.
    pub fn filter(&self, view_domains: HashSet<i64>) -> CountryFilter {
        CountryFilter {
            continent: self.continent.clone(),
            name: self.name.clone(),
            capital: self.capital.clone(),
            currency: self.currency.clone(),
            population_min: self.population_min,
            population_max: self.population_max,
            area_min: self.area_min,
            area_max: self.area_max,
            search: self.search.clone(),
            domain_ids: Some(sorted(view_domains)),
        }
    }

    pub fn order(&self) -> OrderSpec {
        build_order(
            map_country_order_field(self.order_by.as_deref().unwrap_or("NAME")),
            self.direction.as_deref(),
        )
    }

    pub fn window(&self) -> PageRequest {
        PageRequest {
            first: self.first,
            after: self.after.clone(),
            last: self.last,
            before: self.before.clone(),
        }
    }
}

/// Query parameters for the animal list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AnimalListQuery {
    pub category: Option<String>,
    pub species: Option<String>,
    pub habitat: Option<String>,
    pub diet: Option<String>,
    pub conservation_status: Option<String>,
    pub name: Option<String>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub direction: Option<String>,
    pub first: Option<u32>,
    pub after: Option<String>,
    pub last: Option<u32>,
    pub before: Option<String>,
    /// Comma-separated domain ids to narrow the view set.
    pub domains: Option<String>,
}

impl AnimalListQuery {
    /// Builds the storage filter, conjoined with the resolved view set.
    pub fn filter(&self, view_domains: HashSet<i64>) -> AnimalFilter {
        AnimalFilter {
            category: self.category.clone(),
            species: self.species.clone(),
            habitat: self.habitat.clone(),
            diet: self.diet.clone(),
            conservation_status: self.conservation_status.clone(),
            name: self.name.clone(),
            search: self.search.clone(),
            domain_ids: Some(sorted(view_domains)),
        }
    }

    pub fn order(&self) -> OrderSpec {
        build_order(
            map_animal_order_field(self.order_by.as_deref().unwrap_or("NAME")),
            self.direction.as_deref(),
        )
    }

    pub fn window(&self) -> PageRequest {
        PageRequest {
            first: self.first,
            after: self.after.clone(),
            last: self.last,
            before: self.before.clone(),
        }
    }
}

fn build_order(field: &str, direction: Option<&str>) -> OrderSpec {
    let direction = direction.map_or(SortDirection::Asc, SortDirection::parse);
    OrderSpec::new(field, direction)
}

fn sorted(set: HashSet<i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = set.into_iter().collect();
    ids.sort_unstable();
    ids
}
