//! HTTP route definitions and handlers.
//!
//! Every domain-scoped endpoint reads the caller's id from the `x-user-id`
//! header, creates a request-scoped access gate, and conjoins the resolved
//! view set with the caller's filter before any record is fetched.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use atlas_domain::page::{Page, PageInfo, PageItem};
use atlas_storage::{
    Animal, AnimalChanges, CatalogStore, Country, CountryChanges, Domain, Grant, NewAnimal,
    NewCountry, User,
};

use super::state::AppState;
use crate::errors::{ApiError, ApiResult};
use crate::query::{AnimalListQuery, CountryListQuery};
use crate::validation::{clamp_window, is_valid_email, parse_id_list, require_user_id};

/// Private helper for the catalog routes.
fn api_routes<S: CatalogStore>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Catalog records
        .route(
            "/countries",
            get(list_countries::<S>).post(create_country::<S>),
        )
        .route(
            "/countries/:id",
            get(get_country::<S>).patch(update_country::<S>),
        )
        .route("/animals", get(list_animals::<S>).post(create_animal::<S>))
        .route(
            "/animals/:id",
            get(get_animal::<S>).patch(update_animal::<S>),
        )
        // Organizational tree
        .route("/domains", get(list_domains::<S>).post(create_domain::<S>))
        .route("/domains/:id", get(get_domain::<S>))
        // Users and grants
        .route("/users", post(create_user::<S>))
        .route("/users/:id", get(get_user::<S>))
        .route("/users/:id/domains", get(user_domains::<S>))
        .route(
            "/grants",
            post(grant_access::<S>).delete(revoke_access::<S>),
        )
}

/// Creates the HTTP router with all catalog endpoints.
pub fn create_router<S: CatalogStore>(state: AppState<S>) -> Router {
    let shared_state = Arc::new(state);
    api_routes::<S>()
        .route("/health", get(health_check))
        .with_state(shared_state)
        .layer(TraceLayer::new_for_http())
}

// ============================================================
// Health
// ============================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Response DTOs
// ============================================================

/// Navigation metadata attached to every paginated response.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub has_next: bool,
    pub has_previous: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub total_count: u64,
}

impl From<PageInfo> for PaginationMeta {
    fn from(info: PageInfo) -> Self {
        Self {
            has_next: info.has_next,
            has_previous: info.has_previous,
            start_cursor: info.start_cursor,
            end_cursor: info.end_cursor,
            total_count: info.total_count,
        }
    }
}

/// Envelope for paginated list responses.
#[derive(Debug, Serialize)]
pub struct PageBody<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PageBody<T> {
    fn from_page<R>(page: Page<R>) -> Self
    where
        R: PageItem,
        T: From<R>,
    {
        Self {
            data: page.items.into_iter().map(T::from).collect(),
            pagination: page.info.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountryResponse {
    pub id: i64,
    pub name: String,
    pub capital: Option<String>,
    pub population: Option<i64>,
    pub area: Option<i64>,
    pub currency: Option<String>,
    pub continent: String,
    pub domain_id: Option<i64>,
}

impl From<Country> for CountryResponse {
    fn from(c: Country) -> Self {
        Self {
            id: c.id,
            name: c.name,
            capital: c.capital,
            population: c.population,
            area: c.area,
            currency: c.currency,
            continent: c.continent,
            domain_id: c.domain_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnimalResponse {
    pub id: i64,
    pub name: String,
    pub species: Option<String>,
    pub category: String,
    pub habitat: Option<String>,
    pub diet: Option<String>,
    pub conservation_status: Option<String>,
    pub domain_id: Option<i64>,
}

impl From<Animal> for AnimalResponse {
    fn from(a: Animal) -> Self {
        Self {
            id: a.id,
            name: a.name,
            species: a.species,
            category: a.category,
            habitat: a.habitat,
            diet: a.diet,
            conservation_status: a.conservation_status,
            domain_id: a.domain_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DomainResponse {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub created_by: i64,
    pub created_at: String,
}

impl From<Domain> for DomainResponse {
    fn from(d: Domain) -> Self {
        Self {
            id: d.id,
            name: d.name,
            parent_id: d.parent_id,
            created_by: d.created_by,
            created_at: d.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GrantResponse {
    pub user_id: i64,
    pub domain_id: i64,
    pub created_by: i64,
    pub created_at: String,
}

impl From<Grant> for GrantResponse {
    fn from(g: Grant) -> Self {
        Self {
            user_id: g.user_id,
            domain_id: g.domain_id,
            created_by: g.created_by,
            created_at: g.created_at.to_rfc3339(),
        }
    }
}

// ============================================================
// Countries
// ============================================================

async fn list_countries<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(query): Query<CountryListQuery>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_user_id(&headers)?;
    let gate = state.access_gate();

    let requested = parse_id_list(query.domains.as_deref())?;
    // An empty view set is not an error; the scoped filter then matches
    // nothing and the page comes back empty.
    let view = gate
        .effective_view_domains(user_id, requested.as_deref())
        .await?;

    let filter = query.filter(view);
    let order = query.order();
    let window = clamp_window(query.window())?;

    let page = state.countries.resolve_page(&filter, &order, &window).await?;
    Ok(Json(PageBody::<CountryResponse>::from_page(page)))
}

async fn get_country<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_user_id(&headers)?;
    let gate = state.access_gate();

    let country = state
        .storage
        .get_country(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("country not found: {id}")))?;

    // Records outside the caller's accessible domains (orphans included)
    // are indistinguishable from absent ones.
    let visible = match country.domain_id {
        Some(domain_id) => gate.resolver().is_accessible(user_id, domain_id).await?,
        None => false,
    };
    if !visible {
        return Err(ApiError::not_found(format!("country not found: {id}")));
    }
    Ok(Json(CountryResponse::from(country)))
}

/// Request body for creating a country.
#[derive(Debug, Deserialize)]
pub struct CreateCountryRequest {
    pub name: String,
    pub capital: Option<String>,
    pub population: Option<i64>,
    pub area: Option<i64>,
    pub currency: Option<String>,
    pub continent: String,
    pub domain_id: Option<i64>,
}

async fn create_country<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(body): Json<CreateCountryRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_user_id(&headers)?;
    let gate = state.access_gate();

    // Sole enforcement point for assigning the record's domain.
    let domain_id = gate.validate_write_domain(user_id, body.domain_id).await?;

    let country = state
        .storage
        .create_country(NewCountry {
            name: body.name,
            capital: body.capital,
            population: body.population,
            area: body.area,
            currency: body.currency,
            continent: body.continent,
            domain_id: Some(domain_id),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(CountryResponse::from(country))))
}

/// Request body for updating a country; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCountryRequest {
    pub name: Option<String>,
    pub capital: Option<String>,
    pub population: Option<i64>,
    pub area: Option<i64>,
    pub currency: Option<String>,
    pub continent: Option<String>,
    pub domain_id: Option<i64>,
}

async fn update_country<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCountryRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_user_id(&headers)?;

    // Reassigning the domain goes through the same enforcement point as
    // assignment on create.
    let domain_id = match body.domain_id {
        Some(requested) => Some(
            state
                .access_gate()
                .validate_write_domain(user_id, Some(requested))
                .await?,
        ),
        None => None,
    };

    let updated = state
        .storage
        .update_country(
            id,
            CountryChanges {
                name: body.name,
                capital: body.capital,
                population: body.population,
                area: body.area,
                currency: body.currency,
                continent: body.continent,
                domain_id,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found(format!("country not found: {id}")))?;
    Ok(Json(CountryResponse::from(updated)))
}

// ============================================================
// Animals
// ============================================================

async fn list_animals<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(query): Query<AnimalListQuery>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_user_id(&headers)?;
    let gate = state.access_gate();

    let requested = parse_id_list(query.domains.as_deref())?;
    let view = gate
        .effective_view_domains(user_id, requested.as_deref())
        .await?;

    let filter = query.filter(view);
    let order = query.order();
    let window = clamp_window(query.window())?;

    let page = state.animals.resolve_page(&filter, &order, &window).await?;
    Ok(Json(PageBody::<AnimalResponse>::from_page(page)))
}

async fn get_animal<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_user_id(&headers)?;
    let gate = state.access_gate();

    let animal = state
        .storage
        .get_animal(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("animal not found: {id}")))?;

    let visible = match animal.domain_id {
        Some(domain_id) => gate.resolver().is_accessible(user_id, domain_id).await?,
        None => false,
    };
    if !visible {
        return Err(ApiError::not_found(format!("animal not found: {id}")));
    }
    Ok(Json(AnimalResponse::from(animal)))
}

/// Request body for creating an animal.
#[derive(Debug, Deserialize)]
pub struct CreateAnimalRequest {
    pub name: String,
    pub species: Option<String>,
    pub category: String,
    pub habitat: Option<String>,
    pub diet: Option<String>,
    pub conservation_status: Option<String>,
    pub domain_id: Option<i64>,
}

async fn create_animal<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(body): Json<CreateAnimalRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_user_id(&headers)?;
    let gate = state.access_gate();

    let domain_id = gate.validate_write_domain(user_id, body.domain_id).await?;

    let animal = state
        .storage
        .create_animal(NewAnimal {
            name: body.name,
            species: body.species,
            category: body.category,
            habitat: body.habitat,
            diet: body.diet,
            conservation_status: body.conservation_status,
            domain_id: Some(domain_id),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(AnimalResponse::from(animal))))
}

/// Request body for updating an animal; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAnimalRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub category: Option<String>,
    pub habitat: Option<String>,
    pub diet: Option<String>,
    pub conservation_status: Option<String>,
    pub domain_id: Option<i64>,
}

async fn update_animal<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdateAnimalRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_user_id(&headers)?;

    let domain_id = match body.domain_id {
        Some(requested) => Some(
            state
                .access_gate()
                .validate_write_domain(user_id, Some(requested))
                .await?,
        ),
        None => None,
    };

    let updated = state
        .storage
        .update_animal(
            id,
            AnimalChanges {
                name: body.name,
                species: body.species,
                category: body.category,
                habitat: body.habitat,
                diet: body.diet,
                conservation_status: body.conservation_status,
                domain_id,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found(format!("animal not found: {id}")))?;
    Ok(Json(AnimalResponse::from(updated)))
}

// ============================================================
// Domains
// ============================================================

/// Request body for creating a domain.
#[derive(Debug, Deserialize)]
pub struct CreateDomainRequest {
    pub name: String,
    pub parent_id: Option<i64>,
}

async fn create_domain<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(body): Json<CreateDomainRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_user_id(&headers)?;
    let domain = state
        .storage
        .create_domain(&body.name, body.parent_id, user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(DomainResponse::from(domain))))
}

async fn list_domains<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<impl IntoResponse> {
    let domains = state.storage.list_domains().await?;
    let domains: Vec<DomainResponse> = domains.into_iter().map(DomainResponse::from).collect();
    Ok(Json(domains))
}

async fn get_domain<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let domain = state
        .storage
        .get_domain(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("domain not found: {id}")))?;
    Ok(Json(DomainResponse::from(domain)))
}

// ============================================================
// Users and grants
// ============================================================

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

async fn create_user<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    if !is_valid_email(&body.email) {
        return Err(ApiError::validation_error(format!(
            "invalid email address: {}",
            body.email
        )));
    }
    let user = state.storage.create_user(&body.username, &body.email).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

async fn get_user<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .storage
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user not found: {id}")))?;
    Ok(Json(UserResponse::from(user)))
}

/// Response for a user's accessible domain set.
#[derive(Debug, Serialize)]
pub struct UserDomainsResponse {
    pub user_id: i64,
    pub domains: Vec<i64>,
}

async fn user_domains<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    require_user_id(&headers)?;
    let gate = state.access_gate();

    let accessible = gate.resolver().accessible_domains(id).await?;
    let mut domains: Vec<i64> = accessible.iter().copied().collect();
    domains.sort_unstable();

    Ok(Json(UserDomainsResponse {
        user_id: id,
        domains,
    }))
}

/// Request body for granting domain access.
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub user_id: i64,
    pub domain_id: i64,
}

async fn grant_access<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(body): Json<GrantRequest>,
) -> ApiResult<impl IntoResponse> {
    let granted_by = require_user_id(&headers)?;
    let grant = state
        .storage
        .grant_access(body.user_id, body.domain_id, granted_by)
        .await?;
    Ok((StatusCode::CREATED, Json(GrantResponse::from(grant))))
}

/// Query parameters for revoking domain access.
#[derive(Debug, Deserialize)]
pub struct RevokeQuery {
    pub user_id: i64,
    pub domain_id: i64,
}

async fn revoke_access<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(query): Query<RevokeQuery>,
) -> ApiResult<impl IntoResponse> {
    require_user_id(&headers)?;
    // Revoking a missing edge is a no-op null, mirroring the grant
    // idempotency on the write side.
    let revoked = state
        .storage
        .revoke_access(query.user_id, query.domain_id)
        .await?;
    Ok(Json(revoked.map(GrantResponse::from)))
}
