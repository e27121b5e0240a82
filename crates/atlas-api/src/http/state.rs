//! Application state for HTTP handlers.

use std::sync::Arc;

use atlas_domain::access::AccessGate;
use atlas_domain::page::PageEngine;
use atlas_storage::CatalogStore;

use crate::adapters::{AnimalSource, CountrySource, StoreDomainGraph};

/// Application state shared across all HTTP handlers.
///
/// Adapters and page engines are wired once at construction time over any
/// storage backend implementing [`CatalogStore`]. Access gates are NOT held
/// here: resolution memoization must not outlive a request, so each handler
/// creates a fresh gate via [`AppState::access_gate`].
pub struct AppState<S: CatalogStore> {
    /// The storage backend.
    pub storage: Arc<S>,
    /// The domain graph adapter shared by per-request gates.
    pub graph: Arc<StoreDomainGraph<S>>,
    /// The country pagination engine.
    pub countries: PageEngine<CountrySource<S>>,
    /// The animal pagination engine.
    pub animals: PageEngine<AnimalSource<S>>,
}

impl<S: CatalogStore> AppState<S> {
    /// Creates a new application state over the given storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        let graph = Arc::new(StoreDomainGraph::new(Arc::clone(&storage)));
        let countries = PageEngine::new(Arc::new(CountrySource::new(Arc::clone(&storage))));
        let animals = PageEngine::new(Arc::new(AnimalSource::new(Arc::clone(&storage))));

        Self {
            storage,
            graph,
            countries,
            animals,
        }
    }

    /// Creates a request-scoped access gate. The gate memoizes resolved
    /// access sets for its own lifetime only; call this once per request and
    /// let it drop with the request.
    pub fn access_gate(&self) -> AccessGate<StoreDomainGraph<S>> {
        AccessGate::new(Arc::clone(&self.graph))
    }
}
