//! Resolver expanding direct grants into the effective accessible set.
//!
//! # Scope
//!
//! A resolver instance is created per request and discarded with it. The
//! memo of resolved sets lives inside the instance, so grant changes between
//! requests are never masked by stale entries; there is deliberately no
//! process-wide cache keyed by user id.
//!
//! # Traversal
//!
//! The descendant walk is iterative (explicit work stack) with a visited
//! set. Deep hierarchies cannot overflow the call stack, and an accidental
//! cycle in the domain graph terminates as zero additional descendants
//! instead of looping forever.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use crate::error::DomainResult;

use super::traits::DomainGraphReader;

/// Request-scoped access resolution over a domain graph.
pub struct AccessResolver<G> {
    graph: Arc<G>,
    /// Per-user resolved sets, memoized for the life of this instance only.
    resolved: RwLock<HashMap<i64, Arc<HashSet<i64>>>>,
}

impl<G: DomainGraphReader> AccessResolver<G> {
    /// Creates a resolver over the given graph. Callers create one per
    /// request/resolution context.
    pub fn new(graph: Arc<G>) -> Self {
        Self {
            graph,
            resolved: RwLock::new(HashMap::new()),
        }
    }

    /// Collects every node reachable via child links from `domain_id`,
    /// unbounded depth, excluding `domain_id` itself.
    pub async fn descendants_of(&self, domain_id: i64) -> DomainResult<HashSet<i64>> {
        let mut descendants = HashSet::new();
        let mut visited = HashSet::from([domain_id]);
        let mut stack = vec![domain_id];

        while let Some(current) = stack.pop() {
            for child in self.graph.children_of(current).await? {
                if visited.insert(child) {
                    descendants.insert(child);
                    stack.push(child);
                } else {
                    // The forest invariant is violated (cycle or shared
                    // child); skip the edge rather than loop.
                    warn!(domain_id, child, "domain graph revisited a node during traversal");
                }
            }
        }

        Ok(descendants)
    }

    /// The user's effective accessible set: direct grants unioned with all
    /// descendants of each grant. No guaranteed ordering.
    pub async fn accessible_domains(&self, user_id: i64) -> DomainResult<Arc<HashSet<i64>>> {
        if let Some(set) = self.resolved.read().await.get(&user_id) {
            return Ok(Arc::clone(set));
        }

        let direct = self.graph.grants_of(user_id).await?;
        let mut accessible: HashSet<i64> = direct.iter().copied().collect();
        for domain_id in direct {
            accessible.extend(self.descendants_of(domain_id).await?);
        }

        let accessible = Arc::new(accessible);
        self.resolved
            .write()
            .await
            .insert(user_id, Arc::clone(&accessible));
        Ok(accessible)
    }

    /// Membership test against the user's accessible set.
    pub async fn is_accessible(&self, user_id: i64, domain_id: i64) -> DomainResult<bool> {
        Ok(self.accessible_domains(user_id).await?.contains(&domain_id))
    }
}
