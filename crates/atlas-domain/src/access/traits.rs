//! Trait for the read-only domain graph consumed by the resolver.

use async_trait::async_trait;

use crate::error::DomainResult;

/// Read-only access to the organizational tree and the grant edges.
#[async_trait]
pub trait DomainGraphReader: Send + Sync {
    /// The ids of the immediate children of a domain.
    async fn children_of(&self, domain_id: i64) -> DomainResult<Vec<i64>>;

    /// The ids of the domains a user is directly granted.
    async fn grants_of(&self, user_id: i64) -> DomainResult<Vec<i64>>;
}
