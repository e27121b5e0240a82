//! Enforcement points over the access resolver.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{DomainError, DomainResult};

use super::resolver::AccessResolver;
use super::traits::DomainGraphReader;

/// Thin policy wrapper exposing the two enforcement points of the service:
/// narrowing a requested view set and validating a single write target.
pub struct AccessGate<G> {
    resolver: AccessResolver<G>,
}

impl<G: DomainGraphReader> AccessGate<G> {
    /// Creates a gate (and its request-scoped resolver) over the graph.
    pub fn new(graph: Arc<G>) -> Self {
        Self {
            resolver: AccessResolver::new(graph),
        }
    }

    /// The underlying resolver, for callers that need the raw set.
    pub fn resolver(&self) -> &AccessResolver<G> {
        &self.resolver
    }

    /// Narrows a requested view set to what the user can actually see.
    ///
    /// Without a request the full accessible set is returned. An empty
    /// intersection is not an error: it signals "no visible records" and
    /// callers must answer with an empty result set.
    pub async fn effective_view_domains(
        &self,
        user_id: i64,
        requested: Option<&[i64]>,
    ) -> DomainResult<HashSet<i64>> {
        let accessible = self.resolver.accessible_domains(user_id).await?;
        match requested {
            None | Some([]) => Ok(accessible.as_ref().clone()),
            Some(ids) => Ok(ids
                .iter()
                .copied()
                .filter(|d| accessible.contains(d))
                .collect()),
        }
    }

    /// Validates a single write-target domain, returning it unchanged when
    /// accessible.
    ///
    /// This is the sole enforcement point for assigning or reassigning a
    /// record's domain on create/update. A request naming no domain at all
    /// is denied: records without a domain are orphaned by construction and
    /// never a valid write target.
    pub async fn validate_write_domain(
        &self,
        user_id: i64,
        requested: Option<i64>,
    ) -> DomainResult<i64> {
        let domain_id = requested.ok_or(DomainError::AccessDenied { domain_id: None })?;
        if self.resolver.is_accessible(user_id, domain_id).await? {
            Ok(domain_id)
        } else {
            Err(DomainError::AccessDenied {
                domain_id: Some(domain_id),
            })
        }
    }
}
