//! Resolver and gate behavior tests.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::DomainError;

use super::mocks::{gate_over, resolver_over, three_level_graph, MockDomainGraph};

#[tokio::test]
async fn test_accessible_domains_includes_direct_grants() {
    let graph = three_level_graph().await;
    graph.add_grant(10, 2).await;
    let resolver = resolver_over(&graph);

    let accessible = resolver.accessible_domains(10).await.unwrap();
    assert!(accessible.contains(&2));
}

#[tokio::test]
async fn test_grant_expands_to_all_descendants() {
    let graph = three_level_graph().await;
    graph.add_grant(10, 1).await;
    let resolver = resolver_over(&graph);

    let accessible = resolver.accessible_domains(10).await.unwrap();
    assert_eq!(*accessible, HashSet::from([1, 2, 3]));
}

#[tokio::test]
async fn test_no_domain_is_its_own_descendant() {
    let graph = three_level_graph().await;
    let resolver = resolver_over(&graph);

    for domain_id in [1, 2, 3] {
        let descendants = resolver.descendants_of(domain_id).await.unwrap();
        assert!(
            !descendants.contains(&domain_id),
            "domain {domain_id} appeared in its own descendant set"
        );
    }
}

#[tokio::test]
async fn test_unrelated_domain_is_not_accessible() {
    let graph = three_level_graph().await;
    graph.add_grant(10, 1).await;
    let resolver = resolver_over(&graph);

    assert!(!resolver.is_accessible(10, 4).await.unwrap());
}

#[tokio::test]
async fn test_deep_chain_is_fully_expanded() {
    // A 500-deep chain must not overflow: the walk is iterative.
    let graph = Arc::new(MockDomainGraph::new());
    for i in 1..500 {
        graph.add_child(i, i + 1).await;
    }
    graph.add_grant(10, 1).await;
    let resolver = resolver_over(&graph);

    let accessible = resolver.accessible_domains(10).await.unwrap();
    assert_eq!(accessible.len(), 500);
    assert!(accessible.contains(&500));
}

#[tokio::test]
async fn test_cycle_terminates() {
    let graph = Arc::new(MockDomainGraph::new());
    graph.add_child(1, 2).await;
    graph.add_child(2, 3).await;
    graph.add_child(3, 1).await;
    let resolver = resolver_over(&graph);

    // A cycle yields the reachable nodes once each, then stops.
    let descendants = resolver.descendants_of(1).await.unwrap();
    assert_eq!(descendants, HashSet::from([2, 3]));
}

#[tokio::test]
async fn test_resolution_is_memoized_within_an_instance() {
    let graph = three_level_graph().await;
    graph.add_grant(10, 1).await;
    let resolver = resolver_over(&graph);

    let before = resolver.accessible_domains(10).await.unwrap();
    // A grant change mid-resolution is not observed by this instance...
    graph.remove_grant(10, 1).await;
    let after = resolver.accessible_domains(10).await.unwrap();
    assert_eq!(*before, *after);

    // ...but a fresh (next-request) resolver sees it immediately.
    let fresh = resolver_over(&graph);
    assert!(fresh.accessible_domains(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_effective_view_domains_defaults_to_full_set() {
    let graph = three_level_graph().await;
    graph.add_grant(10, 1).await;
    let gate = gate_over(&graph);

    let view = gate.effective_view_domains(10, None).await.unwrap();
    assert_eq!(view, HashSet::from([1, 2, 3]));
}

#[tokio::test]
async fn test_effective_view_domains_intersects_requested() {
    let graph = three_level_graph().await;
    graph.add_grant(10, 1).await;
    let gate = gate_over(&graph);

    let view = gate
        .effective_view_domains(10, Some(&[2, 4]))
        .await
        .unwrap();
    assert_eq!(view, HashSet::from([2]));
}

#[tokio::test]
async fn test_empty_intersection_is_not_an_error() {
    let graph = three_level_graph().await;
    graph.add_grant(10, 2).await;
    let gate = gate_over(&graph);

    let view = gate.effective_view_domains(10, Some(&[4])).await.unwrap();
    assert!(view.is_empty());
}

#[tokio::test]
async fn test_validate_write_domain_accepts_descendant() {
    let graph = three_level_graph().await;
    graph.add_grant(10, 1).await;
    let gate = gate_over(&graph);

    assert_eq!(gate.validate_write_domain(10, Some(3)).await.unwrap(), 3);
}

#[tokio::test]
async fn test_validate_write_domain_denies_unrelated() {
    let graph = three_level_graph().await;
    graph.add_grant(10, 1).await;
    let gate = gate_over(&graph);

    let err = gate.validate_write_domain(10, Some(4)).await.unwrap_err();
    match err {
        DomainError::AccessDenied { domain_id } => assert_eq!(domain_id, Some(4)),
        other => panic!("expected AccessDenied, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validate_write_domain_denies_missing_domain() {
    let graph = three_level_graph().await;
    graph.add_grant(10, 1).await;
    let gate = gate_over(&graph);

    let err = gate.validate_write_domain(10, None).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::AccessDenied { domain_id: None }
    ));
}
