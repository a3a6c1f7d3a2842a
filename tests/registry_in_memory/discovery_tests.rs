//! In-memory integration tests for listing and capability search.

use super::helpers::{Registry, agent_request, registry};
use mcp_registry::agent_registry::domain::Page;
use rstest::rstest;

async fn register_many(registry: &Registry, count: usize) {
    for index in 0..count {
        registry
            .service
            .create_agent(agent_request(
                &format!("agent_{index}"),
                "1.0",
                &["translate"],
            ))
            .await
            .expect("registration should succeed");
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pages_are_disjoint_and_ordered(registry: Registry) {
    register_many(&registry, 6).await;

    let first = registry
        .service
        .list_agents(Page::new(0, 2))
        .await
        .expect("page 1");
    let second = registry
        .service
        .list_agents(Page::new(2, 2))
        .await
        .expect("page 2");
    let combined = registry
        .service
        .list_agents(Page::new(0, 4))
        .await
        .expect("combined");

    let ids: Vec<_> = first.iter().chain(&second).map(|agent| agent.id()).collect();
    let combined_ids: Vec<_> = combined.iter().map(|agent| agent.id()).collect();
    assert_eq!(ids, combined_ids);
    assert!(combined_ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn default_page_returns_at_most_one_hundred(registry: Registry) {
    register_many(&registry, 101).await;

    let listed = registry
        .service
        .list_agents(Page::default())
        .await
        .expect("listing should succeed");

    assert_eq!(listed.len(), 100);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_returns_only_agents_with_capability(registry: Registry) {
    registry
        .service
        .create_agent(agent_request("a1", "1.0", &["translate", "summarize"]))
        .await
        .expect("registration should succeed");
    registry
        .service
        .create_agent(agent_request("a2", "1.0", &["translate"]))
        .await
        .expect("registration should succeed");

    let summarizers = registry
        .service
        .search_agents_by_capability("summarize")
        .await
        .expect("search should succeed");
    let translators = registry
        .service
        .search_agents_by_capability("translate")
        .await
        .expect("search should succeed");
    let unknown = registry
        .service
        .search_agents_by_capability("nonexistent")
        .await
        .expect("search should succeed");

    let summarizer_names: Vec<&str> = summarizers.iter().map(|agent| agent.name()).collect();
    assert_eq!(summarizer_names, vec!["a1"]);
    assert_eq!(translators.len(), 2);
    assert!(unknown.is_empty());
}
