//! In-memory integration tests for agent and capability registration.

use super::helpers::{Registry, agent_request, registry, registry_with};
use mcp_registry::agent_registry::{
    domain::{NewCapability, Page},
    ports::{RegistryStore, RegistryStoreError},
    services::{CreateAgentMode, RegistryServiceError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn translate_is_reused_and_summarize_created(registry: Registry) {
    registry
        .service
        .create_capability(NewCapability::new("translate").with_description("translates text"))
        .await
        .expect("capability registration should succeed");

    let created = registry
        .service
        .create_agent(agent_request("a1", "1.0", &["translate", "summarize"]))
        .await
        .expect("agent registration should succeed");

    let names = created.capability_names();
    assert_eq!(names, vec!["translate", "summarize"]);

    let all = registry
        .store
        .list_capabilities(Page::default())
        .await
        .expect("capability listing should succeed");
    assert_eq!(all.len(), 2);

    let translate = registry
        .service
        .find_capability_by_name("translate")
        .await
        .expect("lookup should succeed")
        .expect("translate exists");
    assert_eq!(translate.description(), Some("translates text"));
}

#[rstest]
#[case(CreateAgentMode::Atomic)]
#[case(CreateAgentMode::StepWise)]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_agent_leaves_exactly_one_row(#[case] mode: CreateAgentMode) {
    let registry = registry_with(mode);
    registry
        .service
        .create_agent(agent_request("a1", "1.0", &[]))
        .await
        .expect("first registration should succeed");

    let duplicate = registry
        .service
        .create_agent(agent_request("a1", "1.0", &[]))
        .await;

    assert!(matches!(
        duplicate,
        Err(RegistryServiceError::Store(RegistryStoreError::DuplicateAgent { .. }))
    ));
    let listed = registry
        .service
        .list_agents(Page::default())
        .await
        .expect("listing should succeed");
    let matching = listed
        .iter()
        .filter(|agent| agent.name() == "a1" && agent.version() == "1.0")
        .count();
    assert_eq!(matching, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn existing_capability_keeps_a_single_row(registry: Registry) {
    for version in ["1.0", "1.1", "2.0"] {
        registry
            .service
            .create_agent(agent_request("a1", version, &["translate"]))
            .await
            .expect("registration should succeed");
    }

    let all = registry
        .service
        .list_capabilities(Page::default())
        .await
        .expect("listing should succeed");
    assert_eq!(all.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_fields_round_trip(registry: Registry) {
    let created = registry
        .service
        .create_agent(agent_request("a1", "1.0", &["translate"]))
        .await
        .expect("registration should succeed");

    let found = registry
        .service
        .find_agent(created.id())
        .await
        .expect("lookup should succeed")
        .expect("agent exists");

    assert_eq!(found.fields(), created.fields());
    assert_eq!(found.fields().tags(), Some(&["integration".to_owned()][..]));
    assert_eq!(found.created_at(), created.created_at());
}
