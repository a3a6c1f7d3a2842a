//! `PostgreSQL` integration tests for listing, search, and visibility.

use super::helpers::{RegistryDatabase, agent_request, count_rows, set_deleted};
use mcp_registry::agent_registry::{
    domain::{AgentId, CapabilityId, DeletedAgentVisibility, Page},
    ports::{RegistryStore, RegistryStoreError},
    services::CreateAgentMode,
};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

#[rstest]
fn pages_concatenate_in_id_order(shared_test_cluster: &'static TestCluster) {
    let db = RegistryDatabase::prepare(shared_test_cluster, "pages").expect("database setup");
    let service = db.service(CreateAgentMode::Atomic);

    db.run(async {
        for index in 0..5 {
            service
                .create_agent(agent_request(&format!("agent_{index}"), "1.0", &[]))
                .await
                .expect("registration");
        }

        let first = service.list_agents(Page::new(0, 2)).await.expect("page 1");
        let second = service.list_agents(Page::new(2, 2)).await.expect("page 2");
        let combined = service.list_agents(Page::new(0, 4)).await.expect("combined");
        let beyond = service.list_agents(Page::new(10, 2)).await.expect("beyond");

        let paged: Vec<_> = first.iter().chain(&second).map(|agent| agent.id()).collect();
        let whole: Vec<_> = combined.iter().map(|agent| agent.id()).collect();
        assert_eq!(paged, whole);
        assert!(whole.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(beyond.is_empty());
    });
}

#[rstest]
fn search_matches_exact_name_only(shared_test_cluster: &'static TestCluster) {
    let db = RegistryDatabase::prepare(shared_test_cluster, "search").expect("database setup");
    let service = db.service(CreateAgentMode::Atomic);

    db.run(async {
        service
            .create_agent(agent_request("a1", "1.0", &["translate", "summarize"]))
            .await
            .expect("registration");
        service
            .create_agent(agent_request("a2", "1.0", &["Translate"]))
            .await
            .expect("registration");

        let found = service
            .search_agents_by_capability("translate")
            .await
            .expect("search");
        let unknown = service
            .search_agents_by_capability("nonexistent")
            .await
            .expect("search");

        let names: Vec<&str> = found.iter().map(|agent| agent.name()).collect();
        assert_eq!(names, vec!["a1"]);
        assert!(unknown.is_empty());
    });
}

#[rstest]
fn duplicate_links_are_stored_but_read_once(shared_test_cluster: &'static TestCluster) {
    let db = RegistryDatabase::prepare(shared_test_cluster, "links").expect("database setup");
    let service = db.service(CreateAgentMode::Atomic);

    db.run(async {
        let agent = service
            .create_agent(agent_request("a1", "1.0", &["translate"]))
            .await
            .expect("registration");
        let capability = agent
            .capabilities()
            .first()
            .expect("agent has a capability")
            .id();
        db.store
            .link_agent_capability(agent.id(), capability)
            .await
            .expect("second link");

        assert_eq!(count_rows(db.pool(), "agent_capabilities"), 2);
        let found = service
            .search_agents_by_capability("translate")
            .await
            .expect("search");
        assert_eq!(found.len(), 1);
        let reloaded = service
            .find_agent(agent.id())
            .await
            .expect("lookup")
            .expect("agent exists");
        assert_eq!(reloaded.capability_names(), vec!["translate"]);
    });
}

#[rstest]
fn linking_unknown_rows_is_rejected(shared_test_cluster: &'static TestCluster) {
    let db = RegistryDatabase::prepare(shared_test_cluster, "fk").expect("database setup");

    db.run(async {
        let result = db
            .store
            .link_agent_capability(AgentId::new(999), CapabilityId::new(999))
            .await;

        assert!(matches!(
            result,
            Err(RegistryStoreError::UnknownLinkTarget { .. })
        ));
    });
}

#[rstest]
#[case(DeletedAgentVisibility::Include, 2)]
#[case(DeletedAgentVisibility::Exclude, 1)]
fn soft_deleted_visibility_applies_to_reads(
    shared_test_cluster: &'static TestCluster,
    #[case] visibility: DeletedAgentVisibility,
    #[case] expected: usize,
) {
    let db = RegistryDatabase::prepare(shared_test_cluster, "visible").expect("database setup");
    let service = db
        .service(CreateAgentMode::Atomic)
        .with_deleted_agents(visibility);

    db.run(async {
        let retired = service
            .create_agent(agent_request("a1", "1.0", &["translate"]))
            .await
            .expect("registration");
        service
            .create_agent(agent_request("a2", "1.0", &["translate"]))
            .await
            .expect("registration");
        set_deleted(db.pool(), retired.id(), true);

        let listed = service.list_agents(Page::default()).await.expect("list");
        let found = service
            .search_agents_by_capability("translate")
            .await
            .expect("search");

        assert_eq!(listed.len(), expected);
        assert_eq!(found.len(), expected);
    });
}

#[rstest]
fn soft_deleted_agent_still_blocks_its_key(shared_test_cluster: &'static TestCluster) {
    let db = RegistryDatabase::prepare(shared_test_cluster, "blocked").expect("database setup");
    let service = db.service(CreateAgentMode::Atomic);

    db.run(async {
        let retired = service
            .create_agent(agent_request("a1", "1.0", &[]))
            .await
            .expect("registration");
        set_deleted(db.pool(), retired.id(), true);

        let result = service.create_agent(agent_request("a1", "1.0", &[])).await;

        assert!(result.is_err_and(|err| err.is_uniqueness_violation()));
    });

    assert_eq!(count_rows(db.pool(), "agents"), 1);
}
