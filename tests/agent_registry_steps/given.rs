//! Given steps for agent registry BDD scenarios.

use super::world::{RegistryWorld, build_request, run_async};
use eyre::WrapErr;
use mcp_registry::agent_registry::domain::NewCapability;
use rstest_bdd_macros::given;

#[given(r#"a capability named "{name}""#)]
fn a_capability_named(world: &mut RegistryWorld, name: String) -> Result<(), eyre::Report> {
    run_async(world.service.create_capability(NewCapability::new(name)))
        .wrap_err("register capability for scenario")?;
    Ok(())
}

#[given(r#"a registered agent "{name}" version "{version}" with capabilities "{capabilities}""#)]
fn registered_agent(
    world: &mut RegistryWorld,
    name: String,
    version: String,
    capabilities: String,
) -> Result<(), eyre::Report> {
    let request = build_request(&name, &version, &capabilities);
    let created =
        run_async(world.service.create_agent(request)).wrap_err("register agent for scenario")?;
    world.last_registered = Some(created);
    Ok(())
}

#[given("the agent is marked deleted")]
fn agent_marked_deleted(world: &mut RegistryWorld) -> Result<(), eyre::Report> {
    let agent = world
        .last_registered
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no registered agent in scenario world"))?;
    world
        .store
        .set_deleted_flag(agent.id(), true)
        .wrap_err("mark agent deleted")?;
    Ok(())
}
