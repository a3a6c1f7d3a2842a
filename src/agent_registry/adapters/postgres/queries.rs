//! Synchronous Diesel queries shared by the registry store operations.
//!
//! Every function takes a borrowed connection so the same statements run
//! either on a pooled connection or inside a transaction.

use super::{
    models::{AgentCapabilityRow, AgentRow, CapabilityRow, NewAgentRow, NewCapabilityRow},
    schema::{agent_capabilities, agents, capabilities},
};
use crate::agent_registry::{
    domain::{
        Agent, AgentId, Capability, CapabilityId, DeletedAgentVisibility, NewAgent,
        NewCapability, Page, dedup_capabilities,
    },
    ports::{RegistryStoreError, RegistryStoreResult},
};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::{HashMap, HashSet};

const AGENT_NAME_VERSION_CONSTRAINT: &str = "uq_agents_name_version";
const CAPABILITY_NAME_CONSTRAINT: &str = "uq_capabilities_name";

pub(super) fn insert_agent(
    connection: &mut PgConnection,
    agent: &NewAgent,
) -> RegistryStoreResult<Agent> {
    let fields = agent.fields();
    let row = diesel::insert_into(agents::table)
        .values(&NewAgentRow::from(agent))
        .returning(AgentRow::as_returning())
        .get_result::<AgentRow>(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                if violates(info.as_ref(), AGENT_NAME_VERSION_CONSTRAINT) =>
            {
                RegistryStoreError::duplicate_agent(fields.name(), fields.version())
            }
            _ => RegistryStoreError::persistence(err),
        })?;
    Ok(row.into_agent(Vec::new()))
}

pub(super) fn insert_capability(
    connection: &mut PgConnection,
    capability: &NewCapability,
) -> RegistryStoreResult<Capability> {
    let row = diesel::insert_into(capabilities::table)
        .values(&NewCapabilityRow::from(capability))
        .returning(CapabilityRow::as_returning())
        .get_result::<CapabilityRow>(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                if violates(info.as_ref(), CAPABILITY_NAME_CONSTRAINT) =>
            {
                RegistryStoreError::DuplicateCapability(capability.name().to_owned())
            }
            _ => RegistryStoreError::persistence(err),
        })?;
    Ok(row.into())
}

/// Gets or creates every named capability in one batch.
///
/// Inputs are reduced to one per name and inserted in name order with
/// `ON CONFLICT DO NOTHING`, so concurrent batches take the unique index
/// locks in the same order. A conflicting insert waits for the other
/// transaction and then skips, so the read back finds every row. The result
/// is ordered by capability id.
pub(super) fn get_or_create_capabilities(
    connection: &mut PgConnection,
    inputs: &[NewCapability],
) -> RegistryStoreResult<Vec<Capability>> {
    let mut rows: Vec<NewCapabilityRow> = Vec::with_capacity(inputs.len());
    let mut seen = HashSet::new();
    for input in inputs {
        if seen.insert(input.name()) {
            rows.push(NewCapabilityRow::from(input));
        }
    }
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    rows.sort_by(|left, right| left.name.cmp(&right.name));

    diesel::insert_into(capabilities::table)
        .values(&rows)
        .on_conflict(capabilities::name)
        .do_nothing()
        .execute(connection)
        .map_err(RegistryStoreError::persistence)?;

    let names: Vec<String> = rows.into_iter().map(|row| row.name).collect();
    let expected = names.len();
    let found = capabilities::table
        .filter(capabilities::name.eq_any(names))
        .order(capabilities::id.asc())
        .select(CapabilityRow::as_select())
        .load::<CapabilityRow>(connection)
        .map_err(RegistryStoreError::persistence)?;
    if found.len() != expected {
        return Err(RegistryStoreError::persistence(std::io::Error::other(format!(
            "expected {expected} capabilities after upsert, found {}",
            found.len()
        ))));
    }
    Ok(found.into_iter().map(Capability::from).collect())
}

pub(super) fn find_capability_by_name(
    connection: &mut PgConnection,
    name: &str,
) -> RegistryStoreResult<Option<Capability>> {
    let row = capabilities::table
        .filter(capabilities::name.eq(name))
        .select(CapabilityRow::as_select())
        .first::<CapabilityRow>(connection)
        .optional()
        .map_err(RegistryStoreError::persistence)?;
    Ok(row.map(Capability::from))
}

pub(super) fn find_capability_by_id(
    connection: &mut PgConnection,
    id: CapabilityId,
) -> RegistryStoreResult<Option<Capability>> {
    let row = capabilities::table
        .filter(capabilities::id.eq(id.into_inner()))
        .select(CapabilityRow::as_select())
        .first::<CapabilityRow>(connection)
        .optional()
        .map_err(RegistryStoreError::persistence)?;
    Ok(row.map(Capability::from))
}

pub(super) fn list_capabilities(
    connection: &mut PgConnection,
    page: Page,
) -> RegistryStoreResult<Vec<Capability>> {
    let rows = capabilities::table
        .order(capabilities::id.asc())
        .offset(i64::from(page.offset()))
        .limit(i64::from(page.limit()))
        .select(CapabilityRow::as_select())
        .load::<CapabilityRow>(connection)
        .map_err(RegistryStoreError::persistence)?;
    Ok(rows.into_iter().map(Capability::from).collect())
}

pub(super) fn find_agent_by_id(
    connection: &mut PgConnection,
    id: AgentId,
) -> RegistryStoreResult<Option<Agent>> {
    let row = agents::table
        .filter(agents::id.eq(id.into_inner()))
        .select(AgentRow::as_select())
        .first::<AgentRow>(connection)
        .optional()
        .map_err(RegistryStoreError::persistence)?;
    match row {
        Some(found) => Ok(with_capabilities(connection, vec![found])?.into_iter().next()),
        None => Ok(None),
    }
}

pub(super) fn list_agents(
    connection: &mut PgConnection,
    page: Page,
    visibility: DeletedAgentVisibility,
) -> RegistryStoreResult<Vec<Agent>> {
    let mut query = agents::table.order(agents::id.asc()).into_boxed();
    if visibility == DeletedAgentVisibility::Exclude {
        query = query.filter(agents::is_deleted.eq(false));
    }
    let rows = query
        .offset(i64::from(page.offset()))
        .limit(i64::from(page.limit()))
        .select(AgentRow::as_select())
        .load::<AgentRow>(connection)
        .map_err(RegistryStoreError::persistence)?;
    with_capabilities(connection, rows)
}

pub(super) fn find_agents_by_capability_name(
    connection: &mut PgConnection,
    name: &str,
    visibility: DeletedAgentVisibility,
) -> RegistryStoreResult<Vec<Agent>> {
    let linked_agent_ids = agent_capabilities::table
        .inner_join(capabilities::table)
        .filter(capabilities::name.eq(name))
        .select(agent_capabilities::agent_id);

    let mut query = agents::table
        .filter(agents::id.eq_any(linked_agent_ids))
        .order(agents::id.asc())
        .into_boxed();
    if visibility == DeletedAgentVisibility::Exclude {
        query = query.filter(agents::is_deleted.eq(false));
    }
    let rows = query
        .select(AgentRow::as_select())
        .load::<AgentRow>(connection)
        .map_err(RegistryStoreError::persistence)?;
    with_capabilities(connection, rows)
}

pub(super) fn link_agent_capability(
    connection: &mut PgConnection,
    agent_id: AgentId,
    capability_id: CapabilityId,
) -> RegistryStoreResult<()> {
    let row = AgentCapabilityRow {
        agent_id: agent_id.into_inner(),
        capability_id: capability_id.into_inner(),
    };
    diesel::insert_into(agent_capabilities::table)
        .values(&row)
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                RegistryStoreError::UnknownLinkTarget {
                    agent_id,
                    capability_id,
                }
            }
            _ => RegistryStoreError::persistence(err),
        })?;
    Ok(())
}

/// Attaches linked capabilities to each agent row, preserving row order.
fn with_capabilities(
    connection: &mut PgConnection,
    rows: Vec<AgentRow>,
) -> RegistryStoreResult<Vec<Agent>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let agent_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let pairs = agent_capabilities::table
        .inner_join(capabilities::table)
        .filter(agent_capabilities::agent_id.eq_any(agent_ids))
        .order(capabilities::id.asc())
        .select((agent_capabilities::agent_id, CapabilityRow::as_select()))
        .load::<(i64, CapabilityRow)>(connection)
        .map_err(RegistryStoreError::persistence)?;

    let mut by_agent: HashMap<i64, Vec<Capability>> = HashMap::new();
    for (agent_id, capability) in pairs {
        by_agent
            .entry(agent_id)
            .or_default()
            .push(Capability::from(capability));
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let linked = by_agent.remove(&row.id).unwrap_or_default();
            row.into_agent(dedup_capabilities(linked))
        })
        .collect())
}

fn violates(info: &dyn diesel::result::DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}
