//! Agent registry: registration of agents and discovery by capability.
//!
//! Agents are service endpoints described by an `OpenAPI` document. Each agent
//! provides any number of named capabilities, and capabilities are shared by
//! name across agents. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
