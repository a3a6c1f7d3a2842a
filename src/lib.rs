//! MCP registry: a catalogue of agents and the capabilities they provide.
//!
//! Agents are service endpoints described by an `OpenAPI` document. The
//! registry records them together with named capabilities, reuses existing
//! capabilities by name, and finds agents by capability. Transport,
//! request validation, and process startup live outside this crate and call
//! in through [`agent_registry::services::RegistryService`].
//!
//! # Architecture
//!
//! The registry follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL`, memory)
//!
//! # Modules
//!
//! - [`agent_registry`]: Agent and capability registration and discovery
//! - [`config`]: Environment-driven runtime configuration

pub mod agent_registry;
pub mod config;
