//! Adapter implementations for the registry store port.

pub mod memory;
pub mod postgres;
