//! Step definitions for agent registry behaviour scenarios.

mod given;
pub mod world;
