//! Component definitions for the arena ECS.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod actors;
mod common;

pub use actors::*;
pub use common::*;
