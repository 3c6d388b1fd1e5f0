//! Common components used across multiple entity types.

pub use rlgl_logic::geometry::{Aabb, Collider, Vec3};

/// World-space location of an entity
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(pub Vec3);

/// Velocity in units per second, written by the movement system
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec3);

impl Velocity {
    pub fn speed(&self) -> f32 {
        self.0.length()
    }
}

/// Free-form labels; spawn points are found by tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tags(pub Vec<String>);

impl Tags {
    pub fn has(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }
}

/// Discovery order of level-authored entities, stable across reloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LevelOrder(pub usize);

/// Display name for level-authored entities
#[derive(Debug, Clone, PartialEq)]
pub struct Name(pub String);
