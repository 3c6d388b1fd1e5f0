//! Participant, body and projectile components.

use hecs::Entity;
use rlgl_logic::actors::ParticipantClass;

use super::common::{Collider, Vec3};

/// Marks an entity as a round participant of the given class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    pub class: ParticipantClass,
}

impl Participant {
    pub fn human() -> Self {
        Self {
            class: ParticipantClass::Human,
        }
    }

    pub fn computer() -> Self {
        Self {
            class: ParticipantClass::Computer,
        }
    }
}

/// Whether a body can ever move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mobility {
    Static,
    Movable,
}

/// Collision body. Bodies without `collision_enabled` are invisible to
/// spawn checks and projectiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub collider: Collider,
    pub mobility: Mobility,
    pub simulating_physics: bool,
    pub collision_enabled: bool,
}

impl Body {
    /// Immovable scenery box.
    pub fn scenery(half_extents: Vec3) -> Self {
        Self {
            collider: Collider::Box { half_extents },
            mobility: Mobility::Static,
            simulating_physics: false,
            collision_enabled: true,
        }
    }

    /// Participant capsule, approximated as a sphere.
    pub fn participant(radius: f32, simulating_physics: bool) -> Self {
        Self {
            collider: Collider::Sphere { radius },
            mobility: Mobility::Movable,
            simulating_physics,
            collision_enabled: true,
        }
    }
}

/// In-flight projectile. No bounce; removed after `lifespan` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub velocity: Vec3,
    pub radius: f32,
    pub age: f32,
    pub lifespan: f32,
    /// Bodies overlapped at the end of the last step; a contact is only
    /// reported when it starts.
    pub contacts: Vec<Entity>,
}

impl Projectile {
    pub fn new(velocity: Vec3, radius: f32, lifespan: f32) -> Self {
        Self {
            velocity,
            radius,
            age: 0.0,
            lifespan,
            contacts: Vec::new(),
        }
    }
}
