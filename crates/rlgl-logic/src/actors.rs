//! The actor capability the round controller is given.
//!
//! The controller never constructs or owns actors; it asks an
//! [`ActorSystem`] to spawn, move, query and destroy them. `rlgl-core`
//! implements this over a `hecs` world; tests implement it with plain vectors.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// Which kind of participant a spawn request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantClass {
    /// The player-controlled participant (the default pawn class).
    Human,
    /// A computer-controlled participant.
    Computer,
}

/// World operations used by the round controller.
pub trait ActorSystem {
    /// Handle to an actor. Stable until the actor is destroyed.
    type Id: Copy + Eq + std::fmt::Debug;

    /// Spawn a participant at `position`; `None` if something already
    /// occupies that spot.
    fn spawn_actor_at(&mut self, class: ParticipantClass, position: Vec3) -> Option<Self::Id>;

    /// Remove an actor. Returns false if it no longer exists.
    fn destroy(&mut self, actor: Self::Id) -> bool;

    /// Throw the whole world away and rebuild it from its starting layout.
    fn reload_world(&mut self);

    /// Actors carrying `tag`, in a stable discovery order.
    fn find_actors_by_tag(&self, tag: &str) -> Vec<Self::Id>;

    fn actors_of_class(&self, class: ParticipantClass) -> Vec<Self::Id>;

    fn class_of(&self, actor: Self::Id) -> Option<ParticipantClass>;

    fn location(&self, actor: Self::Id) -> Option<Vec3>;

    fn set_location(&mut self, actor: Self::Id, position: Vec3) -> bool;

    /// Whether the actor's root body is immovable scenery.
    fn is_root_static(&self, actor: Self::Id) -> bool;

    /// Play the cosmetic impact effect at `point`.
    fn spawn_impact_effect(&mut self, point: Vec3);
}
