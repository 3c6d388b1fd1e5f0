//! RLGL Core - arena simulation for the round controller
//!
//! Hosts the pure controller from `rlgl-logic` on top of a `hecs` world:
//! - **Entities**: spawn markers, static obstacles, participants, projectiles
//! - **Components**: pure data (Position, Body, Locomotion, StaminaRegulator, ...)
//! - **Systems**: per-frame movement, stamina and projectile stepping
//!
//! [`engine::MatchEngine`] is the frame-stepped entry point. [`world::ArenaWorld`]
//! is the `ActorSystem` the controller is given.
//!
//! # Example
//!
//! ```rust,no_run
//! use rlgl_core::prelude::*;
//!
//! let layout = LevelLayout::load("data/arena.json").unwrap();
//! let mut engine = MatchEngine::new(GameConfig::default(), layout);
//! engine.begin_round();
//!
//! loop {
//!     engine.move_forward(1.0);
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod engine;
pub mod level;
pub mod systems;
pub mod world;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{FrameReport, MatchEngine};
    pub use crate::level::LevelLayout;
    pub use crate::world::ArenaWorld;
    pub use rlgl_logic::actors::{ActorSystem, ParticipantClass};
    pub use rlgl_logic::config::GameConfig;
    pub use rlgl_logic::impact::{HitReport, ImpactOutcome, Surface};
}
