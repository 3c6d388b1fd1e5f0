//! Pure round-control logic for RLGL.
//!
//! This crate contains the gameplay-control layer of a "red light, green
//! light" shooter round, independent of any ECS or engine. Everything that
//! touches the world goes through the [`actors::ActorSystem`] trait and every
//! random draw goes through an injected [`rand::Rng`], so the controller is
//! unit-testable with a mock world and a seeded generator.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`actors`] | Injected actor capability: spawn, destroy, reload, tag/class queries |
//! | [`config`] | JSON tunables for stamina, movement, bodies and projectiles |
//! | [`geometry`] | `Vec3`, boxes and overlap tests |
//! | [`impact`] | Collision classification: reload, cosmetic, destroy, ignore |
//! | [`locomotion`] | Movement caps, sprint toggling, axis input, yaw/pitch |
//! | [`observers`] | Reset-notification registry (ordered, re-entrancy safe) |
//! | [`round`] | Round controller: begin, reset, reload, hit handling |
//! | [`spawn`] | Spawnpoint registry and round spawner assignment |
//! | [`stamina`] | Per-participant stamina state machine |
//! | [`timer`] | One-shot deferred timer advanced by its owner's tick |

pub mod actors;
pub mod config;
pub mod geometry;
pub mod impact;
pub mod locomotion;
pub mod observers;
pub mod round;
pub mod spawn;
pub mod stamina;
pub mod timer;
