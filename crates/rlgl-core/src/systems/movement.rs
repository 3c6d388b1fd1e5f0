//! Movement system - turns accumulated input into velocity and position

use hecs::World;
use rlgl_logic::locomotion::Locomotion;

use crate::components::{Position, Velocity};

/// Apply this frame's input to every controllable participant.
pub fn movement_system(world: &mut World, delta_seconds: f32) {
    for (_, (pos, vel, loco)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut Locomotion)>()
    {
        vel.0 = loco.consume_velocity();
        pos.0 += vel.0 * delta_seconds;
    }
}
