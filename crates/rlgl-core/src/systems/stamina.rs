//! Stamina system - ticks every regulator and enforces the exhaustion cutoff

use hecs::{Entity, World};
use rlgl_logic::locomotion::Locomotion;
use rlgl_logic::stamina::{StaminaRegulator, StaminaTick};

use crate::components::Velocity;

/// Tick stamina for every participant that has it. Participants that ran
/// dry mid-sprint are dropped back to walking speed and returned; an empty
/// tank with no sprint to revoke is not reported again.
pub fn stamina_system(world: &mut World, delta_seconds: f32) -> Vec<Entity> {
    let mut exhausted = Vec::new();

    for (entity, (stamina, vel, loco)) in
        world.query_mut::<(&mut StaminaRegulator, &Velocity, &mut Locomotion)>()
    {
        if stamina.tick(delta_seconds, vel.speed()) == StaminaTick::Exhausted
            && loco.is_sprinting()
        {
            log::debug!("{:?} exhausted; sprint revoked", entity);
            loco.revoke_sprint();
            exhausted.push(entity);
        }
    }

    exhausted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vec3;
    use rlgl_logic::config::{MovementConfig, StaminaConfig};

    #[test]
    fn test_exhaustion_revokes_sprint() {
        let mut world = World::new();
        let mut loco = Locomotion::new(&MovementConfig::default());
        loco.start_sprint();
        let mut stamina = StaminaRegulator::new(&StaminaConfig::default()).with_current(0.5);
        stamina.start_depleting();
        let e = world.spawn((stamina, Velocity(Vec3::new(1000.0, 0.0, 0.0)), loco));

        let exhausted = stamina_system(&mut world, 1.0);

        assert_eq!(exhausted, vec![e]);
        assert!(!world.get::<&Locomotion>(e).unwrap().is_sprinting());
        assert_eq!(world.get::<&StaminaRegulator>(e).unwrap().current(), 0.0);
    }

    #[test]
    fn test_empty_tank_without_sprint_not_reported() {
        let mut world = World::new();
        let mut stamina = StaminaRegulator::new(&StaminaConfig::default()).with_current(0.0);
        stamina.start_depleting();
        let e = world.spawn((
            stamina,
            Velocity::default(),
            Locomotion::new(&MovementConfig::default()),
        ));

        assert!(stamina_system(&mut world, 0.5).is_empty());
        assert_eq!(world.get::<&StaminaRegulator>(e).unwrap().current(), 0.0);
    }

    #[test]
    fn test_standing_still_keeps_stamina() {
        let mut world = World::new();
        let mut stamina = StaminaRegulator::new(&StaminaConfig::default()).with_current(4.0);
        stamina.start_depleting();
        let e = world.spawn((
            stamina,
            Velocity::default(),
            Locomotion::new(&MovementConfig::default()),
        ));

        assert!(stamina_system(&mut world, 1.0).is_empty());
        assert_eq!(world.get::<&StaminaRegulator>(e).unwrap().current(), 4.0);
    }
}
