//! Arena world - the hecs-backed `ActorSystem` the round controller drives

use hecs::{Entity, World};
use rlgl_logic::actors::{ActorSystem, ParticipantClass};
use rlgl_logic::config::{BodyConfig, GameConfig};
use rlgl_logic::locomotion::Locomotion;
use rlgl_logic::stamina::StaminaRegulator;

use crate::components::*;
use crate::level::LevelLayout;

pub struct ArenaWorld {
    world: World,
    layout: LevelLayout,
    config: GameConfig,
    /// Impact effects waiting for the renderer
    effects: Vec<Vec3>,
}

impl ArenaWorld {
    /// Create a world and build `layout` into it.
    pub fn new(layout: LevelLayout, config: GameConfig) -> Self {
        let mut world = World::new();
        layout.build(&mut world);
        Self {
            world,
            layout,
            config,
            effects: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn pending_effects(&self) -> &[Vec3] {
        &self.effects
    }

    /// Hand queued impact effects to the caller.
    pub fn drain_effects(&mut self) -> Vec<Vec3> {
        std::mem::take(&mut self.effects)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    fn body_config(&self, class: ParticipantClass) -> BodyConfig {
        match class {
            ParticipantClass::Human => self.config.human,
            ParticipantClass::Computer => self.config.computer,
        }
    }

    /// Would a sphere at `center` overlap any collision-enabled body?
    pub fn is_blocked(&self, center: Vec3, radius: f32) -> bool {
        self.world
            .query::<(&Position, &Body)>()
            .iter()
            .any(|(_, (pos, body))| {
                body.collision_enabled && body.collider.overlaps_sphere(pos.0, center, radius)
            })
    }

    /// Launch a projectile from `origin` along `direction`.
    pub fn spawn_projectile(&mut self, origin: Vec3, direction: Vec3) -> Entity {
        let p = self.config.projectile;
        let velocity = direction.normalize() * p.speed;
        self.world.spawn((
            Position(origin),
            Projectile::new(velocity, p.radius, p.lifespan),
        ))
    }

    /// Let a participant go limp: no more movement, no capsule collision,
    /// the body is handed to physics simulation.
    pub fn ragdoll(&mut self, entity: Entity) -> bool {
        let Ok(mut body) = self.world.get::<&mut Body>(entity) else {
            return false;
        };
        body.collision_enabled = false;
        body.simulating_physics = true;
        drop(body);

        if let Ok(mut velocity) = self.world.get::<&mut Velocity>(entity) {
            velocity.0 = Vec3::ZERO;
        }
        if let Ok(mut loco) = self.world.get::<&mut Locomotion>(entity) {
            loco.enabled = false;
            loco.revoke_sprint();
        }
        true
    }

    fn sorted(mut entities: Vec<(usize, Entity)>) -> Vec<Entity> {
        entities.sort_by_key(|(order, _)| *order);
        entities.into_iter().map(|(_, e)| e).collect()
    }
}

impl ActorSystem for ArenaWorld {
    type Id = Entity;

    fn spawn_actor_at(&mut self, class: ParticipantClass, position: Vec3) -> Option<Entity> {
        let body = self.body_config(class);
        if self.is_blocked(position, body.radius) {
            return None;
        }

        let position = Position(position);
        let body = Body::participant(body.radius, body.simulating_physics);
        let entity = match class {
            ParticipantClass::Human => self.world.spawn((
                position,
                Velocity::default(),
                Participant::human(),
                body,
                Locomotion::new(&self.config.movement),
                StaminaRegulator::new(&self.config.stamina),
            )),
            ParticipantClass::Computer => self.world.spawn((
                position,
                Velocity::default(),
                Participant::computer(),
                body,
            )),
        };
        Some(entity)
    }

    fn destroy(&mut self, actor: Entity) -> bool {
        self.world.despawn(actor).is_ok()
    }

    fn reload_world(&mut self) {
        self.world.clear();
        self.effects.clear();
        self.layout.build(&mut self.world);
    }

    fn find_actors_by_tag(&self, tag: &str) -> Vec<Entity> {
        let found = self
            .world
            .query::<(&Tags, &LevelOrder)>()
            .iter()
            .filter(|(_, (tags, _))| tags.has(tag))
            .map(|(e, (_, order))| (order.0, e))
            .collect();
        Self::sorted(found)
    }

    fn actors_of_class(&self, class: ParticipantClass) -> Vec<Entity> {
        let found = self
            .world
            .query::<&Participant>()
            .iter()
            .filter(|(_, p)| p.class == class)
            .map(|(e, _)| (e.id() as usize, e))
            .collect();
        Self::sorted(found)
    }

    fn class_of(&self, actor: Entity) -> Option<ParticipantClass> {
        self.world.get::<&Participant>(actor).ok().map(|p| p.class)
    }

    fn location(&self, actor: Entity) -> Option<Vec3> {
        self.world.get::<&Position>(actor).ok().map(|p| p.0)
    }

    fn set_location(&mut self, actor: Entity, position: Vec3) -> bool {
        match self.world.get::<&mut Position>(actor) {
            Ok(mut pos) => {
                pos.0 = position;
                true
            }
            Err(_) => false,
        }
    }

    fn is_root_static(&self, actor: Entity) -> bool {
        self.world
            .get::<&Body>(actor)
            .map(|b| b.mobility == Mobility::Static)
            .unwrap_or(false)
    }

    fn spawn_impact_effect(&mut self, point: Vec3) {
        self.effects.push(point);
    }
}
