//! Match engine - main entry point for running a round

use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rlgl_logic::actors::{ActorSystem, ParticipantClass};
use rlgl_logic::config::GameConfig;
use rlgl_logic::impact::{HitReport, ImpactOutcome};
use rlgl_logic::locomotion::Locomotion;
use rlgl_logic::observers::ListenerId;
use rlgl_logic::round::{RoundController, RoundState, RoundStats};
use rlgl_logic::stamina::StaminaRegulator;

use crate::components::*;
use crate::level::LevelLayout;
use crate::systems::*;
use crate::world::ArenaWorld;

/// What happened during one [`MatchEngine::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Participants that ran dry mid-sprint and were dropped to walking this frame
    pub exhausted: Vec<Entity>,
    /// Resolved impacts, in the order they were handled
    pub impacts: Vec<ImpactOutcome>,
    pub expired_projectiles: usize,
    pub reloaded: bool,
}

/// Frame-driven host for one arena and its round controller
pub struct MatchEngine {
    controller: RoundController<ArenaWorld, ChaCha8Rng>,
    /// Simulation time in seconds since the engine was created
    sim_time: f64,
    frames: u64,
    time_scale: f32,
    quit_requested: bool,
}

impl MatchEngine {
    /// Build the arena. Spawn draws are seeded from `config.seed`, or from
    /// entropy when unset.
    pub fn new(config: GameConfig, layout: LevelLayout) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let tag = config.spawn.tag.clone();
        let arena = ArenaWorld::new(layout, config);
        Self {
            controller: RoundController::new(arena, rng, tag),
            sim_time: 0.0,
            frames: 0,
            time_scale: 1.0,
            quit_requested: false,
        }
    }

    pub fn begin_round(&mut self) {
        self.controller.begin_round();
    }

    /// Advance the simulation by `delta_seconds` of real time.
    pub fn update(&mut self, delta_seconds: f32) -> FrameReport {
        let dt = delta_seconds.max(0.0) * self.time_scale;
        self.sim_time += dt as f64;
        self.frames += 1;

        let mut report = FrameReport::default();
        let world = self.controller.actors_mut().world_mut();

        movement_system(world, dt);
        report.exhausted = stamina_system(world, dt);

        let step = projectile_system(world, dt);
        report.expired_projectiles = step.expired.len();

        for (projectile, hit) in step.hits {
            // An earlier hit this frame may already have removed it
            if !self.controller.actors().contains(projectile) {
                continue;
            }
            let outcome = self.controller.on_hit(projectile, &hit);
            report.impacts.push(outcome);
            if outcome == ImpactOutcome::Reload {
                report.reloaded = true;
                break;
            }
        }

        report
    }

    // ── Round control ──────────────────────────────────────────────────

    pub fn reset(&mut self) {
        self.controller.reset();
    }

    pub fn reload(&mut self) {
        self.controller.reload();
    }

    pub fn subscribe_reset(&self, callback: impl FnMut() + 'static) -> ListenerId {
        self.controller.subscribe_reset(callback)
    }

    pub fn unsubscribe_reset(&self, id: ListenerId) -> bool {
        self.controller.unsubscribe_reset(id)
    }

    /// Feed a collision from an external physics collaborator.
    pub fn report_hit(&mut self, projectile: Entity, hit: &HitReport<Entity>) -> ImpactOutcome {
        self.controller.on_hit(projectile, hit)
    }

    pub fn spawn_projectile(&mut self, origin: Vec3, direction: Vec3) -> Entity {
        self.controller
            .actors_mut()
            .spawn_projectile(origin, direction)
    }

    /// Hand a participant's body over to physics (death/knockout visuals).
    pub fn ragdoll(&mut self, entity: Entity) -> bool {
        self.controller.actors_mut().ragdoll(entity)
    }

    // ── Human input ────────────────────────────────────────────────────

    pub fn move_forward(&mut self, value: f32) {
        self.with_locomotion(|l| l.move_forward(value));
    }

    pub fn move_right(&mut self, value: f32) {
        self.with_locomotion(|l| l.move_right(value));
    }

    pub fn turn_at_rate(&mut self, rate: f32, delta_seconds: f32) {
        self.with_locomotion(|l| l.turn_at_rate(rate, delta_seconds));
    }

    pub fn look_up_at_rate(&mut self, rate: f32, delta_seconds: f32) {
        self.with_locomotion(|l| l.look_up_at_rate(rate, delta_seconds));
    }

    /// Sprint pressed. An empty tank keeps the walk cap; the press still
    /// cancels any pending regeneration.
    pub fn start_exertion(&mut self) -> bool {
        self.with_exertion(|loco, stamina| {
            if stamina.current() > 0.0 {
                loco.start_sprint();
            }
            stamina.start_depleting();
        })
    }

    /// Sprint released.
    pub fn stop_exertion(&mut self) -> bool {
        self.with_exertion(|loco, stamina| {
            loco.stop_sprint();
            stamina.stop_depleting();
        })
    }

    /// Ask the host to exit; the engine itself keeps running.
    pub fn quit(&mut self) {
        log::info!("Quit requested");
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    fn with_locomotion(&mut self, f: impl FnOnce(&mut Locomotion)) -> bool {
        let Some(human) = self.human() else {
            return false;
        };
        match self
            .controller
            .actors_mut()
            .world_mut()
            .query_one_mut::<&mut Locomotion>(human)
        {
            Ok(loco) => {
                f(loco);
                true
            }
            Err(_) => false,
        }
    }

    fn with_exertion(&mut self, f: impl FnOnce(&mut Locomotion, &mut StaminaRegulator)) -> bool {
        let Some(human) = self.human() else {
            return false;
        };
        match self
            .controller
            .actors_mut()
            .world_mut()
            .query_one_mut::<(&mut Locomotion, &mut StaminaRegulator)>(human)
        {
            Ok((loco, stamina)) => {
                f(loco, stamina);
                true
            }
            Err(_) => false,
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn human(&self) -> Option<Entity> {
        self.controller
            .actors()
            .actors_of_class(ParticipantClass::Human)
            .into_iter()
            .next()
    }

    pub fn human_count(&self) -> usize {
        self.controller
            .actors()
            .actors_of_class(ParticipantClass::Human)
            .len()
    }

    pub fn computer_count(&self) -> usize {
        self.controller
            .actors()
            .actors_of_class(ParticipantClass::Computer)
            .len()
    }

    pub fn computers(&self) -> Vec<Entity> {
        self.controller
            .actors()
            .actors_of_class(ParticipantClass::Computer)
    }

    pub fn projectile_count(&self) -> usize {
        self.controller
            .actors()
            .world()
            .query::<&Projectile>()
            .iter()
            .count()
    }

    pub fn location(&self, entity: Entity) -> Option<Vec3> {
        self.controller.actors().location(entity)
    }

    /// Snapshot of the human's stamina, for the HUD.
    pub fn human_stamina(&self) -> Option<StaminaRegulator> {
        let human = self.human()?;
        let world = self.controller.actors().world();
        let stamina = world.get::<&StaminaRegulator>(human).ok()?;
        Some((*stamina).clone())
    }

    pub fn human_locomotion(&self) -> Option<Locomotion> {
        let human = self.human()?;
        let world = self.controller.actors().world();
        let loco = world.get::<&Locomotion>(human).ok()?;
        Some((*loco).clone())
    }

    pub fn drain_effects(&mut self) -> Vec<Vec3> {
        self.controller.actors_mut().drain_effects()
    }

    pub fn round(&self) -> &RoundState<Entity> {
        self.controller.round()
    }

    pub fn stats(&self) -> RoundStats {
        self.controller.stats()
    }

    pub fn is_round_active(&self) -> bool {
        self.controller.is_active()
    }

    pub fn spawn_point_count(&self) -> usize {
        self.controller.spawn_points().len()
    }

    pub fn arena(&self) -> &ArenaWorld {
        self.controller.actors()
    }

    pub fn arena_mut(&mut self) -> &mut ArenaWorld {
        self.controller.actors_mut()
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{ObstacleDef, SpawnPointDef};
    use std::cell::Cell;
    use std::rc::Rc;

    const FRAME: f32 = 1.0 / 60.0;

    fn layout(points: usize) -> LevelLayout {
        LevelLayout {
            name: "test arena".into(),
            spawn_points: (0..points)
                .map(|i| SpawnPointDef {
                    name: format!("start{}", i),
                    position: Vec3::new(i as f32 * 300.0, 0.0, 100.0),
                    tags: vec!["Spawnpoint".into()],
                })
                .collect(),
            obstacles: vec![ObstacleDef {
                name: "back wall".into(),
                center: Vec3::new(0.0, -1000.0, 100.0),
                half_extents: Vec3::new(3000.0, 50.0, 300.0),
                tags: vec![],
            }],
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(1234),
            ..Default::default()
        }
    }

    fn engine(points: usize) -> MatchEngine {
        let mut engine = MatchEngine::new(config(), layout(points));
        engine.begin_round();
        engine
    }

    #[test]
    fn test_engine_creation() {
        let engine = MatchEngine::new(config(), layout(4));
        assert_eq!(engine.human_count(), 0);
        assert_eq!(engine.sim_time(), 0.0);
        assert!(!engine.is_round_active());
    }

    #[test]
    fn test_begin_round_populates_arena() {
        let engine = engine(5);
        assert!(engine.is_round_active());
        assert_eq!(engine.human_count(), 1);
        assert_eq!(engine.computer_count(), 4);
        assert_eq!(engine.spawn_point_count(), 5);
    }

    #[test]
    fn test_empty_layout_never_starts() {
        let mut engine = engine(0);
        assert!(!engine.is_round_active());
        engine.update(FRAME);
        engine.reset();
        assert_eq!(engine.human_count(), 0);
        assert_eq!(engine.computer_count(), 0);
    }

    #[test]
    fn test_sprint_until_exhausted() {
        let mut engine = engine(2);
        let max = engine.human_stamina().unwrap().max();
        assert!(engine.start_exertion());

        let mut exhausted_at = None;
        for frame in 0..((max + 1.0) / FRAME) as usize {
            engine.move_forward(1.0);
            let report = engine.update(FRAME);
            if !report.exhausted.is_empty() && exhausted_at.is_none() {
                exhausted_at = Some(frame);
            }
        }

        assert!(exhausted_at.is_some());
        let loco = engine.human_locomotion().unwrap();
        assert!(!loco.is_sprinting(), "sprint must be revoked at zero");
        assert_eq!(engine.human_stamina().unwrap().current(), 0.0);
    }

    #[test]
    fn test_no_sprint_with_empty_stamina() {
        let mut engine = engine(2);
        let walk = engine.human_locomotion().unwrap().default_walk_speed;
        let max = engine.human_stamina().unwrap().max();
        engine.start_exertion();
        for _ in 0..((max + 1.0) / FRAME) as usize {
            engine.move_forward(1.0);
            engine.update(FRAME);
        }
        assert_eq!(engine.human_stamina().unwrap().current(), 0.0);

        // Re-pressing sprint every frame must not buy any sprint frames
        let human = engine.human().unwrap();
        for _ in 0..60 {
            engine.stop_exertion();
            engine.start_exertion();
            engine.move_forward(1.0);
            let report = engine.update(FRAME);
            assert!(report.exhausted.is_empty());

            let speed = engine.arena().world().get::<&Velocity>(human).unwrap().speed();
            assert!(speed <= walk + 1e-3, "moved at {} with zero stamina", speed);
            assert!(!engine.human_locomotion().unwrap().is_sprinting());
        }
        assert_eq!(engine.human_stamina().unwrap().current(), 0.0);
    }

    #[test]
    fn test_exertion_while_still_keeps_stamina() {
        let mut engine = engine(2);
        engine.start_exertion();
        for _ in 0..60 {
            engine.update(FRAME);
        }
        let stamina = engine.human_stamina().unwrap();
        assert_eq!(stamina.current(), stamina.max());
    }

    #[test]
    fn test_stamina_regenerates_after_delay() {
        let mut engine = engine(2);
        engine.start_exertion();
        for _ in 0..120 {
            engine.move_forward(1.0);
            engine.update(FRAME);
        }
        engine.stop_exertion();
        let drained = engine.human_stamina().unwrap().current();

        // Standing still through the default 2 s delay plus one more second
        for _ in 0..180 {
            engine.update(FRAME);
        }
        let after = engine.human_stamina().unwrap().current();
        assert!(after > drained);
    }

    #[test]
    fn test_projectile_into_wall_is_destroyed() {
        let mut engine = engine(1);
        let p = engine.spawn_projectile(Vec3::new(0.0, -500.0, 100.0), Vec3::new(0.0, -1.0, 0.0));

        let mut outcomes = Vec::new();
        for _ in 0..30 {
            outcomes.extend(engine.update(FRAME).impacts);
        }

        assert_eq!(outcomes, vec![ImpactOutcome::DestroyProjectile]);
        assert!(!engine.arena().contains(p));
        assert_eq!(engine.stats().reloads, 0);
    }

    #[test]
    fn test_projectile_into_computer_is_cosmetic() {
        let mut engine = engine(3);
        let target = engine.computers()[0];
        let at = engine.location(target).unwrap();
        let origin = at + Vec3::new(0.0, 400.0, 0.0);
        let p = engine.spawn_projectile(origin, Vec3::new(0.0, -1.0, 0.0));

        let report = engine.update(0.2);

        assert!(matches!(
            report.impacts.as_slice(),
            [ImpactOutcome::Cosmetic { .. }]
        ));
        assert!(engine.arena().contains(p));
        assert_eq!(engine.drain_effects().len(), 1);
        assert!(engine.drain_effects().is_empty());
        assert_eq!(engine.stats().reloads, 0);
    }

    #[test]
    fn test_projectile_into_human_reloads() {
        let mut engine = engine(3);
        let human = engine.human().unwrap();
        let at = engine.location(human).unwrap();
        engine.spawn_projectile(at + Vec3::new(0.0, 400.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

        let report = engine.update(0.2);

        assert!(report.reloaded);
        assert_eq!(report.impacts, vec![ImpactOutcome::Reload]);
        assert_eq!(engine.stats().reloads, 1);
        assert_eq!(engine.projectile_count(), 0);
        // Fresh round in the rebuilt world
        assert_eq!(engine.human_count(), 1);
        assert_eq!(engine.computer_count(), 2);
        assert_eq!(engine.round().rounds_survived, 0);
    }

    #[test]
    fn test_ragdolled_computer_is_not_hit() {
        let mut engine = engine(3);
        let target = engine.computers()[0];
        assert!(engine.ragdoll(target));
        let at = engine.location(target).unwrap();
        engine.spawn_projectile(at + Vec3::new(0.0, 400.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(engine.update(0.2).impacts.is_empty());
    }

    #[test]
    fn test_reset_keeps_human_and_notifies() {
        let mut engine = engine(4);
        let human = engine.human().unwrap();
        let notified = Rc::new(Cell::new(0));
        let n = notified.clone();
        engine.subscribe_reset(move || n.set(n.get() + 1));

        for _ in 0..2 {
            engine.reset();
            assert_eq!(engine.human(), Some(human));
            // The human's own spawn point blocks one computer
            assert_eq!(engine.computer_count(), 3);
        }
        assert_eq!(notified.get(), 2);
        assert_eq!(engine.round().rounds_survived, 2);
    }

    #[test]
    fn test_reset_after_human_walked_off_fills_every_point() {
        let mut engine = engine(3);
        // Walk well clear of the start line
        for _ in 0..120 {
            engine.move_right(-1.0);
            engine.update(FRAME);
        }
        // Reset puts the human back on a spawn point, so one spawn is blocked
        engine.reset();
        assert_eq!(engine.computer_count(), 2);
    }

    #[test]
    fn test_input_without_human_is_noop() {
        let mut engine = engine(0);
        assert!(!engine.start_exertion());
        assert!(!engine.stop_exertion());
        engine.move_forward(1.0);
        assert!(engine.human_stamina().is_none());
    }

    #[test]
    fn test_quit_flag() {
        let mut engine = engine(1);
        assert!(!engine.quit_requested());
        engine.quit();
        assert!(engine.quit_requested());
    }

    #[test]
    fn test_time_scale() {
        let mut engine = engine(1);
        engine.set_time_scale(2.0);
        engine.update(1.0);
        assert!((engine.sim_time() - 2.0).abs() < 1e-6);
        engine.set_time_scale(-1.0);
        assert_eq!(engine.time_scale(), 0.0);
    }
}
