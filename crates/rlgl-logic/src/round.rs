//! Round controller: spawn assignment, soft reset, full reload, hit handling.
//!
//! Nothing here fails loudly. An empty spawn registry leaves the round
//! inactive, a blocked spawn is dropped, a missing human skips the
//! reposition step. All of it is logged and the simulation carries on.

use rand::Rng;

use crate::actors::{ActorSystem, ParticipantClass};
use crate::impact::{classify, HitReport, ImpactContext, ImpactOutcome};
use crate::observers::{ListenerId, ResetObservers};
use crate::spawn::{self, SpawnPoint};

/// Participants placed for the current round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState<Id> {
    pub human: Option<Id>,
    pub computers: Vec<Id>,
    pub active: bool,
    /// Soft resets survived since the world was last loaded.
    pub rounds_survived: u32,
}

impl<Id> Default for RoundState<Id> {
    fn default() -> Self {
        Self {
            human: None,
            computers: Vec::new(),
            active: false,
            rounds_survived: 0,
        }
    }
}

/// Lifetime counters, kept across reloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundStats {
    pub rounds_started: u32,
    pub resets: u32,
    pub reloads: u32,
    pub blocked_spawns: u32,
}

pub struct RoundController<A: ActorSystem, R: Rng> {
    actors: A,
    rng: R,
    spawn_tag: String,
    spawn_points: Vec<SpawnPoint>,
    round: RoundState<A::Id>,
    observers: ResetObservers,
    stats: RoundStats,
}

impl<A: ActorSystem, R: Rng> RoundController<A, R> {
    pub fn new(actors: A, rng: R, spawn_tag: impl Into<String>) -> Self {
        Self {
            actors,
            rng,
            spawn_tag: spawn_tag.into(),
            spawn_points: Vec::new(),
            round: RoundState::default(),
            observers: ResetObservers::new(),
            stats: RoundStats::default(),
        }
    }

    pub fn actors(&self) -> &A {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut A {
        &mut self.actors
    }

    pub fn round(&self) -> &RoundState<A::Id> {
        &self.round
    }

    pub fn is_active(&self) -> bool {
        self.round.active
    }

    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.spawn_points
    }

    pub fn stats(&self) -> RoundStats {
        self.stats
    }

    /// Registry handle; clones share the same listeners.
    pub fn observers(&self) -> &ResetObservers {
        &self.observers
    }

    pub fn subscribe_reset(&self, callback: impl FnMut() + 'static) -> ListenerId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe_reset(&self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Collect spawn points and place one human plus a computer on every
    /// other point. With no spawn points the round simply does not start.
    pub fn begin_round(&mut self) {
        self.spawn_points = spawn::collect(&self.actors, &self.spawn_tag);

        let Some(assignment) = spawn::assign(self.spawn_points.len(), &mut self.rng) else {
            log::warn!(
                "No actors tagged '{}' found; round not started",
                self.spawn_tag
            );
            self.round.active = false;
            return;
        };

        self.round.human = None;
        self.round.computers.clear();

        for (index, is_human) in assignment.slots() {
            let class = if is_human {
                ParticipantClass::Human
            } else {
                ParticipantClass::Computer
            };
            match self.spawn_at(class, index) {
                Some(id) if is_human => self.round.human = Some(id),
                Some(id) => self.round.computers.push(id),
                None => {}
            }
        }

        self.round.active = true;
        self.stats.rounds_started += 1;
        log::info!(
            "Round started: {} spawn points, human at #{}, {} computers placed",
            self.spawn_points.len(),
            assignment.human,
            self.round.computers.len()
        );
    }

    /// Full restart: rebuild the world and start a fresh round in it.
    pub fn reload(&mut self) {
        log::info!(
            "Reloading world after {} rounds survived",
            self.round.rounds_survived
        );
        self.actors.reload_world();
        self.spawn_points.clear();
        self.round = RoundState::default();
        self.stats.reloads += 1;
        self.begin_round();
    }

    /// Soft restart: move the human, replace every computer, notify observers.
    pub fn reset(&mut self) {
        let human = self
            .actors
            .actors_of_class(ParticipantClass::Human)
            .into_iter()
            .next();

        match (human, spawn::pick(&self.spawn_points, &mut self.rng)) {
            (Some(id), Some(point)) => {
                self.actors.set_location(id, point.position);
            }
            (None, _) => log::debug!("Reset: no human participant in the world"),
            (Some(_), None) => log::debug!("Reset: no spawn points to move the human to"),
        }
        self.round.human = human;

        for id in self.actors.actors_of_class(ParticipantClass::Computer) {
            self.actors.destroy(id);
        }
        self.round.computers.clear();

        for index in 0..self.spawn_points.len() {
            if let Some(id) = self.spawn_at(ParticipantClass::Computer, index) {
                self.round.computers.push(id);
            }
        }

        self.round.rounds_survived += 1;
        self.stats.resets += 1;
        let notified = self.observers.broadcast();
        log::info!(
            "Round reset: {} computers placed, {} observers notified",
            self.round.computers.len(),
            notified
        );
    }

    /// Resolve one collision of `projectile` and apply the outcome.
    pub fn on_hit(&mut self, projectile: A::Id, hit: &HitReport<A::Id>) -> ImpactOutcome {
        let ctx = self.impact_context(projectile, hit);
        let outcome = classify(&ctx);
        log::debug!("Projectile {:?} hit {:?}: {:?}", projectile, hit.other, outcome);

        match outcome {
            ImpactOutcome::Reload => self.reload(),
            ImpactOutcome::Cosmetic { point } => self.actors.spawn_impact_effect(point),
            ImpactOutcome::DestroyProjectile => {
                self.actors.destroy(projectile);
            }
            ImpactOutcome::Ignore => {}
        }
        outcome
    }

    fn impact_context(&self, projectile: A::Id, hit: &HitReport<A::Id>) -> ImpactContext {
        let partner = hit.other.filter(|&other| other != projectile);
        let partner_valid = partner.is_some() && hit.other_surface.is_some();

        ImpactContext {
            partner_valid,
            surface_simulating: hit.other_surface.is_some_and(|s| s.simulating_physics),
            partner_is_human: partner
                .and_then(|id| self.actors.class_of(id))
                .is_some_and(|c| c == ParticipantClass::Human),
            partner_root_static: partner.is_some_and(|id| self.actors.is_root_static(id)),
            impact_point: hit.impact_point,
        }
    }

    fn spawn_at(&mut self, class: ParticipantClass, index: usize) -> Option<A::Id> {
        let point = *self.spawn_points.get(index)?;
        let spawned = self.actors.spawn_actor_at(class, point.position);
        if spawned.is_none() {
            self.stats.blocked_spawns += 1;
            log::debug!(
                "{:?} spawn at #{} {:?} blocked by a collision; dropped",
                class,
                index,
                point.position
            );
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Bare-bones world: a list of spawn markers plus live participants.
    #[derive(Default)]
    struct ListWorld {
        markers: Vec<Vec3>,
        live: Vec<(u32, ParticipantClass, Vec3)>,
        next: u32,
    }

    impl ActorSystem for ListWorld {
        type Id = u32;

        fn spawn_actor_at(&mut self, class: ParticipantClass, position: Vec3) -> Option<u32> {
            self.next += 1;
            let id = 1000 + self.next;
            self.live.push((id, class, position));
            Some(id)
        }
        fn destroy(&mut self, actor: u32) -> bool {
            let before = self.live.len();
            self.live.retain(|(id, _, _)| *id != actor);
            before != self.live.len()
        }
        fn reload_world(&mut self) {
            self.live.clear();
        }
        fn find_actors_by_tag(&self, _tag: &str) -> Vec<u32> {
            (0..self.markers.len() as u32).collect()
        }
        fn actors_of_class(&self, class: ParticipantClass) -> Vec<u32> {
            self.live
                .iter()
                .filter(|(_, c, _)| *c == class)
                .map(|(id, _, _)| *id)
                .collect()
        }
        fn class_of(&self, actor: u32) -> Option<ParticipantClass> {
            self.live.iter().find(|(id, _, _)| *id == actor).map(|(_, c, _)| *c)
        }
        fn location(&self, actor: u32) -> Option<Vec3> {
            self.markers.get(actor as usize).copied().or_else(|| {
                self.live.iter().find(|(id, _, _)| *id == actor).map(|(_, _, p)| *p)
            })
        }
        fn set_location(&mut self, actor: u32, position: Vec3) -> bool {
            match self.live.iter_mut().find(|(id, _, _)| *id == actor) {
                Some(entry) => {
                    entry.2 = position;
                    true
                }
                None => false,
            }
        }
        fn is_root_static(&self, _actor: u32) -> bool {
            false
        }
        fn spawn_impact_effect(&mut self, _point: Vec3) {}
    }

    fn controller(points: usize) -> RoundController<ListWorld, ChaCha8Rng> {
        let world = ListWorld {
            markers: (0..points).map(|i| Vec3::new(i as f32 * 500.0, 0.0, 0.0)).collect(),
            ..Default::default()
        };
        RoundController::new(world, ChaCha8Rng::seed_from_u64(5), "Spawnpoint")
    }

    #[test]
    fn test_begin_round_places_everyone() {
        let mut c = controller(4);
        c.begin_round();
        assert!(c.is_active());
        assert!(c.round().human.is_some());
        assert_eq!(c.round().computers.len(), 3);
        assert_eq!(c.actors().live.len(), 4);
        assert_eq!(c.stats().rounds_started, 1);
    }

    #[test]
    fn test_begin_round_without_spawn_points() {
        let mut c = controller(0);
        c.begin_round();
        assert!(!c.is_active());
        assert!(c.actors().live.is_empty());
        assert_eq!(c.stats().rounds_started, 0);
    }

    #[test]
    fn test_reset_counts_survived_rounds() {
        let mut c = controller(3);
        c.begin_round();
        c.reset();
        c.reset();
        assert_eq!(c.round().rounds_survived, 2);
        c.reload();
        assert_eq!(c.round().rounds_survived, 0);
        assert_eq!(c.stats().reloads, 1);
        assert_eq!(c.stats().resets, 2);
    }
}
