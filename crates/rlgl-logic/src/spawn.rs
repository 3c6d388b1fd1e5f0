//! Spawnpoint registry and round spawner assignment.

use rand::Rng;

use crate::actors::ActorSystem;
use crate::geometry::Vec3;

/// A tagged location participants are placed at when a round starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec3,
}

/// Which spawn point indices go to whom for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnAssignment {
    pub human: usize,
    /// Every other index, ascending.
    pub computers: Vec<usize>,
}

impl SpawnAssignment {
    /// All indices in spawn order, each tagged with whether it is the human's.
    pub fn slots(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        let total = self.computers.len() + 1;
        (0..total).map(move |i| (i, i == self.human))
    }
}

/// Collect every actor carrying `tag` that has a location, in discovery order.
pub fn collect<A: ActorSystem>(actors: &A, tag: &str) -> Vec<SpawnPoint> {
    actors
        .find_actors_by_tag(tag)
        .into_iter()
        .filter_map(|id| actors.location(id))
        .map(|position| SpawnPoint { position })
        .collect()
}

/// One uniform draw for the human; all remaining indices are computers.
/// Returns `None` when there is nothing to assign.
pub fn assign(count: usize, rng: &mut impl Rng) -> Option<SpawnAssignment> {
    if count == 0 {
        return None;
    }
    let human = rng.gen_range(0..count);
    let computers = (0..count).filter(|&i| i != human).collect();
    Some(SpawnAssignment { human, computers })
}

/// Independent uniform pick of one spawn point, for repositioning on reset.
pub fn pick(points: &[SpawnPoint], rng: &mut impl Rng) -> Option<SpawnPoint> {
    if points.is_empty() {
        None
    } else {
        Some(points[rng.gen_range(0..points.len())])
    }
}
