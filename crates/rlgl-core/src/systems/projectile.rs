//! Projectile system - flies projectiles and reports new contacts as hits
//!
//! Stands in for the physics collaborator: movement is sub-stepped so a
//! projectile cannot skip through a body thicker than its own radius, and a
//! contact is reported once when it begins, not every frame it persists.

use hecs::{Entity, World};
use rlgl_logic::impact::{HitReport, Surface};

use crate::components::{Body, Position, Projectile, Vec3};

/// Result of one projectile step.
#[derive(Debug, Default)]
pub struct ProjectileStep {
    /// New contacts, per projectile ordered nearest first.
    pub hits: Vec<(Entity, HitReport<Entity>)>,
    /// Projectiles removed because their lifespan ran out.
    pub expired: Vec<Entity>,
}

struct Target {
    entity: Entity,
    at: Vec3,
    body: Body,
}

pub fn projectile_system(world: &mut World, delta_seconds: f32) -> ProjectileStep {
    let targets: Vec<Target> = world
        .query::<(&Position, &Body)>()
        .iter()
        .filter(|(_, (_, body))| body.collision_enabled)
        .map(|(entity, (pos, body))| Target {
            entity,
            at: pos.0,
            body: *body,
        })
        .collect();

    let mut step = ProjectileStep::default();

    for (entity, (pos, proj)) in world.query_mut::<(&mut Position, &mut Projectile)>() {
        proj.age += delta_seconds;
        if proj.age >= proj.lifespan {
            step.expired.push(entity);
            continue;
        }

        let start = pos.0;
        let travel = proj.velocity * delta_seconds;
        let substeps = (travel.length() / proj.radius.max(0.01)).ceil().max(1.0) as usize;

        let mut touched: Vec<(Entity, f32, Vec3, Surface)> = Vec::new();
        let mut at_end: Vec<Entity> = Vec::new();
        for i in 1..=substeps {
            let sample = start + travel * (i as f32 / substeps as f32);
            for t in &targets {
                if !t.body.collider.overlaps_sphere(t.at, sample, proj.radius) {
                    continue;
                }
                if i == substeps {
                    at_end.push(t.entity);
                }
                if proj.contacts.contains(&t.entity) || touched.iter().any(|h| h.0 == t.entity) {
                    continue;
                }
                let point = t.body.collider.nearest_point(t.at, sample);
                let surface = Surface {
                    simulating_physics: t.body.simulating_physics,
                };
                touched.push((t.entity, start.distance_squared(&point), point, surface));
            }
        }

        touched.sort_by(|a, b| a.1.total_cmp(&b.1));
        for (other, _, point, surface) in touched {
            step.hits.push((
                entity,
                HitReport {
                    other: Some(other),
                    other_surface: Some(surface),
                    impact_point: point,
                },
            ));
        }

        pos.0 = start + travel;
        proj.contacts = at_end;
    }

    for &entity in &step.expired {
        let _ = world.despawn(entity);
    }

    step
}
