//! Projectile impact classification.
//!
//! A projectile hitting the human ends the round with a full reload. Hitting
//! any other physics-simulating body only plays an effect; the projectile
//! keeps going and ragdolling is somebody else's job. Hitting static scenery
//! removes the projectile. Everything else is ignored.

use crate::geometry::Vec3;

/// The surface of the other actor that was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub simulating_physics: bool,
}

/// One collision event as reported by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitReport<Id> {
    pub other: Option<Id>,
    pub other_surface: Option<Surface>,
    pub impact_point: Vec3,
}

/// Everything [`classify`] needs, resolved from the hit and the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactContext {
    /// Partner present, not the projectile itself, and a surface was hit.
    pub partner_valid: bool,
    pub surface_simulating: bool,
    pub partner_is_human: bool,
    pub partner_root_static: bool,
    pub impact_point: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactOutcome {
    /// The human was hit: restart the world from scratch.
    Reload,
    /// Some other physics body was hit: play the effect, keep the projectile.
    Cosmetic { point: Vec3 },
    /// Scenery was hit: remove the projectile.
    DestroyProjectile,
    Ignore,
}

/// Classify an impact. The simulating checks come before the static-root
/// check, so a body that claims to be both is treated as simulating.
pub fn classify(ctx: &ImpactContext) -> ImpactOutcome {
    if !ctx.partner_valid {
        return ImpactOutcome::Ignore;
    }
    if ctx.surface_simulating {
        if ctx.partner_is_human {
            ImpactOutcome::Reload
        } else {
            ImpactOutcome::Cosmetic {
                point: ctx.impact_point,
            }
        }
    } else if ctx.partner_root_static {
        ImpactOutcome::DestroyProjectile
    } else {
        ImpactOutcome::Ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(valid: bool, simulating: bool, human: bool, root_static: bool) -> ImpactContext {
        ImpactContext {
            partner_valid: valid,
            surface_simulating: simulating,
            partner_is_human: human,
            partner_root_static: root_static,
            impact_point: Vec3::new(1.0, 2.0, 3.0),
        }
    }

    #[test]
    fn test_human_hit_reloads() {
        assert_eq!(classify(&ctx(true, true, true, false)), ImpactOutcome::Reload);
    }

    #[test]
    fn test_other_body_is_cosmetic() {
        assert_eq!(
            classify(&ctx(true, true, false, false)),
            ImpactOutcome::Cosmetic {
                point: Vec3::new(1.0, 2.0, 3.0)
            }
        );
    }

    #[test]
    fn test_static_scenery_destroys_projectile() {
        assert_eq!(
            classify(&ctx(true, false, false, true)),
            ImpactOutcome::DestroyProjectile
        );
    }

    #[test]
    fn test_simulating_wins_over_static() {
        assert_eq!(classify(&ctx(true, true, true, true)), ImpactOutcome::Reload);
        assert!(matches!(
            classify(&ctx(true, true, false, true)),
            ImpactOutcome::Cosmetic { .. }
        ));
    }

    #[test]
    fn test_human_not_simulating_is_ignored() {
        // A ragdoll-disabled or kinematic human body is not a round-ending hit
        assert_eq!(classify(&ctx(true, false, true, false)), ImpactOutcome::Ignore);
    }

    #[test]
    fn test_invalid_partner_is_ignored() {
        for simulating in [false, true] {
            for human in [false, true] {
                for root_static in [false, true] {
                    assert_eq!(
                        classify(&ctx(false, simulating, human, root_static)),
                        ImpactOutcome::Ignore
                    );
                }
            }
        }
    }
}
