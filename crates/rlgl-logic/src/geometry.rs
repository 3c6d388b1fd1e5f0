//! Small vector and collider math shared by the controller and the arena.

use serde::{Deserialize, Serialize};

/// 3D vector in world units (centimetres in the shipped arena).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Shorten the vector to `max_len` if it is longer; shorter vectors pass through.
    pub fn clamp_length(&self, max_len: f32) -> Self {
        let len = self.length();
        if len > max_len && len > 0.0 {
            *self * (max_len / len)
        } else {
            *self
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

/// Axis-aligned box given by its center and half extents.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Closest point inside the box to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let (lo, hi) = (self.min(), self.max());
        Vec3::new(
            point.x.clamp(lo.x, hi.x),
            point.y.clamp(lo.y, hi.y),
            point.z.clamp(lo.z, hi.z),
        )
    }
}

/// Collision shape of a body, positioned at the owning actor's location.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Collider {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

impl Collider {
    /// Strict overlap between a sphere and this collider placed at `at`.
    /// Surfaces that only touch do not overlap.
    pub fn overlaps_sphere(&self, at: Vec3, center: Vec3, radius: f32) -> bool {
        match *self {
            Collider::Sphere { radius: own } => {
                let reach = own + radius;
                at.distance_squared(&center) < reach * reach
            }
            Collider::Box { half_extents } => {
                let closest = Aabb::new(at, half_extents).closest_point(center);
                closest.distance_squared(&center) < radius * radius
            }
        }
    }

    /// Point on this collider nearest to `from`, used as the impact point.
    pub fn nearest_point(&self, at: Vec3, from: Vec3) -> Vec3 {
        match *self {
            Collider::Sphere { radius } => {
                let dir = (from - at).normalize();
                at + dir * radius
            }
            Collider::Box { half_extents } => Aabb::new(at, half_extents).closest_point(from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec3::new(5.0, 7.0, 9.0));

        let diff = b - a;
        assert_eq!(diff.x, 3.0);

        let scaled = a * 2.0;
        assert_eq!(scaled.y, 4.0);
    }

    #[test]
    fn test_clamp_length() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert!((v.clamp_length(1.0).length() - 1.0).abs() < 0.001);
        let short = Vec3::new(0.3, 0.4, 0.0);
        assert_eq!(short.clamp_length(1.0), short);
        assert_eq!(Vec3::ZERO.clamp_length(1.0), Vec3::ZERO);
    }

    #[test]
    fn test_sphere_overlap_is_strict() {
        let c = Collider::Sphere { radius: 1.0 };
        assert!(c.overlaps_sphere(Vec3::ZERO, Vec3::new(1.5, 0.0, 0.0), 1.0));
        // Touching at exactly 2.0 apart
        assert!(!c.overlaps_sphere(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.0));
    }

    #[test]
    fn test_box_overlap() {
        let c = Collider::Box {
            half_extents: Vec3::new(1.0, 1.0, 1.0),
        };
        assert!(c.overlaps_sphere(Vec3::ZERO, Vec3::new(1.5, 0.0, 0.0), 1.0));
        assert!(!c.overlaps_sphere(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), 1.0));
        // Sphere center inside the box
        assert!(c.overlaps_sphere(Vec3::ZERO, Vec3::ZERO, 0.1));
    }

    #[test]
    fn test_nearest_point_on_box() {
        let c = Collider::Box {
            half_extents: Vec3::new(1.0, 1.0, 1.0),
        };
        let p = c.nearest_point(Vec3::ZERO, Vec3::new(5.0, 0.5, 0.0));
        assert_eq!(p, Vec3::new(1.0, 0.5, 0.0));
    }
}
