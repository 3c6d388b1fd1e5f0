//! Movement caps and input accumulation for a controlled participant.
//!
//! Axis input arrives already normalized (`[-1, 1]`) and is accumulated into
//! a per-frame wish vector relative to the participant's yaw. The frame's
//! velocity is the clamped wish direction times the current speed cap.

use crate::config::MovementConfig;
use crate::geometry::Vec3;

/// Pitch limit in degrees, keeps the view from flipping over.
const MAX_PITCH: f32 = 89.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Locomotion {
    pub default_walk_speed: f32,
    pub sprint_speed: f32,
    /// Current speed cap; either the walk or the sprint speed.
    pub max_speed: f32,
    pub base_turn_rate: f32,
    pub base_look_up_rate: f32,
    /// Heading in degrees, 0 = +X, 90 = +Y.
    pub yaw: f32,
    pub pitch: f32,
    /// False once the body has gone limp; no more movement.
    pub enabled: bool,
    wish: Vec3,
}

impl Locomotion {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            default_walk_speed: config.default_walk_speed,
            sprint_speed: config.sprint_speed,
            max_speed: config.default_walk_speed,
            base_turn_rate: config.base_turn_rate,
            base_look_up_rate: config.base_look_up_rate,
            yaw: 0.0,
            pitch: 0.0,
            enabled: true,
            wish: Vec3::ZERO,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let r = self.yaw.to_radians();
        Vec3::new(r.cos(), r.sin(), 0.0)
    }

    pub fn right(&self) -> Vec3 {
        let r = (self.yaw + 90.0).to_radians();
        Vec3::new(r.cos(), r.sin(), 0.0)
    }

    pub fn move_forward(&mut self, value: f32) {
        if value != 0.0 {
            self.wish += self.forward() * value.clamp(-1.0, 1.0);
        }
    }

    pub fn move_right(&mut self, value: f32) {
        if value != 0.0 {
            self.wish += self.right() * value.clamp(-1.0, 1.0);
        }
    }

    /// `rate` is normalized: 1.0 turns at `base_turn_rate` degrees per second.
    pub fn turn_at_rate(&mut self, rate: f32, delta_seconds: f32) {
        self.yaw = (self.yaw + rate * self.base_turn_rate * delta_seconds).rem_euclid(360.0);
    }

    pub fn look_up_at_rate(&mut self, rate: f32, delta_seconds: f32) {
        self.pitch = (self.pitch + rate * self.base_look_up_rate * delta_seconds)
            .clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn start_sprint(&mut self) {
        self.max_speed = self.sprint_speed;
    }

    pub fn stop_sprint(&mut self) {
        self.max_speed = self.default_walk_speed;
    }

    /// Forced return to walking speed on exhaustion.
    pub fn revoke_sprint(&mut self) {
        self.max_speed = self.default_walk_speed;
    }

    pub fn is_sprinting(&self) -> bool {
        self.max_speed > self.default_walk_speed
    }

    /// Velocity for this frame from the accumulated input; clears the input.
    pub fn consume_velocity(&mut self) -> Vec3 {
        let wish = std::mem::replace(&mut self.wish, Vec3::ZERO);
        if !self.enabled {
            return Vec3::ZERO;
        }
        wish.clamp_length(1.0) * self.max_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loco() -> Locomotion {
        Locomotion::new(&MovementConfig::default())
    }

    #[test]
    fn test_forward_input_uses_walk_speed() {
        let mut l = loco();
        l.move_forward(1.0);
        let v = l.consume_velocity();
        assert!((v.x - 600.0).abs() < 1e-3);
        assert!(v.y.abs() < 1e-3);
        // Input is per-frame
        assert_eq!(l.consume_velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_diagonal_input_is_clamped() {
        let mut l = loco();
        l.move_forward(1.0);
        l.move_right(1.0);
        let v = l.consume_velocity();
        assert!((v.length() - 600.0).abs() < 1e-2);
    }

    #[test]
    fn test_sprint_and_revoke() {
        let mut l = loco();
        l.start_sprint();
        assert!(l.is_sprinting());
        l.move_forward(1.0);
        assert!((l.consume_velocity().length() - 1000.0).abs() < 1e-2);
        l.revoke_sprint();
        assert!(!l.is_sprinting());
        assert_eq!(l.max_speed, 600.0);
    }

    #[test]
    fn test_turn_changes_heading() {
        let mut l = loco();
        l.turn_at_rate(1.0, 2.0);
        assert!((l.yaw - 90.0).abs() < 1e-3);
        l.move_forward(1.0);
        let v = l.consume_velocity();
        assert!(v.x.abs() < 1e-2);
        assert!((v.y - 600.0).abs() < 1e-2);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut l = loco();
        l.look_up_at_rate(1.0, 10.0);
        assert_eq!(l.pitch, MAX_PITCH);
        l.look_up_at_rate(-1.0, 100.0);
        assert_eq!(l.pitch, -MAX_PITCH);
    }

    #[test]
    fn test_disabled_does_not_move() {
        let mut l = loco();
        l.enabled = false;
        l.move_forward(1.0);
        assert_eq!(l.consume_velocity(), Vec3::ZERO);
    }
}
