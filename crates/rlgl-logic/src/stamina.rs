//! Per-participant stamina state machine.
//!
//! Three logical phases over two pieces of stored state (a `regenerating`
//! flag and the regen-delay timer):
//!
//! - **Regenerating** (initial): stamina refills at `regen_rate`, capped at `max`.
//! - **Depleting**: exertion is held; stamina drains at `depletion_rate` while
//!   the participant is actually moving.
//! - **Cooldown**: exertion was released and the regen delay is counting down.
//!   Accounting is the same as Depleting until the timer fires.
//!
//! Reaching zero while not regenerating reports [`StaminaTick::Exhausted`] on
//! every such tick; the caller revokes sprint speed even if exertion is still held.

use crate::config::StaminaConfig;
use crate::timer::DeferredTimer;

/// Observable phase of a [`StaminaRegulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaminaPhase {
    Regenerating,
    Depleting,
    Cooldown,
}

/// What the caller must react to after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaminaTick {
    Steady,
    /// Stamina is empty while exerting; sprint speed must be revoked.
    Exhausted,
}

/// Marker carried by the regen-delay timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResumeRegen;

#[derive(Debug, Clone, PartialEq)]
pub struct StaminaRegulator {
    current: f32,
    max: f32,
    regen_rate: f32,
    regen_delay: f32,
    depletion_rate: f32,
    regenerating: bool,
    regen_timer: DeferredTimer<ResumeRegen>,
}

impl StaminaRegulator {
    /// Starts full and regenerating.
    pub fn new(config: &StaminaConfig) -> Self {
        let max = config.max.max(0.0);
        Self {
            current: max,
            max,
            regen_rate: config.regen_rate,
            regen_delay: config.regen_delay,
            depletion_rate: config.depletion_rate,
            regenerating: true,
            regen_timer: DeferredTimer::new(),
        }
    }

    /// Override the current value, clamped into `[0, max]`.
    pub fn with_current(mut self, current: f32) -> Self {
        self.current = current.clamp(0.0, self.max);
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Fraction of max remaining, for HUD bars.
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn phase(&self) -> StaminaPhase {
        if self.regenerating {
            StaminaPhase::Regenerating
        } else if self.regen_timer.is_armed() {
            StaminaPhase::Cooldown
        } else {
            StaminaPhase::Depleting
        }
    }

    pub fn is_regenerating(&self) -> bool {
        self.regenerating
    }

    /// Exertion begins: cancel any pending regen and leave regeneration now.
    pub fn start_depleting(&mut self) {
        self.regen_timer.cancel();
        self.regenerating = false;
    }

    /// Exertion ends: regeneration resumes once `regen_delay` has elapsed.
    pub fn stop_depleting(&mut self) {
        self.regen_timer.arm(self.regen_delay, ResumeRegen);
    }

    /// Advance by `delta_seconds` for a participant moving at `speed`.
    pub fn tick(&mut self, delta_seconds: f32, speed: f32) -> StaminaTick {
        let dt = delta_seconds.max(0.0);

        if self.regen_timer.advance(dt).is_some() {
            self.regenerating = true;
        }

        if self.regenerating {
            self.current = (self.current + self.regen_rate * dt).clamp(0.0, self.max);
            return StaminaTick::Steady;
        }

        if speed > 0.0 {
            self.current = (self.current - self.depletion_rate * dt).clamp(0.0, self.max);
        }

        if self.current <= 0.0 {
            self.current = 0.0;
            StaminaTick::Exhausted
        } else {
            StaminaTick::Steady
        }
    }
}
