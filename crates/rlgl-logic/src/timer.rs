//! One-shot deferred timer owned and advanced by a single component.
//!
//! Replaces a world-global timer manager: the owner arms the timer with a
//! payload, advances it from its own tick, and receives the payload back
//! exactly once when the delay has elapsed.

/// A cancellable one-shot countdown carrying the value to hand back on fire.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredTimer<T> {
    pending: Option<(f32, T)>,
}

impl<T> Default for DeferredTimer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> DeferredTimer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `duration` seconds. Re-arming replaces any pending countdown.
    pub fn arm(&mut self, duration: f32, on_fire: T) {
        self.pending = Some((duration.max(0.0), on_fire));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Seconds until the timer fires, if armed.
    pub fn remaining(&self) -> Option<f32> {
        self.pending.as_ref().map(|(left, _)| *left)
    }

    /// Advance by `delta_seconds`; returns the payload on the tick it fires.
    pub fn advance(&mut self, delta_seconds: f32) -> Option<T> {
        let (left, _) = self.pending.as_mut()?;
        *left -= delta_seconds.max(0.0);
        if *left <= 0.0 {
            self.pending.take().map(|(_, payload)| payload)
        } else {
            None
        }
    }
}
