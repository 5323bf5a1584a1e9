use std::fmt::Debug;

// -------------------------------------------------------------------------------------------------

/// Provides smooth transitions between a current and target f32 value.
///
/// Oscillator bank voices ramp their frequencies once per rendered buffer, so a ramp step here
/// is one buffer and not one sample.
pub trait SmoothedValue: Debug {
    /// Access to the current, possibly ramped value.
    #[must_use]
    fn current(&self) -> f32;
    /// Access to the target value.
    #[must_use]
    fn target(&self) -> f32;

    /// Ramp, if needed, and get the current ramped value. Else snaps current to the target and
    /// returns it.
    #[must_use]
    fn next(&mut self) -> f32 {
        if self.need_ramp() {
            self.ramp();
            self.current()
        } else {
            let target = self.target();
            self.init(target);
            target
        }
    }

    /// Test if ramping is necessary.
    #[must_use]
    fn need_ramp(&self) -> bool;
    /// Move current to target value, when ramping is necessary, else does nothing.
    fn ramp(&mut self);

    /// Set current and target to the same value.
    fn init(&mut self, amount: f32);
    /// Set a new target value. Current only snaps to the target when it is already close enough.
    fn set_target(&mut self, target: f32);
}

// -------------------------------------------------------------------------------------------------

/// Exponential smoothed value, using an inertial exponential approach:
/// `current = current + (target - current) * inertia`.
///
/// With an inertia in range (0, 1] this is a contraction: the value approaches the target
/// monotonically and never overshoots it. An inertia of 1 jumps to the target immediately.
#[derive(Debug, Clone)]
pub struct ExponentialSmoothedValue {
    current: f32,
    target: f32,
    inertia: f32,
}

impl ExponentialSmoothedValue {
    pub const DEFAULT_INERTIA: f32 = 0.1;

    pub const fn new(value: f32) -> Self {
        Self::with_inertia(value, Self::DEFAULT_INERTIA)
    }

    pub const fn with_inertia(value: f32, inertia: f32) -> Self {
        assert!(inertia > 0.0 && inertia <= 1.0, "Invalid inertia");

        let current = value;
        let target = value;

        ExponentialSmoothedValue {
            current,
            target,
            inertia,
        }
    }

    #[inline(always)]
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    /// Max distance to the target at which the value counts as settled.
    const EPSILON: f32 = f32::EPSILON * 100.0;
}

impl SmoothedValue for ExponentialSmoothedValue {
    #[inline(always)]
    fn current(&self) -> f32 {
        self.current
    }

    #[inline(always)]
    fn target(&self) -> f32 {
        self.target
    }

    fn need_ramp(&self) -> bool {
        let inertia_add = (self.target - self.current) * self.inertia;
        let next = self.current + inertia_add;
        (self.current - next).abs() > Self::EPSILON
    }

    fn ramp(&mut self) {
        let next = self.current + (self.target - self.current) * self.inertia;
        if (next - self.current).abs() <= Self::EPSILON {
            // steps below the f32 resolution of current no longer move it
            self.current = self.target;
            return;
        }
        // rounding may step over the target with inertia 1
        self.current = if self.current < self.target {
            next.min(self.target)
        } else {
            next.max(self.target)
        };
    }

    fn init(&mut self, amount: f32) {
        self.target = amount;
        self.current = amount;
    }

    fn set_target(&mut self, target: f32) {
        self.target = target;
        if !self.need_ramp() {
            self.current = self.target;
        }
    }
}

impl Default for ExponentialSmoothedValue {
    fn default() -> Self {
        Self::new(0.0)
    }
}

// -------------------------------------------------------------------------------------------------
