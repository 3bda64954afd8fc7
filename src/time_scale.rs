//! Time-scale easing (slow motion and freeze effects)
//!
//! The host calls [`TimeScale::update`] once per frame with the real frame
//! delta and hands the returned, scaled delta to the world. The world never
//! sees the easing itself, and a tick is never interrupted by it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    /// Rate applied to the next frame
    current: f64,
    /// Rate when the running ease started
    start: f64,
    target: f64,
    /// Real seconds spent in the running ease
    elapsed: f64,
    duration: f64,
    /// Ease-out power (1 = linear)
    exponent: f64,
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl TimeScale {
    pub fn new(rate: f64) -> Self {
        let rate = rate.max(0.0);
        Self {
            current: rate,
            start: rate,
            target: rate,
            elapsed: 0.0,
            duration: 0.0,
            exponent: 1.0,
        }
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_easing(&self) -> bool {
        self.elapsed < self.duration
    }

    /// Start easing from the current rate toward `target` over `duration`
    /// real seconds. Replaces any ease in progress.
    pub fn ease_to(&mut self, target: f64, duration: f64, exponent: f64) {
        self.start = self.current;
        self.target = target.max(0.0);
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
        self.exponent = exponent.max(f64::EPSILON);
        if self.duration == 0.0 {
            self.current = self.target;
        }
    }

    /// Ease down to a standstill
    pub fn freeze(&mut self, duration: f64) {
        self.ease_to(0.0, duration, 2.0);
    }

    /// Ease back to real time
    pub fn resume(&mut self, duration: f64) {
        self.ease_to(1.0, duration, 2.0);
    }

    /// Advance the ease by one host frame and return the scaled delta
    pub fn update(&mut self, frame_dt: f64) -> f64 {
        let frame_dt = frame_dt.max(0.0);
        if self.is_easing() {
            self.elapsed = (self.elapsed + frame_dt).min(self.duration);
            let progress = self.elapsed / self.duration;
            let eased = 1.0 - (1.0 - progress).powf(self.exponent);
            self.current = self.start + (self.target - self.start) * eased;
        }
        frame_dt * self.current
    }
}
