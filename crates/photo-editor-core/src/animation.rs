//! Snap-back animation of the zoom factor.
//!
//! When a pinch takes the base image below its natural size, the factor is
//! animated back to 1.0 with an overshoot curve. The animation does not own a
//! timer: the host calls [`SnapBack::advance`] once per frame on its UI thread
//! with the time since the previous frame, and control returns to the event
//! loop in between. Dropping or [`cancel`](SnapBack::cancel)ling it stops it.

use std::time::Duration;

/// Default snap-back length.
pub const DEFAULT_SNAP_BACK_DURATION: Duration = Duration::from_millis(300);

/// Default overshoot tension (how far past 1.0 the curve swings).
pub const DEFAULT_OVERSHOOT_TENSION: f32 = 4.0;

/// Overshoot easing: rises past 1.0 before settling at exactly 1.0.
///
/// Formula: `(t - 1)^2 * ((tension + 1) * (t - 1) + tension) + 1`
#[inline]
pub fn overshoot(t: f32, tension: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * ((tension + 1.0) * t + tension) + 1.0
}

/// One rendered animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapFrame {
    /// Factor to display for this frame.
    pub factor: f32,
    /// The animation reached its end; the factor is exactly 1.0.
    pub finished: bool,
}

/// Animated return of the zoom factor to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapBack {
    from: f32,
    elapsed: Duration,
    duration: Duration,
    tension: f32,
}

impl SnapBack {
    pub fn new(from: f32, duration: Duration, tension: f32) -> Self {
        Self {
            from,
            elapsed: Duration::ZERO,
            duration,
            tension,
        }
    }

    /// Animation progress in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Factor currently on screen.
    pub fn current(&self) -> f32 {
        if self.is_finished() {
            return 1.0;
        }
        self.from + (1.0 - self.from) * overshoot(self.progress(), self.tension)
    }

    /// Step the animation forward by one frame.
    pub fn advance(&mut self, dt: Duration) -> SnapFrame {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
        SnapFrame {
            factor: self.current(),
            finished: self.is_finished(),
        }
    }

    /// Stop the animation, returning the factor that was on screen.
    pub fn cancel(self) -> f32 {
        self.current()
    }
}
