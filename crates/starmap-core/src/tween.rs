//! Time-bounded eased interpolation
//!
//! A [`Tween`] is a plain value: cancelling one is dropping it, and replacing
//! it is assigning a new one over the old. Time is wall-clock milliseconds so
//! sampling is frame-rate independent.

use glam::Vec3;

/// Easing curve applied to normalized progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOutCubic,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseInOutCubic => ease_in_out_cubic(t),
        }
    }
}

/// `4t³` for the first half, `1 - (-2t + 2)³ / 2` for the second
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Values that can be linearly interpolated
pub trait Lerp: Copy {
    fn lerp(self, end: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, end: Self, t: f32) -> Self {
        self + (end - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(self, end: Self, t: f32) -> Self {
        Vec3::lerp(self, end, t)
    }
}

impl Lerp for (f32, f32) {
    fn lerp(self, end: Self, t: f32) -> Self {
        (Lerp::lerp(self.0, end.0, t), Lerp::lerp(self.1, end.1, t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    pub start: T,
    pub end: T,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(start: T, end: T, start_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            start,
            end,
            start_ms,
            duration_ms: duration_ms.max(0.0),
            easing,
        }
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn sample(&self, now_ms: f64) -> T {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.end;
        }
        self.start.lerp(self.end, self.easing.apply(t))
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
