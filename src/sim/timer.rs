//! Countdown timers
//!
//! Every delayed effect in the simulation (fire cooldowns, animation frames,
//! the missile weapon, the shield impact cue, scene crossfades) is a
//! `Countdown` ticked with elapsed milliseconds.

use serde::{Deserialize, Serialize};

/// A countdown in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Countdown {
    duration_ms: f32,
    remaining_ms: f32,
}

impl Countdown {
    /// Armed countdown that expires after `duration_ms`
    pub fn new(duration_ms: f32) -> Self {
        let duration_ms = duration_ms.max(0.0);
        Self {
            duration_ms,
            remaining_ms: duration_ms,
        }
    }

    /// Re-arm with a new duration
    pub fn set(&mut self, duration_ms: f32) {
        *self = Self::new(duration_ms);
    }

    /// Re-arm with the last duration
    pub fn restart(&mut self) {
        self.remaining_ms = self.duration_ms;
    }

    /// Stop and zero the countdown
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Advance by `dt_ms`; returns true once expired
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        self.remaining_ms -= dt_ms.max(0.0);
        self.expired()
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    /// Time left, never negative
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining_ms.max(0.0)
    }

    /// Fraction elapsed, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining_ms / self.duration_ms).clamp(0.0, 1.0)
    }
}

/// Fixed-interval frame stepper for sprite animations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTimer {
    pub frame: u32,
    timer: Countdown,
}

impl FrameTimer {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            frame: 0,
            timer: Countdown::new(interval_ms),
        }
    }

    /// Advance; returns how many frames were stepped (0 or 1)
    pub fn tick(&mut self, dt_ms: f32) -> u32 {
        if self.timer.tick(dt_ms) {
            self.timer.restart();
            self.frame += 1;
            1
        } else {
            0
        }
    }

    /// Advance and wrap the frame index to `frames`
    pub fn tick_wrapping(&mut self, dt_ms: f32, frames: u32) {
        self.tick(dt_ms);
        self.frame %= frames.max(1);
    }

    pub fn reset(&mut self) {
        self.frame = 0;
        self.timer.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_expires_at_duration() {
        let mut cd = Countdown::new(100.0);
        assert!(!cd.tick(60.0));
        assert!(!cd.expired());
        assert!(cd.tick(40.0));
        assert_eq!(cd.remaining(), 0.0);
    }

    #[test]
    fn test_countdown_remaining_never_negative() {
        let mut cd = Countdown::new(10.0);
        cd.tick(500.0);
        assert_eq!(cd.remaining(), 0.0);
        assert_eq!(cd.progress(), 1.0);
    }

    #[test]
    fn test_countdown_ignores_negative_dt() {
        let mut cd = Countdown::new(10.0);
        cd.tick(-50.0);
        assert_eq!(cd.remaining(), 10.0);
    }

    #[test]
    fn test_default_is_expired() {
        let cd = Countdown::default();
        assert!(cd.expired());
        assert_eq!(cd.progress(), 1.0);
    }

    #[test]
    fn test_progress_tracks_elapsed() {
        let mut cd = Countdown::new(1000.0);
        cd.tick(250.0);
        assert!((cd.progress() - 0.25).abs() < 1e-6);
        cd.restart();
        assert_eq!(cd.progress(), 0.0);
    }

    #[test]
    fn test_frame_timer_wraps() {
        let mut ft = FrameTimer::new(100.0);
        for _ in 0..3 {
            ft.tick_wrapping(100.0, 2);
        }
        assert_eq!(ft.frame, 1);
        ft.reset();
        assert_eq!(ft.frame, 0);
    }
}
