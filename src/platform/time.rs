//! Fixed frame pacing
//!
//! The game advances exactly one simulation step per rendered frame. The
//! limiter only waits; it never skips or doubles a step.

use std::time::{Duration, Instant};

use crate::consts::FRAME_RATE;

/// Sleeps until the next frame boundary
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    frame_time: Duration,
    next: Option<Instant>,
    frames: u64,
}

impl Default for FrameLimiter {
    fn default() -> Self {
        Self::new(FRAME_RATE)
    }
}

impl FrameLimiter {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_time: Duration::from_secs(1) / frame_rate.max(1),
            next: None,
            frames: 0,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// How long to wait at `now` before the next frame may start
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next
            .map(|next| next.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Block until the next frame boundary, then schedule the one after it.
    ///
    /// A frame that overran does not try to catch up; the schedule restarts
    /// from the current instant.
    pub fn wait(&mut self) {
        let now = Instant::now();
        let wait = self.remaining(now);
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        let start = self.next.filter(|_| !wait.is_zero()).unwrap_or(now);
        self.next = Some(start + self.frame_time);
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_time_for_sixty_fps() {
        let limiter = FrameLimiter::default();
        let micros = limiter.frame_time().as_micros();
        assert!((16_666..=16_667).contains(&micros));
    }

    #[test]
    fn test_first_frame_does_not_wait() {
        let limiter = FrameLimiter::new(60);
        assert_eq!(limiter.remaining(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_wait_paces_frames() {
        let mut limiter = FrameLimiter::new(200);
        let start = Instant::now();
        for _ in 0..4 {
            limiter.wait();
        }
        // First call is free, the next three each wait ~5ms
        assert!(start.elapsed() >= Duration::from_millis(14));
        assert_eq!(limiter.frames(), 4);
    }
}
