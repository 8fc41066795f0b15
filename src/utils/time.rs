use std::time::{Duration, Instant};

/// Longest frame delta handed to the simulation, in seconds.
pub const MAX_DELTA: f32 = 0.1;

/// Frame clock providing the per-tick delta time.
///
/// With a fixed step every tick reports the same delta, which keeps
/// headless runs deterministic.
#[derive(Debug, Clone)]
pub struct Timer {
    last_update: Instant,
    fixed_step: Option<f32>,
    delta: f32,
    /// Simulated seconds since creation
    pub elapsed: f32,
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            fixed_step: None,
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    #[must_use]
    pub fn fixed(step: f32) -> Self {
        Self {
            fixed_step: Some(step),
            ..Self::new()
        }
    }

    /// Advances the clock by one frame and returns the new delta.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let measured = now.duration_since(self.last_update);
        self.last_update = now;
        self.advance(measured)
    }

    fn advance(&mut self, measured: Duration) -> f32 {
        self.delta = self
            .fixed_step
            .unwrap_or_else(|| measured.as_secs_f32().min(MAX_DELTA));
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.delta
    }

    /// Seconds covered by the last tick.
    #[inline]
    #[must_use]
    pub fn delta_time(&self) -> f32 {
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_ignores_wall_clock() {
        let mut timer = Timer::fixed(0.016);
        timer.advance(Duration::from_secs(3));
        assert_eq!(timer.delta_time(), 0.016);
        assert_eq!(timer.frame_count, 1);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut timer = Timer::new();
        assert_eq!(timer.advance(Duration::from_secs(2)), MAX_DELTA);
    }
}
