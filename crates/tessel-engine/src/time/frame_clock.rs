use std::time::{Duration, Instant};

/// Shortest step a frame reports.
pub const MIN_DT: Duration = Duration::from_micros(100);
/// Longest step a frame reports; stalls (debugger, minimize, drag) are cut to this.
pub const MAX_DT: Duration = Duration::from_millis(250);

#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped to `MIN_DT..=MAX_DT`.
    pub dt: f32,
    /// Zero on the first frame.
    pub frame_index: u64,
}

/// Measures the step between consecutive frames.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let step = now.saturating_duration_since(self.last).clamp(MIN_DT, MAX_DT);
        self.last = now;
        let frame_index = self.frames;
        self.frames = self.frames.wrapping_add(1);
        FrameTime {
            dt: step.as_secs_f32(),
            frame_index,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_step_reports_minimum() {
        let mut clock = FrameClock::new();
        let t = clock.last;
        assert!((clock.tick_at(t).dt - 0.0001).abs() < 1e-6);
    }

    #[test]
    fn stall_reports_maximum() {
        let mut clock = FrameClock::new();
        let t = clock.last;
        assert!((clock.tick_at(t + Duration::from_secs(5)).dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn step_is_measured_from_previous_tick() {
        let mut clock = FrameClock::new();
        let t = clock.last;
        let first = clock.tick_at(t + Duration::from_millis(10));
        let second = clock.tick_at(t + Duration::from_millis(26));
        assert!((second.dt - 0.016).abs() < 1e-5);
        assert_eq!((first.frame_index, second.frame_index), (0, 1));
    }

    #[test]
    fn clock_going_backwards_is_not_negative() {
        let mut clock = FrameClock::new();
        let t = clock.last;
        clock.tick_at(t + Duration::from_millis(50));
        assert!((clock.tick_at(t).dt - 0.0001).abs() < 1e-6);
    }
}
