use std::time::Instant;

/// Instantaneous frame rate from the gap between consecutive ticks.
#[derive(Debug, Default)]
pub struct FrameRateCounter {
    previous: Option<Instant>,
}

impl FrameRateCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame at `now` and returns frames per second since the
    /// previous tick. `None` on the first tick and when no time has passed.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        let previous = self.previous.replace(now)?;
        let delta = now.saturating_duration_since(previous).as_secs_f64();
        if delta > 0.0 {
            Some(1.0 / delta)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    #[test]
    fn test_first_tick_has_no_rate() {
        let mut counter = FrameRateCounter::new();
        assert_eq!(counter.tick(Instant::now()), None);
    }

    #[test]
    fn test_rate_is_inverse_of_delta() {
        let mut counter = FrameRateCounter::new();
        let start = Instant::now();
        counter.tick(start);
        let fps = counter.tick(start + Duration::from_millis(40)).unwrap();
        assert_relative_eq!(fps, 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_delta_has_no_rate() {
        let mut counter = FrameRateCounter::new();
        let start = Instant::now();
        counter.tick(start);
        assert_eq!(counter.tick(start), None);
    }

    #[test]
    fn test_rate_uses_most_recent_tick() {
        let mut counter = FrameRateCounter::new();
        let start = Instant::now();
        counter.tick(start);
        counter.tick(start + Duration::from_millis(100));
        let fps = counter.tick(start + Duration::from_millis(150)).unwrap();
        assert_relative_eq!(fps, 20.0, epsilon = 1e-9);
    }
}
