use super::pose_landmarks::NormalizedLandmark;

/// EMA (Exponential Moving Average) smoother over a landmark set.
///
/// Formula: `ema[t] = alpha * current + (1 - alpha) * ema[t-1]`, applied to
/// `x`, `y` and `z` of each landmark index. Visibility passes through.
/// Default alpha: 0.6
pub struct LandmarkSmoother {
    alpha: f32,
    state: Option<Vec<NormalizedLandmark>>,
}

pub const DEFAULT_ALPHA: f32 = 0.6;

impl LandmarkSmoother {
    pub fn new(alpha: f32) -> Self {
        Self { alpha, state: None }
    }

    pub fn smooth(&mut self, current: &[NormalizedLandmark]) -> Vec<NormalizedLandmark> {
        let smoothed: Vec<NormalizedLandmark> = match &self.state {
            Some(prev) if prev.len() == current.len() => current
                .iter()
                .zip(prev)
                .map(|(cur, prev)| NormalizedLandmark {
                    x: self.alpha * cur.x + (1.0 - self.alpha) * prev.x,
                    y: self.alpha * cur.y + (1.0 - self.alpha) * prev.y,
                    z: self.alpha * cur.z + (1.0 - self.alpha) * prev.z,
                    visibility: cur.visibility,
                })
                .collect(),
            _ => current.to_vec(),
        };

        self.state = Some(smoothed.clone());
        smoothed
    }

    /// Forget history, e.g. after the body left the frame.
    pub fn reset(&mut self) {
        self.state = None;
    }
}

impl Default for LandmarkSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lm(x: f32, y: f32) -> NormalizedLandmark {
        NormalizedLandmark::new(x, y, 0.0, 1.0)
    }

    #[test]
    fn test_first_observation_returns_unchanged() {
        let mut smoother = LandmarkSmoother::default();
        let points = vec![lm(0.1, 0.2), lm(0.3, 0.4)];
        assert_eq!(smoother.smooth(&points), points);
    }

    #[test]
    fn test_second_observation_applies_ema() {
        let mut smoother = LandmarkSmoother::new(0.6);
        smoother.smooth(&[lm(0.1, 0.2)]);
        let result = smoother.smooth(&[lm(0.2, 0.4)]);

        assert_relative_eq!(result[0].x, 0.6 * 0.2 + 0.4 * 0.1, epsilon = 1e-6);
        assert_relative_eq!(result[0].y, 0.6 * 0.4 + 0.4 * 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_visibility_is_not_smoothed() {
        let mut smoother = LandmarkSmoother::new(0.5);
        smoother.smooth(&[NormalizedLandmark::new(0.5, 0.5, 0.0, 1.0)]);
        let result = smoother.smooth(&[NormalizedLandmark::new(0.5, 0.5, 0.0, 0.2)]);
        assert_relative_eq!(result[0].visibility, 0.2);
    }

    #[test]
    fn test_convergence() {
        let mut smoother = LandmarkSmoother::new(0.6);
        smoother.smooth(&[lm(0.0, 0.0)]);
        let mut result = Vec::new();
        for _ in 0..50 {
            result = smoother.smooth(&[lm(0.8, 0.9)]);
        }
        assert_relative_eq!(result[0].x, 0.8, epsilon = 1e-4);
        assert_relative_eq!(result[0].y, 0.9, epsilon = 1e-4);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut smoother = LandmarkSmoother::new(0.6);
        smoother.smooth(&[lm(0.0, 0.0)]);
        smoother.reset();
        let result = smoother.smooth(&[lm(0.7, 0.7)]);
        assert_eq!(result, vec![lm(0.7, 0.7)]);
    }

    #[test]
    fn test_length_change_restarts() {
        let mut smoother = LandmarkSmoother::new(0.6);
        smoother.smooth(&[lm(0.0, 0.0)]);
        let points = vec![lm(0.5, 0.5), lm(0.6, 0.6)];
        assert_eq!(smoother.smooth(&points), points);
    }

    #[test]
    fn test_alpha_one_uses_current() {
        let mut smoother = LandmarkSmoother::new(1.0);
        smoother.smooth(&[lm(0.1, 0.1)]);
        assert_eq!(smoother.smooth(&[lm(0.9, 0.8)]), vec![lm(0.9, 0.8)]);
    }
}
