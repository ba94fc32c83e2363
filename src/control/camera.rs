//! Bounded camera boom length.

/// Spring-arm length accumulator: each zoom input moves the length by a
/// fixed step, clamped to `[min_distance, max_distance]`.
#[derive(Debug, Clone, Copy)]
pub struct CameraArm {
    pub length: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub step: f32,
}

impl CameraArm {
    /// Moves the camera closer by one step.
    pub fn zoom_in(&mut self) {
        self.length = (self.length - self.step).max(self.min_distance);
    }

    /// Moves the camera farther by one step.
    pub fn zoom_out(&mut self) {
        self.length = (self.length + self.step).min(self.max_distance);
    }
}

impl Default for CameraArm {
    fn default() -> Self {
        Self {
            length: 300.0,
            min_distance: 100.0,
            max_distance: 600.0,
            step: 50.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_in_clamps_at_min_distance() {
        let mut arm = CameraArm::default();
        for _ in 0..10 {
            arm.zoom_in();
        }
        assert_eq!(arm.length, 100.0);
    }

    #[test]
    fn zoom_out_clamps_at_max_distance() {
        let mut arm = CameraArm::default();
        for _ in 0..10 {
            arm.zoom_out();
        }
        assert_eq!(arm.length, 600.0);
    }

    #[test]
    fn single_steps_move_by_the_fixed_step() {
        let mut arm = CameraArm::default();
        arm.zoom_in();
        assert_eq!(arm.length, 250.0);
        arm.zoom_out();
        assert_eq!(arm.length, 300.0);
    }
}
