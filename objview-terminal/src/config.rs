//! Viewer tuning knobs
use std::time::Duration;

/// Step sizes for gestures and the frame rate target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    /// Degrees per key press or per dragged cell.
    pub rotate_step: f64,
    /// Model units per key press.
    pub move_step: f64,
    /// Factor applied per zoom-in; zoom-out uses its reciprocal.
    pub zoom_step: f64,
    pub fps: u32,
}

impl ViewerConfig {
    pub fn frame_time(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            rotate_step: 5.0,
            move_step: 0.05,
            zoom_step: 1.1,
            fps: 30,
        }
    }
}
