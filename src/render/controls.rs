//! Orbit/navigation controls: enabled and auto-rotate flags plus the
//! per-frame update that spins the camera around its target.

use crate::render::camera::Camera;
use glam::Vec3;

/// Matches the original editor's auto-rotate cadence: one full orbit every
/// thirty seconds.
const AUTO_ROTATE_SPEED: f32 = std::f32::consts::TAU / 30.0;

#[derive(Debug)]
pub struct NavControls {
    pub enabled: bool,
    pub auto_rotate: bool,
    pub target: Vec3,
}

impl Default for NavControls {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_rotate: false,
            target: Vec3::ZERO,
        }
    }
}

impl NavControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-frame update. Auto-rotation only runs while the controls are
    /// enabled.
    pub fn update(&self, camera: &mut Camera, dt: f32) {
        if self.enabled && self.auto_rotate {
            camera.orbit_around(self.target, AUTO_ROTATE_SPEED * dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_rotate_orbits_the_target() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), 0.0, 0.0);
        camera.look_at(Vec3::ZERO);
        let mut controls = NavControls::new();
        controls.auto_rotate = true;

        let before = camera.position;
        controls.update(&mut camera, 1.0);
        assert!((camera.position - before).length() > 1e-3);
        assert!(((camera.position - controls.target).length() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn disabled_controls_do_not_move_the_camera() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), 0.0, 0.0);
        let mut controls = NavControls::new();
        controls.auto_rotate = true;
        controls.enabled = false;

        let before = camera.position;
        controls.update(&mut camera, 1.0);
        assert_eq!(camera.position, before);
    }
}
