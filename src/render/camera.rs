//! Perspective camera: keyboard fly movement, orbit, and picking rays.

use crate::render::pick::Ray;
use glam::Vec3;

/// Held-key movement flags sampled every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraMovement {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y: f32,
    viewport: (f32, f32),
}

const MOVE_SPEED: f32 = 0.5;

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            fov_y: 75f32.to_radians(),
            viewport: (1.0, 1.0),
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width.max(1.0), height.max(1.0));
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.0 / self.viewport.1
    }

    /// (forward, right, up) unit vectors for the current orientation.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let cos_pitch = self.pitch.cos();
        let forward = Vec3::new(
            self.yaw.cos() * cos_pitch,
            self.pitch.sin(),
            self.yaw.sin() * cos_pitch,
        );
        let right = Vec3::new(-self.yaw.sin(), 0.0, self.yaw.cos());
        let up = right.cross(forward).normalize_or_zero();
        (forward, right, up)
    }

    /// Aims the camera at `target` without moving it.
    pub fn look_at(&mut self, target: Vec3) {
        let to_target = target - self.position;
        if to_target.length_squared() <= 1e-12 {
            return;
        }
        let dir = to_target.normalize();
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir.y.asin();
        self.wrap_angles();
    }

    /// Rotates the camera around `pivot` keeping its distance.
    pub fn orbit_around(&mut self, pivot: Vec3, yaw_delta: f32) {
        self.yaw += yaw_delta;
        self.wrap_angles();
        let distance = (self.position - pivot).length().max(0.05);
        let (forward, ..) = self.basis();
        self.position = pivot - forward * distance;
    }

    /// Applies held-key movement. Forward/backward follow the view
    /// direction; strafing stays horizontal. Returns whether anything moved.
    pub fn update_movement(&mut self, movement: &CameraMovement, dt: f32) -> bool {
        // MOVE_SPEED is per 60 Hz frame; scale by dt, capped so a stall
        // does not teleport the camera.
        let step = MOVE_SPEED * dt.min(0.1) * 60.0;
        let (forward, right, _) = self.basis();
        let mut delta = Vec3::ZERO;
        if movement.move_forward {
            delta += forward * step;
        }
        if movement.move_backward {
            delta -= forward * step;
        }
        if movement.move_left {
            delta -= right * step;
        }
        if movement.move_right {
            delta += right * step;
        }
        if delta == Vec3::ZERO {
            return false;
        }
        self.position += delta;
        true
    }

    /// Ray from the camera through normalized device coordinates
    /// (`-1..=1`, +y up).
    pub fn ray_through(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let (forward, right, up) = self.basis();
        let half_height = (self.fov_y * 0.5).tan();
        let half_width = half_height * self.aspect();
        let dir = (forward + right * (ndc_x * half_width) + up * (ndc_y * half_height))
            .normalize_or_zero();
        Ray {
            origin: self.position,
            dir,
        }
    }

    /// Ray through a pointer position in viewport pixels (top-left origin).
    pub fn ray_from_screen(&self, x: f32, y: f32) -> Ray {
        let (width, height) = self.viewport;
        let ndc_x = (x / width) * 2.0 - 1.0;
        let ndc_y = -(y / height) * 2.0 + 1.0;
        self.ray_through(ndc_x, ndc_y)
    }

    fn wrap_angles(&mut self) {
        const TWO_PI: f32 = std::f32::consts::PI * 2.0;
        if self.yaw.is_finite() {
            self.yaw = (self.yaw + std::f32::consts::PI).rem_euclid(TWO_PI) - std::f32::consts::PI;
        }
        self.pitch = self
            .pitch
            .clamp(-std::f32::consts::FRAC_PI_2 + 1e-3, std::f32::consts::FRAC_PI_2 - 1e-3);
    }
}
