use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::pool::impl_handled;

/// Pitch limit applied when mouse look constrains pitch.
pub const PITCH_LIMIT: f32 = 89.0;
/// Zoom (field of view, degrees) is clamped to this range.
pub const ZOOM_RANGE: (f32, f32) = (1.0, 45.0);

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// Free-fly directions understood by [`Camera::process_keyboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Initial orientation and tuning for newly generated cameras.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDefaults {
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub zoom: f32,
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self {
            yaw: -90.0,
            pitch: 0.0,
            speed: 2.5,
            sensitivity: 0.1,
            zoom: 45.0,
        }
    }
}

/// Euler-angle camera. `front`, `right` and `up` are derived from yaw/pitch.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub id: u32,

    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,

    /// Degrees
    pub yaw: f32,
    /// Degrees
    pub pitch: f32,

    pub speed: f32,
    pub sensitivity: f32,
    /// Field of view in degrees
    pub zoom: f32,
}

impl_handled!(Camera, Camera);

impl Camera {
    #[must_use]
    pub fn new(position: Vec3, defaults: &CameraDefaults) -> Self {
        let mut camera = Self {
            id: 0,
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: defaults.yaw,
            pitch: defaults.pitch,
            speed: defaults.speed,
            sensitivity: defaults.sensitivity,
            zoom: defaults.zoom,
        };
        camera.update_vectors();
        camera
    }

    /// Recomputes `front`, `right` and `up` from yaw and pitch.
    pub fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        // keeps the previous right vector when looking straight up or down
        self.right = self
            .front
            .cross(self.world_up)
            .try_normalize()
            .unwrap_or(self.right);
        self.up = self.right.cross(self.front).normalize();
    }

    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
        self.update_vectors();
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.zoom.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    /// Moves along the camera's own basis, free-fly style.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.up * velocity,
            CameraMovement::Down => self.position -= self.up * velocity,
        }
    }

    pub fn process_mouse_move(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.sensitivity;
        self.pitch += y_offset * self.sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    pub fn process_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
    }
}
