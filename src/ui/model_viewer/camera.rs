// SPDX-License-Identifier: MPL-2.0
//! Orbit camera around a target point.

use glam::{Mat4, Vec3};

/// Where the camera starts, looking at the origin.
pub const INITIAL_EYE: Vec3 = Vec3::new(0.0, 1.0, 5.0);

/// Vertical field of view. Narrow, so the model reads almost orthographic.
pub const FOV_Y_DEGREES: f32 = 10.0;

pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

pub const MIN_DISTANCE: f32 = 0.1;
pub const MAX_DISTANCE: f32 = 200.0;

/// Pitch stays just short of straight up/down to keep `look_at` stable.
pub const MAX_PITCH: f32 = 1.55;

/// Radians of yaw per widget width dragged.
const ROTATE_SPEED: f32 = 2.5;

/// Zoom factor per scroll line.
const ZOOM_STEP: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at(INITIAL_EYE, Vec3::ZERO)
    }
}

impl OrbitCamera {
    /// Builds the orbit parameters that place the eye at `eye`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self {
            target,
            distance,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    fn forward(&self) -> Vec3 {
        (self.target - self.eye()).normalize_or_zero()
    }

    fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection(aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, NEAR, FAR)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        Self::projection(aspect) * self.view()
    }

    /// Rotates by a cursor delta given in widget pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32, width: f32, height: f32) {
        let width = width.max(1.0);
        let height = height.max(1.0);
        self.yaw -= ROTATE_SPEED * dx / width;
        self.pitch = (self.pitch + ROTATE_SPEED * dy / height).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Moves the target in the view plane so the model follows the cursor.
    pub fn pan(&mut self, dx: f32, dy: f32, height: f32) {
        let world_per_pixel =
            2.0 * self.distance * (FOV_Y_DEGREES.to_radians() * 0.5).tan() / height.max(1.0);
        self.target += (-dx * self.right() + dy * self.up()) * world_per_pixel;
    }

    /// Zooms by scroll lines; positive values move closer.
    pub fn zoom(&mut self, lines: f32) {
        let factor = ZOOM_STEP.powf(lines);
        self.distance = (self.distance / factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}
