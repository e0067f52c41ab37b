//! Orbit camera: a yaw/pitch/distance triple around a look-at target.
//!
//! The eye rides a sphere around the target; at zero yaw and zero pitch it
//! sits on the +Z side looking down -Z, which is directly behind an actor at
//! heading 0. Pitch is clamped short of the poles so the look-at basis never
//! degenerates.

use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

pub struct OrbitCamera {
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub distance: f32,
    pub target: Vec3,
    pub viewport: (u32, u32),
}

impl OrbitCamera {
    pub const MIN_DISTANCE: f32 = 4.0;
    pub const MAX_DISTANCE: f32 = 40.0;
    const MAX_PITCH_DEG: f32 = 89.0;

    const FOV_Y_DEG: f32 = 60.0;
    const Z_NEAR: f32 = 0.1;
    const Z_FAR: f32 = 100.0;

    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            yaw_deg: 25.0,
            pitch_deg: 15.0,
            distance: 12.0,
            target: Vec3::ZERO,
            viewport: (viewport_width, viewport_height),
        }
    }

    /// Rotate the orbit. Yaw is unbounded; pitch clamps short of the poles.
    pub fn orbit(&mut self, delta_yaw_deg: f32, delta_pitch_deg: f32) {
        self.yaw_deg += delta_yaw_deg;
        self.pitch_deg =
            (self.pitch_deg + delta_pitch_deg).clamp(-Self::MAX_PITCH_DEG, Self::MAX_PITCH_DEG);
    }

    /// Scale the orbit radius, clamped to the usable range.
    pub fn zoom_by(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn eye(&self) -> Vec3 {
        let yaw = self.yaw_deg.to_radians();
        let pitch = self.pitch_deg.to_radians();
        let dir = Vec3::new(
            yaw.sin() * pitch.cos(),
            pitch.sin(),
            yaw.cos() * pitch.cos(),
        );
        self.target + dir * self.distance
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let aspect = self.viewport.0.max(1) as f32 / self.viewport.1.max(1) as f32;
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            Self::FOV_Y_DEG.to_radians(),
            aspect,
            Self::Z_NEAR,
            Self::Z_FAR,
        );

        CameraUniform {
            view_proj: (proj * view).to_cols_array_2d(),
        }
    }
}
