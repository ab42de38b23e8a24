use glam::{Mat4, Vec3, Vec4};

/// Perspective camera used for both rendering and pointer unprojection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera on the +Z axis looking at the origin.
    pub fn looking_at_origin(distance: f32, fovy_degrees: f32, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: fovy_degrees.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect.max(1e-4), self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Maps a point in normalized device coordinates back to world space.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        let inv = (self.projection_matrix() * self.view_matrix()).inverse();
        let p = inv * Vec4::new(ndc.x, ndc.y, ndc.z, 1.0);
        p.truncate() / p.w
    }
}
