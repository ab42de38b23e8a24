use super::camera::Camera;
use glam::{Vec2, Vec3};

// Seconds of continuous hover that map to a hover duration of 1.0
pub const HOVER_RAMP_SEC: f32 = 3.0;

const PARALLEL_EPSILON: f32 = 1e-6;

/// Client pixel coordinates to NDC (x right, y up).
#[inline]
pub fn client_to_ndc(client: Vec2, viewport: Vec2) -> Vec2 {
    let w = viewport.x.max(1.0);
    let h = viewport.y.max(1.0);
    Vec2::new(client.x / w * 2.0 - 1.0, -(client.y / h) * 2.0 + 1.0)
}

/// Casts a ray from the camera through `ndc` and intersects it with the z = 0 plane.
///
/// Returns `None` when the ray is parallel to the plane.
pub fn unproject_to_plane(camera: &Camera, ndc: Vec2) -> Option<Vec3> {
    let p = camera.unproject(ndc.extend(0.5));
    let dir = (p - camera.eye).normalize_or_zero();
    if dir.z.abs() < PARALLEL_EPSILON {
        return None;
    }
    let distance = -camera.eye.z / dir.z;
    Some(camera.eye + dir * distance)
}

/// Latest pointer position in world space and whether it is over the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerTracker {
    world: Vec3,
    active: bool,
}

impl PointerTracker {
    pub fn move_to(&mut self, client: Vec2, viewport: Vec2, camera: &Camera) {
        let ndc = client_to_ndc(client, viewport);
        if let Some(world) = unproject_to_plane(camera, ndc) {
            self.world = world;
        }
        self.active = true;
    }

    pub fn leave(&mut self) {
        self.active = false;
    }

    pub fn world(&self) -> Vec3 {
        self.world
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Continuous hover time, normalized over `HOVER_RAMP_SEC`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HoverClock {
    seconds: f32,
}

impl HoverClock {
    pub fn tick(&mut self, dt_sec: f32, active: bool) -> f32 {
        if active {
            self.seconds += dt_sec.max(0.0);
        } else {
            self.seconds = 0.0;
        }
        self.value()
    }

    pub fn value(&self) -> f32 {
        (self.seconds / HOVER_RAMP_SEC).clamp(0.0, 1.0)
    }
}
