use super::constants::*;
use super::signals::ControlSignals;
use glam::{Vec2, Vec3};
use rand::Rng;

// Host-side mirror of shaders/simulation.wgsl. The GPU pass is the source of
// truth for rendering; these functions pin down its contract.

#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Per-particle pseudo-random value in [0, 1).
#[inline]
pub fn hash(p: Vec2) -> f32 {
    fract((p.dot(Vec2::new(12.9898, 78.233))).sin() * 43758.5453)
}

#[inline]
pub fn particle_seed(uv: Vec2) -> Vec2 {
    Vec2::new(hash(uv), hash(Vec2::new(uv.y, uv.x)))
}

/// Texel-centre UV of particle (x, y) on a `size` x `size` grid.
#[inline]
pub fn texel_uv(x: u32, y: u32, size: u32) -> Vec2 {
    let s = size.max(1) as f32;
    Vec2::new((x as f32 + 0.5) / s, (y as f32 + 0.5) / s)
}

/// UV of every particle, row-major. Uploaded as the renderer's instance buffer.
pub fn particle_uvs(size: u32) -> Vec<[f32; 2]> {
    let mut uvs = Vec::with_capacity((size as usize) * (size as usize));
    for y in 0..size {
        for x in 0..size {
            uvs.push(texel_uv(x, y, size).to_array());
        }
    }
    uvs
}

/// Oscillating wind displacement; a zero wind direction yields no wind.
#[inline]
pub fn wind_offset(dir: Vec2, speed: f32, oscillation: f32, time: f32) -> Vec2 {
    dir.normalize_or_zero() * speed * (time * oscillation).sin()
}

/// Normalized fall height in (0, 1]; wraps back to the top once per cycle.
#[inline]
pub fn fall_height(time: f32, fall_speed: f32, seed: f32) -> f32 {
    1.0 - fract(time * fall_speed + seed)
}

pub fn base_position(uv: Vec2, s: &ControlSignals) -> Vec3 {
    let n = particle_seed(uv);
    let t = s.time;
    let wind = wind_offset(s.wind, s.wind_speed, s.wind_oscillation, t);
    let h = fall_height(t, s.fall_speed, n.x);
    let x = (uv.x - 0.5) * WORLD_EXTENT_X + wind.x + (n.x - 0.5) * JITTER_X;
    let y = (uv.y - 0.5) * WORLD_EXTENT_Y
        + wind.y
        + (t * SWAY_FREQ + n.y * SWAY_PHASE).sin() * SWAY_AMPLITUDE;
    Vec3::new(x, y, h * DEPTH_SCALE)
}

/// Unscaled pointer forces acting on one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VortexForce {
    pub attraction: Vec3,
    pub swirl: Vec3,
    pub influence: f32,
}

/// Attraction toward and rotation around the pointer, or `None` outside the
/// radius or within `MIN_POINTER_DISTANCE` of the pointer.
pub fn vortex_force(pos: Vec3, s: &ControlSignals) -> Option<VortexForce> {
    let to_pointer = s.pointer_world - pos;
    let dist = to_pointer.length();
    if dist >= s.attraction_radius || dist <= MIN_POINTER_DISTANCE {
        return None;
    }
    let influence = (1.0 - dist / s.attraction_radius).powf(INFLUENCE_EXPONENT);
    let attraction = to_pointer / dist * influence * s.attraction_strength;
    let mut tangent = to_pointer.cross(Vec3::Z);
    if tangent.length() < MIN_POINTER_DISTANCE {
        tangent = to_pointer.cross(Vec3::Y);
    }
    let swirl = tangent.normalize_or_zero() * influence * s.vortex_strength * s.vortex_speed;
    Some(VortexForce {
        attraction,
        swirl,
        influence,
    })
}

/// Three-frequency wobble, before scaling by audio and hover intensity.
pub fn vibration(uv: Vec2, pos: Vec3, time: f32) -> Vec3 {
    let seed = hash(uv);
    let f1 = 10.0 + seed * 5.0;
    let f2 = 15.0 + seed * 7.0;
    let f3 = 8.0 + seed * 3.0;
    Vec3::new(
        (time * f1 + pos.x * 2.0).sin() * 0.3,
        (time * f2 + pos.y * 2.0).cos() * 0.3,
        (time * f3 + pos.z * 1.5).sin() * 0.2,
    )
}

/// Position written for the particle at `uv`.
pub fn simulate(uv: Vec2, s: &ControlSignals) -> Vec3 {
    let mut pos = base_position(uv, s);
    if !s.pointer_active {
        return pos;
    }
    if let Some(f) = vortex_force(pos, s) {
        pos += f.attraction * ATTRACTION_OFFSET + f.swirl * VORTEX_OFFSET;
    }
    if s.audio_amplitude > VIBRATION_GATE && s.pointer_world.distance(pos) >= s.attraction_radius {
        let intensity = s.audio_amplitude * s.hover_duration;
        pos += vibration(uv, pos, s.time) * intensity * VIBRATION_SCALE;
    }
    pos
}

/// RGBA texels on a sphere of `SEED_SPHERE_RADIUS`, used to fill the position
/// textures before the first simulation pass.
pub fn seed_positions<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<[f32; 4]> {
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let v = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let len = v.length();
        if len > 1.0 || len < 1e-6 {
            continue;
        }
        let p = v / len * SEED_SPHERE_RADIUS;
        out.push([p.x, p.y, p.z, 1.0]);
    }
    out
}
