use super::params::{Shape, SizeMode};
use super::signals::ControlSignals;
use super::simulation::{fract, hash};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

// Host-side mirror of shaders/particles.wgsl.

const CIRCLE_RADIUS: f32 = 0.6;
const SQUARE_HALF: f32 = 0.5;
const LINE_HALF_WIDTH: f32 = 0.035;
const TRIANGLE_SCALE: f32 = 0.89;
const LINE_SCALE: f32 = 1.43;
const STROKE_WIDTH: f32 = 0.15;
const DIM_FACTOR: f32 = 0.3;
const DISCARD_BELOW: f32 = 0.01;

/// Per-particle rotation in [0, TAU).
#[inline]
pub fn rotation(uv: Vec2) -> f32 {
    fract(uv.dot(Vec2::new(45.233, 97.113)).sin() * 43758.5453) * TAU
}

/// Shape used by `Mixed` for a given rotation: triangle 35%, the others ~21.7% each.
pub fn mixed_shape(selector: f32) -> Shape {
    let s = fract(selector);
    if s < 0.217 {
        Shape::Circle
    } else if s < 0.434 {
        Shape::Square
    } else if s < 0.784 {
        Shape::Triangle
    } else {
        Shape::Line
    }
}

pub fn resolve_shape(shape: Shape, rotation: f32) -> Shape {
    match shape {
        Shape::Mixed => mixed_shape(rotation * 10.0),
        other => other,
    }
}

pub fn base_size(mode: SizeMode, fixed: f32, min: f32, max: f32, seed: f32) -> f32 {
    match mode {
        SizeMode::Fixed => fixed,
        SizeMode::Random => min + (max - min) * seed,
    }
}

/// Sprite size in pixels with the pointer and centre glow boosts applied.
pub fn sprite_size(uv: Vec2, world: Vec3, s: &ControlSignals) -> f32 {
    let mut size = base_size(s.size_mode, s.size_fixed, s.size_min, s.size_max, hash(uv));
    if s.pointer_active {
        let d = world.distance(s.pointer_world);
        if d < s.attraction_radius {
            size *= 1.0 + (1.0 - d / s.attraction_radius) * s.glow_size;
        }
    }
    let dc = world.length();
    if dc < s.center_glow_radius {
        size *= 1.0 + (1.0 - dc / s.center_glow_radius) * s.glow_size * 0.5;
    }
    size
}

/// Alpha from distance between the particle's view depth and the focus plane.
#[inline]
pub fn depth_alpha(focus_distance: f32) -> f32 {
    1.04 - (focus_distance * 1.5).clamp(0.0, 1.0)
}

#[inline]
fn rotate(p: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c * p.x - s * p.y, s * p.x + c * p.y)
}

pub fn sd_circle(p: Vec2) -> f32 {
    p.length() - CIRCLE_RADIUS
}

pub fn sd_square(p: Vec2) -> f32 {
    let d = p.abs() - Vec2::splat(SQUARE_HALF);
    d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}

pub fn sd_triangle(p: Vec2) -> f32 {
    let k = 3.0_f32.sqrt();
    let mut p = Vec2::new(p.x.abs() - 0.5, p.y + 0.5 / k);
    if p.x + k * p.y > 0.0 {
        p = Vec2::new(p.x - k * p.y, -k * p.x - p.y) / 2.0;
    }
    p.x -= p.x.clamp(-1.0, 0.0);
    -p.length() * sign(p.y)
}

pub fn sd_line(p: Vec2) -> f32 {
    p.y.abs() - LINE_HALF_WIDTH
}

/// Signed distance to the outline of `shape` at sprite-local `p` in [-1, 1]^2.
pub fn shape_distance(shape: Shape, p: Vec2, rotation: f32) -> f32 {
    let r = rotate(p, rotation);
    match resolve_shape(shape, rotation) {
        Shape::Circle | Shape::Mixed => sd_circle(p),
        Shape::Square => sd_square(r),
        Shape::Triangle => sd_triangle(r * TRIANGLE_SCALE),
        Shape::Line => sd_line(r * LINE_SCALE),
    }
}

/// Antialiased stroke coverage around an outline.
#[inline]
pub fn wireframe(distance: f32) -> f32 {
    1.0 - smoothstep(0.0, STROKE_WIDTH, distance.abs())
}

// WGSL `sign`: zero stays zero.
#[inline]
fn sign(x: f32) -> f32 {
    if x == 0.0 {
        0.0
    } else {
        x.signum()
    }
}

#[inline]
fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// `(alpha, brightness)` of a particle outside both glows, or `None` when discarded.
pub fn unlit_fragment(wire: f32, base_alpha: f32) -> Option<(f32, f32)> {
    if wire < DISCARD_BELOW {
        return None;
    }
    Some((base_alpha * wire, DIM_FACTOR))
}
