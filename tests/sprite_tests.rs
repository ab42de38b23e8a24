// Host-side tests for sprite sizing, shape selection and outlines.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]

mod constants {
    include!("../src/core/constants.rs");
}
mod analysis {
    include!("../src/core/analysis.rs");
}
mod params {
    include!("../src/core/params.rs");
}
mod signals {
    include!("../src/core/signals.rs");
}
mod simulation {
    include!("../src/core/simulation.rs");
}
mod sprite {
    include!("../src/core/sprite.rs");
}

use glam::{Vec2, Vec3};
use params::{Shape, SizeMode};
use signals::ControlSignals;
use sprite::*;

#[test]
fn mixed_shape_proportions() {
    let n = 100_000;
    let mut counts = [0usize; 4];
    for i in 0..n {
        let idx = match mixed_shape(i as f32 / n as f32) {
            Shape::Circle => 0,
            Shape::Square => 1,
            Shape::Triangle => 2,
            Shape::Line => 3,
            Shape::Mixed => unreachable!(),
        };
        counts[idx] += 1;
    }
    let frac = |c: usize| c as f32 / n as f32;
    assert!((frac(counts[0]) - 0.217).abs() < 0.002);
    assert!((frac(counts[1]) - 0.217).abs() < 0.002);
    assert!((frac(counts[2]) - 0.35).abs() < 0.002);
    assert!((frac(counts[3]) - 0.216).abs() < 0.002);
}

#[test]
fn mixed_over_particles_hits_every_shape() {
    let mut seen = [false; 4];
    for uv in simulation::particle_uvs(32) {
        let shape = resolve_shape(Shape::Mixed, rotation(Vec2::from(uv)));
        let idx = match shape {
            Shape::Circle => 0,
            Shape::Square => 1,
            Shape::Triangle => 2,
            Shape::Line => 3,
            Shape::Mixed => panic!("mixed must resolve to a concrete shape"),
        };
        seen[idx] = true;
    }
    assert!(seen.iter().all(|s| *s));
}

#[test]
fn fixed_shapes_resolve_to_themselves() {
    for shape in [Shape::Circle, Shape::Square, Shape::Triangle, Shape::Line] {
        assert_eq!(resolve_shape(shape, 1.234), shape);
    }
}

#[test]
fn sdf_signs() {
    assert!(sd_circle(Vec2::ZERO) < 0.0);
    assert!(sd_circle(Vec2::new(0.9, 0.0)) > 0.0);
    assert!(sd_circle(Vec2::new(0.6, 0.0)).abs() < 1e-6);

    assert!((sd_square(Vec2::ZERO) + 0.5).abs() < 1e-6);
    assert!(sd_square(Vec2::new(0.5, 0.2)).abs() < 1e-6);
    assert!(sd_square(Vec2::new(0.9, 0.9)) > 0.0);

    assert!(sd_triangle(Vec2::ZERO) < 0.0);
    assert!(sd_triangle(Vec2::new(0.0, 1.0)) > 0.0);

    assert!(sd_line(Vec2::new(0.8, 0.0)) < 0.0);
    assert!(sd_line(Vec2::new(0.0, 0.5)) > 0.0);
}

#[test]
fn triangle_outline_is_zero() {
    let base_y = -0.5 / 3.0_f32.sqrt();
    for x in [-0.4, 0.0, 0.25] {
        let d = sd_triangle(Vec2::new(x, base_y));
        assert_eq!(d, 0.0);
        assert!(!d.is_nan());
    }
    // just above the base edge is inside, just below is outside
    assert!(sd_triangle(Vec2::new(0.0, base_y + 0.01)) < 0.0);
    assert!(sd_triangle(Vec2::new(0.0, base_y - 0.01)) > 0.0);
}

#[test]
fn stroke_is_solid_on_outline_and_fades_away() {
    assert_eq!(wireframe(0.0), 1.0);
    assert!(wireframe(0.075) > 0.0 && wireframe(0.075) < 1.0);
    assert_eq!(wireframe(0.2), 0.0);
    assert_eq!(wireframe(-0.2), 0.0);
}

#[test]
fn unlit_particles_are_dimmed_or_discarded() {
    assert_eq!(unlit_fragment(0.005, 1.0), None);
    let (alpha, brightness) = unlit_fragment(1.0, 0.8).expect("visible");
    assert!((alpha - 0.8).abs() < 1e-6);
    assert!((brightness - 0.3).abs() < 1e-6);
}

#[test]
fn depth_alpha_range() {
    assert!((depth_alpha(0.0) - 1.04).abs() < 1e-6);
    assert!((depth_alpha(1.0) - 0.04).abs() < 1e-6);
    assert!((depth_alpha(5.0) - 0.04).abs() < 1e-6);
}

#[test]
fn random_size_spans_min_to_max() {
    assert_eq!(base_size(SizeMode::Fixed, 3.0, 1.0, 5.0, 0.9), 3.0);
    assert_eq!(base_size(SizeMode::Random, 3.0, 1.0, 5.0, 0.0), 1.0);
    assert_eq!(base_size(SizeMode::Random, 3.0, 1.0, 5.0, 0.5), 3.0);
}

#[test]
fn size_boosts_near_pointer_and_centre() {
    let far = Vec3::new(10.0, 0.0, 0.0);
    let mut s = ControlSignals {
        size_mode: SizeMode::Fixed,
        size_fixed: 2.0,
        glow_size: 1.0,
        center_glow_radius: 3.0,
        attraction_radius: 1.0,
        ..ControlSignals::default()
    };
    let uv = Vec2::new(0.5, 0.5);
    assert_eq!(sprite_size(uv, far, &s), 2.0);

    // at the pointer: full pointer boost
    s.pointer_active = true;
    s.pointer_world = far;
    assert!((sprite_size(uv, far, &s) - 4.0).abs() < 1e-5);

    // at the origin: half-strength centre boost
    s.pointer_active = false;
    assert!((sprite_size(uv, Vec3::ZERO, &s) - 3.0).abs() < 1e-5);
}
