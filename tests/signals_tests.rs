// Host-side tests for the simulation clock, per-frame signals and the signal bus.
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

use analysis::AudioEnvelope;
use glam::Vec3;
use params::{ParticleParams, Shape};
use signals::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn speed_eases_toward_target() {
    let mut c = SimClock::new(1.0);
    c.advance(0.0, 0.0);
    assert!((c.current_speed() - 0.95).abs() < 1e-6);
    for _ in 0..200 {
        c.advance(0.0, 0.0);
    }
    assert!(c.current_speed() < 1e-3);
    assert_eq!(c.time(), 0.0);
}

#[test]
fn speed_change_does_not_jump_time() {
    let mut c = SimClock::new(1.0);
    for _ in 0..60 {
        c.advance(1.0 / 60.0, 1.0);
    }
    let before = c.time();
    let after = c.advance(1.0 / 60.0, 100.0);
    // first step after the change moves at most the lerped speed
    let speed = 1.0 + 99.0 * 0.05;
    assert!((after - before - speed / 60.0).abs() < 1e-4);
}

#[test]
fn time_never_runs_backwards() {
    let mut c = SimClock::new(0.5);
    let mut last = 0.0;
    for i in 0..100 {
        let t = c.advance(if i % 7 == 0 { -1.0 } else { 0.016 }, 0.5);
        assert!(t >= last);
        last = t;
    }
}

#[test]
fn compose_copies_params_and_frame_inputs() {
    let params = ParticleParams {
        shape: Shape::Triangle,
        attraction_radius: 2.5,
        ..ParticleParams::default()
    };
    let s = ControlSignals::compose(&params, 4.0, 0.016, Vec3::X, true, 0.6, 0.25);
    assert_eq!(s.time, 4.0);
    assert_eq!(s.shape, Shape::Triangle);
    assert_eq!(s.attraction_radius, 2.5);
    assert_eq!(s.blur, params.blur());
    assert_eq!(s.pointer_world, Vec3::X);
    assert!(s.pointer_active);
    assert_eq!(s.audio_amplitude, 0.6);
    assert_eq!(s.hover_duration, 0.25);
    assert_eq!(s.vortex_color, params.vortex_color.0);
}

#[test]
fn bus_delivers_to_every_subscriber() {
    let mut bus = SignalBus::new();
    let glitches = Rc::new(RefCell::new(Vec::new()));
    let amps = Rc::new(RefCell::new(Vec::new()));

    let g = glitches.clone();
    bus.subscribe_glitch(move |v| g.borrow_mut().push(v));
    let g = glitches.clone();
    bus.subscribe_glitch(move |v| g.borrow_mut().push(v * 10.0));
    let a = amps.clone();
    bus.subscribe_audio_data(move |ev| a.borrow_mut().push((ev.amplitude, ev.hover_duration)));
    assert_eq!(bus.subscriber_count(), 3);

    bus.publish_glitch(0.5);
    let env = AudioEnvelope {
        amplitude: 0.4,
        bass: 0.9,
        ..AudioEnvelope::ZERO
    };
    bus.publish_audio_data(&AudioDataEvent::new(&env, 0.75));

    assert_eq!(*glitches.borrow(), vec![0.5, 5.0]);
    assert_eq!(*amps.borrow(), vec![(0.4, 0.75)]);
}

#[test]
fn audio_event_carries_normalized_bands() {
    let env = AudioEnvelope {
        amplitude: 0.3,
        bass: 0.1,
        mid: 0.2,
        treble: 0.4,
        raw_bass: 0.9,
        raw_mid: 0.9,
        raw_treble: 0.9,
    };
    let ev = AudioDataEvent::new(&env, 1.0);
    assert_eq!((ev.bass, ev.mid, ev.treble), (0.1, 0.2, 0.4));
}
