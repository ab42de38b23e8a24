// Host-side tests for constants and their mathematical relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod core_constants {
    include!("../src/core/constants.rs");
}

use constants::*;
use core_constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    // Rates applied per frame must be proper fractions
    for rate in [
        RANGE_EMA,
        EXCITATION_ATTACK,
        EXCITATION_RELEASE,
        EXCITATION_IDLE_DECAY,
        SPEED_LERP,
    ] {
        assert!(rate > 0.0 && rate < 1.0);
    }
    assert!(EXCITATION_ATTACK > EXCITATION_RELEASE);

    // Percentile window
    assert!(PERCENTILE_LOW < PERCENTILE_HIGH);
    assert!(MIN_CALIBRATION_SAMPLES <= HISTORY_CAPACITY);
    assert!(MIN_RANGE > 0.0);

    // Camera
    assert!(CAMERA_Z > 0.0);
    assert!(CAMERA_FOV_DEG > 0.0 && CAMERA_FOV_DEG < 180.0);

    assert!(VOLUME_STEP > 0.0 && VOLUME_STEP < 1.0);
    assert!(MAX_FRAME_DT_SEC > 0.0);
}

#[test]
fn canvas_opts_out_of_browser_touch_panning() {
    assert_eq!(TOUCH_ACTION_PROP, "touch-action");
    assert_eq!(TOUCH_ACTION_VALUE, "none");
}

#[test]
fn weights_sum_to_one() {
    let sum: f32 = ENERGY_WEIGHTS.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!((BEAT_PREV_KEEP + BEAT_RAW_WEIGHT - 1.0).abs() < 1e-6);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn fft_size_is_a_power_of_two() {
    assert!(FFT_SIZE.is_power_of_two());
    assert!(MAX_GRID_SIZE.is_power_of_two());
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn vortex_offsets_are_damped() {
    assert!(ATTRACTION_OFFSET < 1.0);
    assert!(VORTEX_OFFSET < ATTRACTION_OFFSET);
    assert!(VIBRATION_SCALE <= 1.0);
}
