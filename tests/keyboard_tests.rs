// Host-side tests for pure keyboard functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]

mod controls {
    include!("../src/core/controls.rs");
}
mod constants {
    include!("../src/constants.rs");
}

use constants::VOLUME_STEP;
use controls::*;

#[test]
fn test_audio_command_for_key() {
    assert_eq!(audio_command_for_key("m"), Some(AudioCommand::TogglePlayback));
    assert_eq!(audio_command_for_key("M"), Some(AudioCommand::TogglePlayback));
    assert_eq!(audio_command_for_key("ArrowUp"), Some(AudioCommand::VolumeUp));
    assert_eq!(audio_command_for_key("ArrowDown"), Some(AudioCommand::VolumeDown));

    assert_eq!(audio_command_for_key("ArrowLeft"), None);
    assert_eq!(audio_command_for_key(" "), None);
    assert_eq!(audio_command_for_key("mute"), None);
    assert_eq!(audio_command_for_key(""), None);
}

#[test]
fn test_arrow_keys_keep_page_scrolling() {
    assert!(AudioCommand::TogglePlayback.suppresses_default());
    assert!(!AudioCommand::VolumeUp.suppresses_default());
    assert!(!AudioCommand::VolumeDown.suppresses_default());
}

#[test]
fn test_step_volume() {
    let up = step_volume(0.3, AudioCommand::VolumeUp, VOLUME_STEP);
    assert!((up - 0.35).abs() < 1e-6);
    let down = step_volume(0.3, AudioCommand::VolumeDown, VOLUME_STEP);
    assert!((down - 0.25).abs() < 1e-6);
    assert_eq!(step_volume(0.3, AudioCommand::TogglePlayback, VOLUME_STEP), 0.3);
}

#[test]
fn test_step_volume_clamps() {
    assert_eq!(step_volume(0.98, AudioCommand::VolumeUp, VOLUME_STEP), 1.0);
    assert_eq!(step_volume(0.02, AudioCommand::VolumeDown, VOLUME_STEP), 0.0);

    let mut v = 0.5;
    for _ in 0..100 {
        v = step_volume(v, AudioCommand::VolumeUp, VOLUME_STEP);
    }
    assert_eq!(v, 1.0);
}
