// Web front-end tuning: camera, DOM hooks and control step sizes.

// Camera
pub const CAMERA_Z: f32 = 6.0; // eye distance from the z = 0 pointer plane
pub const CAMERA_FOV_DEG: f32 = 25.0;

// Host page hooks
pub const CANVAS_ID: &str = "app-canvas";
pub const AUDIO_TOGGLE_ID: &str = "audio-toggle";
pub const PARAMS_ATTR: &str = "data-particles";
pub const AUDIO_SRC_ATTR: &str = "data-audio-src";
pub const DEFAULT_AUDIO_SRC: &str = "audio/ambient.mp3";

// Canvas takes touch drags itself instead of letting the browser pan
pub const TOUCH_ACTION_PROP: &str = "touch-action";
pub const TOUCH_ACTION_VALUE: &str = "none";

// CSS variables written by the signal subscriber
pub const GLITCH_CSS_VAR: &str = "--glitch-intensity";
pub const AMPLITUDE_CSS_VAR: &str = "--audio-amplitude";

// Keyboard volume nudges
pub const VOLUME_STEP: f32 = 0.05;

// Frame delta clamp so a backgrounded tab does not fast-forward the simulation
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
