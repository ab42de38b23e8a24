// Analysis, beat and simulation tuning shared by the CPU code and mirrored in WGSL.

// Spectrum analysis
pub const FFT_SIZE: u32 = 256; // analyser window, yields FFT_SIZE / 2 bins
pub const HISTORY_CAPACITY: usize = 120; // ~2s of frames per band
pub const MIN_CALIBRATION_SAMPLES: usize = 20;
pub const PERCENTILE_LOW: f32 = 0.05;
pub const PERCENTILE_HIGH: f32 = 0.95;
pub const RANGE_EMA: f32 = 0.02; // adaptation speed of min/max towards fresh percentiles
pub const MIN_RANGE: f32 = 0.05; // floor for max - min
pub const UNCALIBRATED_GAIN: f32 = 3.0; // raw * gain, clamped, until calibrated

// Beat detection
pub const BEAT_PREV_KEEP: f32 = 0.4;
pub const BEAT_RAW_WEIGHT: f32 = 0.6;

// Excitation smoothing
pub const EXCITATION_ATTACK: f32 = 0.7;
pub const EXCITATION_RELEASE: f32 = 0.12;
pub const EXCITATION_IDLE_DECAY: f32 = 0.92; // per tick when audio/pointer inactive
pub const EXCITATION_HALT: f32 = 0.01;
pub const ENERGY_WEIGHTS: [f32; 3] = [0.5, 0.3, 0.2]; // bass, mid, treble
pub const ENERGY_SCALE: f32 = 0.8;

// Simulation (mirrored in shaders/simulation.wgsl)
pub const WORLD_EXTENT_X: f32 = 20.0;
pub const WORLD_EXTENT_Y: f32 = 12.0;
pub const DEPTH_SCALE: f32 = 20.0;
pub const JITTER_X: f32 = 2.0;
pub const SWAY_FREQ: f32 = 1.7;
pub const SWAY_PHASE: f32 = 6.0;
pub const SWAY_AMPLITUDE: f32 = 0.5;
pub const MIN_POINTER_DISTANCE: f32 = 0.01;
pub const INFLUENCE_EXPONENT: f32 = 1.5;
pub const ATTRACTION_OFFSET: f32 = 0.3;
pub const VORTEX_OFFSET: f32 = 0.15;
pub const VIBRATION_GATE: f32 = 0.01; // audio amplitude below this leaves particles still
pub const VIBRATION_SCALE: f32 = 0.5;

// Speed smoothing
pub const SPEED_LERP: f32 = 0.05;

// Depth of field: blur = (APERTURE_BASE - aperture) * APERTURE_BLUR_SCALE
pub const APERTURE_BASE: f32 = 5.6;
pub const APERTURE_BLUR_SCALE: f32 = 9.0;

// Initial texture seeding
pub const SEED_SPHERE_RADIUS: f32 = 1.28;

// Particle grid bounds (edge length in texels)
pub const MAX_GRID_SIZE: u32 = 2048;
