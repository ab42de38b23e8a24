use super::analysis::AudioEnvelope;
use super::constants::SPEED_LERP;
use super::params::{ParticleParams, Shape, SizeMode};
use glam::{Vec2, Vec3};
use smallvec::SmallVec;

/// Simulation time advanced at a speed that eases toward the requested one,
/// so speed changes never make particles jump.
#[derive(Clone, Copy, Debug)]
pub struct SimClock {
    time: f32,
    current_speed: f32,
}

impl SimClock {
    pub fn new(initial_speed: f32) -> Self {
        Self {
            time: 0.0,
            current_speed: initial_speed,
        }
    }

    pub fn advance(&mut self, dt_sec: f32, target_speed: f32) -> f32 {
        self.current_speed += (target_speed - self.current_speed) * SPEED_LERP;
        self.time += dt_sec.max(0.0) * self.current_speed;
        self.time
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }
}

/// Everything both GPU passes read for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSignals {
    pub time: f32,
    pub delta_time: f32,
    pub focus: f32,
    pub fov: f32,
    pub blur: f32,
    pub wind: Vec2,
    pub wind_speed: f32,
    pub fall_speed: f32,
    pub wind_oscillation: f32,
    pub pointer_world: Vec3,
    pub pointer_active: bool,
    pub attraction_radius: f32,
    pub attraction_strength: f32,
    pub vortex_strength: f32,
    pub vortex_speed: f32,
    pub vortex_color: [f32; 3],
    pub vortex_intensity: f32,
    pub glow_intensity: f32,
    pub glow_size: f32,
    pub center_glow_radius: f32,
    pub center_glow_intensity: f32,
    pub size_mode: SizeMode,
    pub size_fixed: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub shape: Shape,
    pub audio_amplitude: f32,
    pub hover_duration: f32,
}

impl ControlSignals {
    pub fn compose(
        params: &ParticleParams,
        time: f32,
        delta_time: f32,
        pointer_world: Vec3,
        pointer_active: bool,
        audio_amplitude: f32,
        hover_duration: f32,
    ) -> Self {
        Self {
            time,
            delta_time,
            focus: params.focus,
            fov: params.fov,
            blur: params.blur(),
            wind: params.wind_dir(),
            wind_speed: params.wind_speed,
            fall_speed: params.fall_speed,
            wind_oscillation: params.wind_osc,
            pointer_world,
            pointer_active,
            attraction_radius: params.attraction_radius,
            attraction_strength: params.attraction_strength,
            vortex_strength: params.vortex_strength,
            vortex_speed: params.vortex_speed,
            vortex_color: params.vortex_color.0,
            vortex_intensity: params.vortex_intensity,
            glow_intensity: params.glow_intensity,
            glow_size: params.glow_size,
            center_glow_radius: params.center_glow_radius,
            center_glow_intensity: params.center_glow_intensity,
            size_mode: params.size_mode,
            size_fixed: params.size_fixed,
            size_min: params.size_min,
            size_max: params.size_max,
            shape: params.shape,
            audio_amplitude,
            hover_duration,
        }
    }
}

impl Default for ControlSignals {
    fn default() -> Self {
        Self::compose(&ParticleParams::default(), 0.0, 0.0, Vec3::ZERO, false, 0.0, 0.0)
    }
}

/// Payload of the audio-data channel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioDataEvent {
    pub amplitude: f32,
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub hover_duration: f32,
}

impl AudioDataEvent {
    pub fn new(env: &AudioEnvelope, hover_duration: f32) -> Self {
        Self {
            amplitude: env.amplitude,
            bass: env.bass,
            mid: env.mid,
            treble: env.treble,
            hover_duration,
        }
    }
}

type GlitchHandler = Box<dyn FnMut(f32)>;
type AudioDataHandler = Box<dyn FnMut(&AudioDataEvent)>;

/// Callback registry for effects that live outside the GPU pipeline.
#[derive(Default)]
pub struct SignalBus {
    glitch: SmallVec<[GlitchHandler; 2]>,
    audio_data: SmallVec<[AudioDataHandler; 2]>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_glitch(&mut self, handler: impl FnMut(f32) + 'static) {
        self.glitch.push(Box::new(handler));
    }

    pub fn subscribe_audio_data(&mut self, handler: impl FnMut(&AudioDataEvent) + 'static) {
        self.audio_data.push(Box::new(handler));
    }

    pub fn publish_glitch(&mut self, intensity: f32) {
        for h in self.glitch.iter_mut() {
            h(intensity);
        }
    }

    pub fn publish_audio_data(&mut self, event: &AudioDataEvent) {
        for h in self.audio_data.iter_mut() {
            h(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.glitch.len() + self.audio_data.len()
    }
}
