use super::constants::{APERTURE_BASE, APERTURE_BLUR_SCALE, MAX_GRID_SIZE};
use glam::Vec2;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SizeMode {
    #[default]
    Fixed,
    Random,
}

impl From<String> for SizeMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "fixed" => SizeMode::Fixed,
            "random" => SizeMode::Random,
            other => {
                log::warn!("[params] unknown sizeMode {:?}, using fixed", other);
                SizeMode::Fixed
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Shape {
    #[default]
    Circle,
    Square,
    Triangle,
    Line,
    /// Per-particle pick with fixed proportions.
    Mixed,
}

impl Shape {
    /// Selector understood by `particles.wgsl`.
    pub fn code(self) -> f32 {
        match self {
            Shape::Circle => 0.0,
            Shape::Square => 1.0,
            Shape::Triangle => 2.0,
            Shape::Line => 3.0,
            Shape::Mixed => 4.0,
        }
    }
}

impl From<String> for Shape {
    fn from(s: String) -> Self {
        match s.as_str() {
            "circle" => Shape::Circle,
            "square" => Shape::Square,
            "triangle" => Shape::Triangle,
            "line" => Shape::Line,
            "mixed" => Shape::Mixed,
            other => {
                log::warn!("[params] unknown shape {:?}, using circle", other);
                Shape::Circle
            }
        }
    }
}

/// Linear RGB in [0, 1], deserialized from `#rgb` / `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "String")]
pub struct Rgb(pub [f32; 3]);

pub const DEFAULT_VORTEX_COLOR: Rgb = Rgb([1.0, 0.4, 0.0]); // #ff6600

impl From<String> for Rgb {
    fn from(s: String) -> Self {
        parse_hex_color(&s).map(Rgb).unwrap_or_else(|| {
            log::warn!("[params] unparsable colour {:?}, using default", s);
            DEFAULT_VORTEX_COLOR
        })
    }
}

pub fn parse_hex_color(s: &str) -> Option<[f32; 3]> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |h: &str| u8::from_str_radix(h, 16).ok().map(|v| v as f32 / 255.0);
    match hex.len() {
        6 => Some([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?]),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1].repeat(2));
            Some([short(0)?, short(1)?, short(2)?])
        }
        _ => None,
    }
}

/// Knobs the host page may set. Any subset may be given; the rest use defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleParams {
    pub size: u32,
    pub focus: f32,
    pub aperture: f32,
    pub fov: f32,
    pub speed: f32,
    pub wind_x: f32,
    pub wind_y: f32,
    pub wind_speed: f32,
    pub fall_speed: f32,
    pub wind_osc: f32,
    pub size_mode: SizeMode,
    pub size_fixed: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub shape: Shape,
    pub attraction_radius: f32,
    pub attraction_strength: f32,
    pub vortex_strength: f32,
    pub vortex_speed: f32,
    pub vortex_color: Rgb,
    pub vortex_intensity: f32,
    pub glow_intensity: f32,
    pub glow_size: f32,
    pub center_glow_radius: f32,
    pub center_glow_intensity: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            size: 512,
            focus: 5.1,
            aperture: 1.8,
            fov: 50.0,
            speed: 1.0,
            wind_x: -1.0,
            wind_y: 0.0,
            wind_speed: 1.0,
            fall_speed: 0.4,
            wind_osc: 1.0,
            size_mode: SizeMode::Fixed,
            size_fixed: 3.0,
            size_min: 1.0,
            size_max: 5.0,
            shape: Shape::Circle,
            attraction_radius: 1.0,
            attraction_strength: 0.8,
            vortex_strength: 1.5,
            vortex_speed: 1.0,
            vortex_color: DEFAULT_VORTEX_COLOR,
            vortex_intensity: 3.0,
            glow_intensity: 2.0,
            glow_size: 1.5,
            center_glow_radius: 3.0,
            center_glow_intensity: 2.0,
        }
    }
}

impl ParticleParams {
    /// Tuning used by the landing page when the host gives no configuration.
    pub fn landing() -> Self {
        Self {
            focus: 5.41,
            speed: 0.01,
            aperture: 1.5,
            fov: 20.0,
            wind_speed: 0.63,
            fall_speed: 0.97,
            size_mode: SizeMode::Random,
            size_fixed: 2.6,
            size_min: 1.9,
            size_max: 1.0,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Depth-of-field blur derived from the aperture.
    pub fn blur(&self) -> f32 {
        (APERTURE_BASE - self.aperture) * APERTURE_BLUR_SCALE
    }

    pub fn wind_dir(&self) -> Vec2 {
        Vec2::new(self.wind_x, self.wind_y)
    }

    /// Texture edge length actually allocated: a power of two in [1, MAX_GRID_SIZE].
    pub fn grid_size(&self) -> u32 {
        self.size.clamp(1, MAX_GRID_SIZE).next_power_of_two().min(MAX_GRID_SIZE)
    }
}
