pub mod analysis;
pub mod beat;
pub mod camera;
pub mod constants;
pub mod controls;
pub mod params;
pub mod pointer;
pub mod signals;
pub mod simulation;
pub mod sprite;
pub mod transport;

pub use analysis::*;
pub use beat::*;
pub use camera::*;
pub use controls::*;
pub use params::*;
pub use pointer::*;
pub use signals::*;
pub use transport::*;

// Shaders bundled as string constants
pub static SIMULATION_WGSL: &str = include_str!("../../shaders/simulation.wgsl");
pub static PARTICLES_WGSL: &str = include_str!("../../shaders/particles.wgsl");
