use crate::core::simulation::seed_positions;
use crate::core::{Camera, ControlSignals};
use rand::Rng;
use web_sys as web;

mod helpers;
mod particles;
mod simulation;
mod targets;

use particles::{ParticleResources, ParticleUniforms};
use simulation::{SimResources, SimUniforms};
use targets::PositionTargets;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: PositionTargets,
    sim: SimResources,
    particles: ParticleResources,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new<R: Rng + ?Sized>(
        canvas: &'a web::HtmlCanvasElement,
        grid_size: u32,
        rng: &mut R,
    ) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let seed = seed_positions((grid_size * grid_size) as usize, rng);
        let targets = PositionTargets::new(&device, &queue, grid_size, &seed);
        let sim = simulation::create_sim_resources(&device, &targets);
        let particles = particles::create_particle_resources(&device, format, &targets);
        log::info!(
            "[gpu] ready: {}x{} surface, {} particles",
            width,
            height,
            particles.instance_count
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            sim,
            particles,
            width,
            height,
            clear_color: wgpu::Color::BLACK,
        })
    }

    /// Reallocates everything sized by the particle count.
    pub fn set_grid_size<R: Rng + ?Sized>(&mut self, grid_size: u32, rng: &mut R) {
        if grid_size == self.targets.size() {
            return;
        }
        let seed = seed_positions((grid_size * grid_size) as usize, rng);
        let targets = PositionTargets::new(&self.device, &self.queue, grid_size, &seed);
        self.sim.bind_groups = simulation::sim_bind_groups(
            &self.device,
            &self.sim.bgl,
            &self.sim.uniform_buffer,
            &targets,
        );
        self.particles.bind_groups = particles::particle_bind_groups(
            &self.device,
            &self.particles.bgl,
            &self.particles.uniform_buffer,
            &targets,
        );
        let (instance_vb, instance_count) =
            particles::create_instance_buffer(&self.device, grid_size);
        self.particles.instance_vb = instance_vb;
        self.particles.instance_count = instance_count;
        self.targets.destroy();
        self.targets = targets;
        log::info!("[gpu] particle grid reallocated: {} particles", instance_count);
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Runs the simulation pass then the particle pass, and presents.
    pub fn render(
        &mut self,
        signals: &ControlSignals,
        camera: &Camera,
    ) -> Result<(), wgpu::SurfaceError> {
        let grid = self.targets.size();
        let sim_u = SimUniforms::new(signals, grid);
        let particle_u = ParticleUniforms::new(
            signals,
            camera,
            [self.width as f32, self.height as f32],
            grid,
        );
        self.queue
            .write_buffer(&self.sim.uniform_buffer, 0, bytemuck::bytes_of(&sim_u));
        self.queue.write_buffer(
            &self.particles.uniform_buffer,
            0,
            bytemuck::bytes_of(&particle_u),
        );

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        simulation::encode_sim_pass(&mut encoder, &self.sim, &self.targets);
        particles::encode_particle_pass(
            &mut encoder,
            &self.particles,
            &self.targets,
            &view,
            self.clear_color,
        );
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        self.targets.swap();
        Ok(())
    }
}
