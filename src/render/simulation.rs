use super::helpers;
use super::targets::PositionTargets;
use crate::core::ControlSignals;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SimUniforms {
    wind: [f32; 4],
    pointer: [f32; 4],
    vortex: [f32; 4],
    timing: [f32; 4],
    grid: [f32; 4],
}

impl SimUniforms {
    pub(crate) fn new(s: &ControlSignals, grid_size: u32) -> Self {
        Self {
            wind: [s.wind.x, s.wind.y, s.wind_speed, s.wind_oscillation],
            pointer: [
                s.pointer_world.x,
                s.pointer_world.y,
                s.pointer_world.z,
                if s.pointer_active { 1.0 } else { 0.0 },
            ],
            vortex: [
                s.attraction_radius,
                s.attraction_strength,
                s.vortex_strength,
                s.vortex_speed,
            ],
            timing: [s.time, s.fall_speed, s.audio_amplitude, s.hover_duration],
            grid: [grid_size as f32, 0.0, 0.0, 0.0],
        }
    }
}

pub(crate) struct SimResources {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) bgl: wgpu::BindGroupLayout,
    pub(crate) uniform_buffer: wgpu::Buffer,
    /// `bind_groups[i]` reads position texture `i`.
    pub(crate) bind_groups: [wgpu::BindGroup; 2],
}

pub(crate) fn create_sim_resources(
    device: &wgpu::Device,
    targets: &PositionTargets,
) -> SimResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("simulation_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::core::SIMULATION_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("simulation_bgl"),
        entries: &[
            helpers::uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
            helpers::position_texture_entry(1, wgpu::ShaderStages::FRAGMENT),
        ],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("simulation_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("simulation_pipeline"),
        layout: Some(&pl),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_fullscreen"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_simulate"),
            targets: &[Some(wgpu::ColorTargetState {
                format: helpers::POSITION_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });
    let uniform_buffer = helpers::create_uniform_buffer::<SimUniforms>(device, "simulation_uniforms");
    let bind_groups = sim_bind_groups(device, &bgl, &uniform_buffer, targets);
    SimResources {
        pipeline,
        bgl,
        uniform_buffer,
        bind_groups,
    }
}

pub(crate) fn sim_bind_groups(
    device: &wgpu::Device,
    bgl: &wgpu::BindGroupLayout,
    uniforms: &wgpu::Buffer,
    targets: &PositionTargets,
) -> [wgpu::BindGroup; 2] {
    [
        helpers::uniform_texture_bind_group(device, "simulation_bg_a", bgl, uniforms, targets.view(0)),
        helpers::uniform_texture_bind_group(device, "simulation_bg_b", bgl, uniforms, targets.view(1)),
    ]
}

/// Records pass 1: every texel of the write target gets this frame's position.
pub(crate) fn encode_sim_pass(
    encoder: &mut wgpu::CommandEncoder,
    sim: &SimResources,
    targets: &PositionTargets,
) {
    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("simulation_pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: targets.write_view(),
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    rpass.set_pipeline(&sim.pipeline);
    rpass.set_bind_group(0, &sim.bind_groups[targets.read_index()], &[]);
    rpass.draw(0..3, 0..1);
}
