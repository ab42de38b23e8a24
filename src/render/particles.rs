use super::helpers;
use super::targets::PositionTargets;
use crate::core::simulation::particle_uvs;
use crate::core::{Camera, ControlSignals, SizeMode};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ParticleUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    pointer: [f32; 4],
    vortex_color: [f32; 4],
    glow: [f32; 4],
    sizing: [f32; 4],
    lens: [f32; 4],
    frame: [f32; 4],
    grid: [f32; 4],
}

impl ParticleUniforms {
    pub(crate) fn new(
        s: &ControlSignals,
        camera: &Camera,
        resolution: [f32; 2],
        grid_size: u32,
    ) -> Self {
        let [r, g, b] = s.vortex_color;
        let mode = match s.size_mode {
            SizeMode::Fixed => 0.0,
            SizeMode::Random => 1.0,
        };
        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection_matrix().to_cols_array_2d(),
            pointer: [
                s.pointer_world.x,
                s.pointer_world.y,
                s.pointer_world.z,
                if s.pointer_active { 1.0 } else { 0.0 },
            ],
            vortex_color: [r, g, b, s.vortex_intensity],
            glow: [
                s.glow_intensity,
                s.glow_size,
                s.center_glow_radius,
                s.center_glow_intensity,
            ],
            sizing: [mode, s.size_fixed, s.size_min, s.size_max],
            lens: [s.focus, s.fov, s.blur, s.attraction_radius],
            frame: [resolution[0], resolution[1], s.time, s.shape.code()],
            grid: [grid_size as f32, 0.0, 0.0, 0.0],
        }
    }
}

pub(crate) struct ParticleResources {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) bgl: wgpu::BindGroupLayout,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) quad_vb: wgpu::Buffer,
    pub(crate) instance_vb: wgpu::Buffer,
    pub(crate) instance_count: u32,
    /// `bind_groups[i]` draws from position texture `i`.
    pub(crate) bind_groups: [wgpu::BindGroup; 2],
}

pub(crate) fn create_particle_resources(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    targets: &PositionTargets,
) -> ParticleResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("particles_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::core::PARTICLES_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("particles_bgl"),
        entries: &[
            helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
            helpers::position_texture_entry(1, wgpu::ShaderStages::VERTEX),
        ],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("particles_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    // Quad vertex buffer (two triangles)
    let quad_vertices: [f32; 12] = [
        -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
    ];
    let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("particles_quad_vb"),
        contents: bytemuck::cast_slice(&quad_vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let (instance_vb, instance_count) = create_instance_buffer(device, targets.size());
    let vertex_buffers = [
        // slot 0: quad corners
        wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 2) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        },
        // slot 1: particle uv
        wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 2) as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 1,
            }],
        },
    ];
    // Additive, no depth: particles only accumulate light
    let additive = wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    };
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("particles_pipeline"),
        layout: Some(&pl),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_particles"),
            buffers: &vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_particles"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(additive),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });
    let uniform_buffer =
        helpers::create_uniform_buffer::<ParticleUniforms>(device, "particles_uniforms");
    let bind_groups = particle_bind_groups(device, &bgl, &uniform_buffer, targets);
    ParticleResources {
        pipeline,
        bgl,
        uniform_buffer,
        quad_vb,
        instance_vb,
        instance_count,
        bind_groups,
    }
}

pub(crate) fn create_instance_buffer(device: &wgpu::Device, grid_size: u32) -> (wgpu::Buffer, u32) {
    let uvs = particle_uvs(grid_size);
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("particles_instance_vb"),
        contents: bytemuck::cast_slice(&uvs),
        usage: wgpu::BufferUsages::VERTEX,
    });
    (buffer, uvs.len() as u32)
}

pub(crate) fn particle_bind_groups(
    device: &wgpu::Device,
    bgl: &wgpu::BindGroupLayout,
    uniforms: &wgpu::Buffer,
    targets: &PositionTargets,
) -> [wgpu::BindGroup; 2] {
    [
        helpers::uniform_texture_bind_group(device, "particles_bg_a", bgl, uniforms, targets.view(0)),
        helpers::uniform_texture_bind_group(device, "particles_bg_b", bgl, uniforms, targets.view(1)),
    ]
}

/// Records pass 2 into the swapchain view, reading the texture pass 1 just wrote.
pub(crate) fn encode_particle_pass(
    encoder: &mut wgpu::CommandEncoder,
    particles: &ParticleResources,
    targets: &PositionTargets,
    view: &wgpu::TextureView,
    clear: wgpu::Color,
) {
    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("particles_pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    let written = 1 - targets.read_index();
    rpass.set_pipeline(&particles.pipeline);
    rpass.set_bind_group(0, &particles.bind_groups[written], &[]);
    rpass.set_vertex_buffer(0, particles.quad_vb.slice(..));
    rpass.set_vertex_buffer(1, particles.instance_vb.slice(..));
    rpass.draw(0..6, 0..particles.instance_count);
}
