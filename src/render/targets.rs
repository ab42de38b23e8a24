use super::helpers;

/// Ping-pong pair of particle position textures.
///
/// Each frame the simulation pass reads `read_*` and writes `write_view`; after
/// the frame `swap` makes the freshly written texture the next frame's input.
pub(crate) struct PositionTargets {
    textures: [wgpu::Texture; 2],
    views: [wgpu::TextureView; 2],
    read: usize,
    size: u32,
}

impl PositionTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: u32,
        seed: &[[f32; 4]],
    ) -> Self {
        let (tex_a, view_a) =
            helpers::create_position_texture(device, queue, "positions_a", size, seed);
        let (tex_b, view_b) =
            helpers::create_position_texture(device, queue, "positions_b", size, seed);
        Self {
            textures: [tex_a, tex_b],
            views: [view_a, view_b],
            read: 0,
            size,
        }
    }

    pub(crate) fn size(&self) -> u32 {
        self.size
    }

    /// Index of the texture read this frame (0 or 1).
    pub(crate) fn read_index(&self) -> usize {
        self.read
    }

    pub(crate) fn view(&self, index: usize) -> &wgpu::TextureView {
        &self.views[index]
    }

    pub(crate) fn write_view(&self) -> &wgpu::TextureView {
        &self.views[1 - self.read]
    }

    pub(crate) fn swap(&mut self) {
        self.read = 1 - self.read;
    }

    pub(crate) fn destroy(&self) {
        for t in &self.textures {
            t.destroy();
        }
    }
}
