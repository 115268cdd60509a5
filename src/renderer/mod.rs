//! Instanced scenes and the HUD text overlay.
//!
//! Each demo is one [`InstancedScene`]: a single mesh drawn once per
//! instance with one instanced draw call. The engine drives scenes only
//! through this trait.

pub mod cubes;
pub mod forest;
pub mod text_overlay;

use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::instancing::InstanceCount;
use crate::options::{LightingOptions, LightingUniform};

pub use cubes::CubeScene;
pub use forest::ForestScene;
pub use text_overlay::{overlay_lines, SceneStats, TextOverlay};

/// Per-frame inputs shared by every scene.
pub struct FrameInputs<'a> {
    /// Device, queue and surface.
    pub context: &'a RenderContext,
    /// Seconds since the demo started.
    pub time: f32,
}

/// A mesh drawn `instance_count` times with per-instance transforms.
pub trait InstancedScene {
    /// Short human-readable name, shown in the window title.
    fn name(&self) -> &'static str;

    /// The live instance count and its rebuild flag.
    fn count(&self) -> &InstanceCount;

    /// Mutable access for the `=`/`-` keys.
    fn count_mut(&mut self) -> &mut InstanceCount;

    /// Vertices in the instanced mesh.
    fn vertices_per_instance(&self) -> u32;

    /// Rebuild instance buffers if the count changed and write per-frame
    /// uniforms.
    fn prepare(&mut self, frame: &FrameInputs<'_>);

    /// Record GPU work that must finish before the draw.
    fn encode_compute(
        &self,
        _encoder: &mut wgpu::CommandEncoder,
        _camera: &wgpu::BindGroup,
    ) {
    }

    /// Record the instanced draw into an open render pass.
    fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        camera: &'a wgpu::BindGroup,
        wireframe: bool,
    );

    /// Background color.
    fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: 0.4,
            g: 0.4,
            b: 0.4,
            a: 1.0,
        }
    }

    /// Numbers for the HUD.
    fn stats(&self) -> SceneStats {
        SceneStats::new(self.count().get(), self.vertices_per_instance())
    }
}

/// Uniform buffer holding the Phong light and material.
pub(crate) fn lighting_buffer(
    device: &wgpu::Device,
    options: &LightingOptions,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Lighting Buffer"),
        contents: bytemuck::cast_slice(&[LightingUniform::from(options)]),
        usage: wgpu::BufferUsages::UNIFORM,
    })
}

/// Compile a WGSL source string.
pub(crate) fn shader_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

/// Opaque color target for the surface format.
pub(crate) fn surface_target(
    format: wgpu::TextureFormat,
) -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })]
}
