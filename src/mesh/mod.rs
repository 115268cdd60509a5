//! Vertex format, procedural primitives and GPU upload.

/// Procedural cube and tree geometry.
pub mod primitives;

use wgpu::util::DeviceExt;

pub use primitives::{cube, tree};

/// Per-vertex data shared by every demo mesh.
/// Must match the WGSL `VertexInput` struct layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit surface normal.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
    /// Base color (multiplied with the texture where one is bound).
    pub color: [f32; 3],
}

/// Vertex buffer layout for [`Vertex`] (locations 0..=3).
#[must_use]
pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 24,
                shader_location: 2,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 32,
                shader_location: 3,
            },
        ],
    }
}

/// CPU-side triangle list (non-indexed, three vertices per triangle).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertices in draw order.
    pub vertices: Vec<Vertex>,
}

impl MeshData {
    /// Number of vertices drawn per instance.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Number of triangles drawn per instance.
    #[must_use]
    pub fn triangle_count(&self) -> u32 {
        self.vertex_count() / 3
    }
}

/// A mesh uploaded to a vertex buffer.
pub struct GpuMesh {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl GpuMesh {
    /// Upload `data` into an immutable vertex buffer.
    #[must_use]
    pub fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        log::debug!(
            "{label}: uploaded {} vertices ({} triangles)",
            data.vertex_count(),
            data.triangle_count()
        );
        Self {
            buffer,
            vertex_count: data.vertex_count(),
        }
    }

    /// The vertex buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Vertices per instance.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
