//! Cloud of textured cubes whose transforms are produced on the GPU.
//!
//! A fixed pool of seed points is uploaded once. Every frame a compute pass
//! turns the first `count` seeds into model matrices in a storage buffer,
//! which the instanced draw then reads by `instance_index`. The output
//! buffer is reallocated, and both bind groups rebuilt, whenever the count
//! changes.

use std::path::Path;

use wgpu::util::DeviceExt;

use super::{
    lighting_buffer, shader_module, surface_target, FrameInputs,
    InstancedScene,
};
use crate::camera::controller::CameraController;
use crate::gpu::pipeline_helpers::{self, PipelinePair};
use crate::gpu::render_context::{storage_item_limit, RenderContext};
use crate::gpu::texture::{Rgba8Image, SampledTexture};
use crate::instancing::{demo_rng, seeds, InstanceCount};
use crate::mesh::{self, GpuMesh};
use crate::options::{CubeOptions, LightingOptions};

/// Threads per compute workgroup; must match `cube_transform.wgsl`.
pub const WORKGROUP_SIZE: u32 = 64;

/// Bytes of one output model matrix.
const MATRIX_SIZE: u64 = size_of::<[[f32; 4]; 4]>() as u64;

/// Workgroups needed to cover `count` instances.
#[must_use]
pub fn workgroup_count(count: u32) -> u32 {
    count.div_ceil(WORKGROUP_SIZE)
}

/// Seed pool size for a requested `max_instances`: at least one, and no
/// more than one model-matrix binding or one dispatch row can cover.
#[must_use]
pub fn pool_size(requested: u32, limits: &wgpu::Limits) -> u32 {
    let dispatchable = limits
        .max_compute_workgroups_per_dimension
        .saturating_mul(WORKGROUP_SIZE);
    requested
        .max(1)
        .min(storage_item_limit(limits, MATRIX_SIZE))
        .min(dispatchable)
}

/// Uniform block for the transform pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformParams {
    /// Spin speed, bob height, bob frequency, scale.
    pub data: [f32; 4],
    /// Seconds since start.
    pub time: f32,
    /// Instances to write.
    pub count: u32,
    /// Half edge length of one cube.
    pub cube_scale: f32,
    _pad: f32,
}

impl TransformParams {
    /// Parameters for one frame.
    #[must_use]
    pub fn new(data: [f32; 4], time: f32, count: u32, cube_scale: f32) -> Self {
        Self {
            data,
            time,
            count,
            cube_scale,
            _pad: 0.0,
        }
    }
}

/// GPU-animated cube renderer.
pub struct CubeScene {
    mesh: GpuMesh,
    count: InstanceCount,
    data: [f32; 4],
    cube_scale: f32,

    seeds: wgpu::Buffer,
    params: wgpu::Buffer,
    lighting: wgpu::Buffer,
    texture: SampledTexture,
    models: wgpu::Buffer,
    models_len: usize,

    compute_layout: wgpu::BindGroupLayout,
    compute_bind_group: wgpu::BindGroup,
    compute_pipeline: wgpu::ComputePipeline,

    draw_layout: wgpu::BindGroupLayout,
    draw_bind_group: wgpu::BindGroup,
    pipelines: PipelinePair,
}

impl CubeScene {
    /// Generate the seed pool, load the texture and build both pipelines.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        camera: &CameraController,
        options: &CubeOptions,
        lighting: &LightingOptions,
    ) -> Self {
        let device = &context.device;
        let pool = pool_size(options.max_instances, &device.limits());
        if pool < options.max_instances {
            log::warn!(
                "cubes: max_instances {} exceeds device limits, using {pool}",
                options.max_instances
            );
        }
        let count =
            InstanceCount::new(options.instances, options.limits.capped(pool));

        let mut rng = demo_rng(options.seed);
        let points = seeds::supertorus_points(pool as usize, &mut rng);
        let seeds = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Seeds"),
            contents: bytemuck::cast_slice(&points),
            usage: wgpu::BufferUsages::STORAGE,
        });
        log::info!("cubes: {pool} seed points");

        let params = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Transform Params"),
            contents: bytemuck::cast_slice(&[TransformParams::new(
                options.data,
                0.0,
                count.get(),
                options.cube_scale,
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lighting = lighting_buffer(device, lighting);

        let image = Rgba8Image::load_or_checkerboard(Path::new(
            &options.texture_path,
        ));
        let texture = SampledTexture::from_image(
            device,
            &context.queue,
            "Crate Texture",
            &image,
        );
        let mesh = GpuMesh::upload(device, "Cube Mesh", &mesh::cube(1.0));
        let models = Self::create_models_buffer(device, count.get());

        // Transform pass
        let compute_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Cube Transform Bind Group Layout"),
                entries: &[
                    pipeline_helpers::storage_buffer(
                        0,
                        wgpu::ShaderStages::COMPUTE,
                        true,
                    ),
                    pipeline_helpers::uniform_buffer(
                        1,
                        wgpu::ShaderStages::COMPUTE,
                    ),
                    pipeline_helpers::storage_buffer(
                        2,
                        wgpu::ShaderStages::COMPUTE,
                        false,
                    ),
                ],
            });
        let compute_bind_group = Self::create_compute_bind_group(
            device,
            &compute_layout,
            &seeds,
            &params,
            &models,
        );
        let compute_shader = shader_module(
            device,
            "Cube Transform Shader",
            include_str!("../../assets/shaders/cube_transform.wgsl"),
        );
        let compute_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Cube Transform Pipeline Layout"),
                bind_group_layouts: &[&compute_layout, camera.layout()],
                immediate_size: 0,
            });
        let compute_pipeline = device.create_compute_pipeline(
            &wgpu::ComputePipelineDescriptor {
                label: Some("Cube Transform Pipeline"),
                layout: Some(&compute_pipeline_layout),
                module: &compute_shader,
                entry_point: Some("cs_main"),
                compilation_options: Default::default(),
                cache: None,
            },
        );

        // Draw pass
        let draw_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Cube Draw Bind Group Layout"),
                entries: &[
                    pipeline_helpers::storage_buffer(
                        0,
                        wgpu::ShaderStages::VERTEX,
                        true,
                    ),
                    pipeline_helpers::texture_2d(1),
                    pipeline_helpers::filtering_sampler(2),
                    pipeline_helpers::uniform_buffer(
                        3,
                        wgpu::ShaderStages::FRAGMENT,
                    ),
                ],
            });
        let draw_bind_group = Self::create_draw_bind_group(
            device,
            &draw_layout,
            &models,
            &texture,
            &lighting,
        );
        let shader = shader_module(
            device,
            "Cube Shader",
            include_str!("../../assets/shaders/cube.wgsl"),
        );
        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Cube Pipeline Layout"),
                bind_group_layouts: &[&draw_layout, camera.layout()],
                immediate_size: 0,
            });
        let targets = surface_target(context.format());
        let pipelines =
            PipelinePair::new(context.supports_wireframe(), |wireframe| {
                device.create_render_pipeline(
                    &wgpu::RenderPipelineDescriptor {
                        label: Some("Cube Pipeline"),
                        layout: Some(&pipeline_layout),
                        vertex: wgpu::VertexState {
                            module: &shader,
                            entry_point: Some("vs_main"),
                            buffers: &[mesh::vertex_buffer_layout()],
                            compilation_options: Default::default(),
                        },
                        fragment: Some(wgpu::FragmentState {
                            module: &shader,
                            entry_point: Some("fs_main"),
                            targets: &targets,
                            compilation_options: Default::default(),
                        }),
                        primitive: pipeline_helpers::triangle_state(wireframe),
                        depth_stencil: Some(
                            pipeline_helpers::depth_stencil_state(),
                        ),
                        multisample: wgpu::MultisampleState::default(),
                        multiview_mask: None,
                        cache: None,
                    },
                )
            });

        Self {
            mesh,
            count,
            data: options.data,
            cube_scale: options.cube_scale,
            seeds,
            params,
            lighting,
            texture,
            models,
            models_len: count.get() as usize,
            compute_layout,
            compute_bind_group,
            compute_pipeline,
            draw_layout,
            draw_bind_group,
            pipelines,
        }
    }

    fn create_models_buffer(device: &wgpu::Device, count: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cube Model Matrices"),
            size: u64::from(count.max(1)) * MATRIX_SIZE,
            usage: wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        })
    }

    fn create_compute_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        seeds: &wgpu::Buffer,
        params: &wgpu::Buffer,
        models: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cube Transform Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: seeds.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: models.as_entire_binding(),
                },
            ],
        })
    }

    fn create_draw_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        models: &wgpu::Buffer,
        texture: &SampledTexture,
        lighting: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cube Draw Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: models.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(
                        &texture.view,
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: lighting.as_entire_binding(),
                },
            ],
        })
    }

    fn rebuild_models(&mut self, device: &wgpu::Device, len: usize) {
        self.models = Self::create_models_buffer(device, self.count.get());
        self.models_len = len;
        self.compute_bind_group = Self::create_compute_bind_group(
            device,
            &self.compute_layout,
            &self.seeds,
            &self.params,
            &self.models,
        );
        self.draw_bind_group = Self::create_draw_bind_group(
            device,
            &self.draw_layout,
            &self.models,
            &self.texture,
            &self.lighting,
        );
        log::info!("cubes: {} instances", self.count.get());
    }
}

impl InstancedScene for CubeScene {
    fn name(&self) -> &'static str {
        "Cubes"
    }

    fn count(&self) -> &InstanceCount {
        &self.count
    }

    fn count_mut(&mut self) -> &mut InstanceCount {
        &mut self.count
    }

    fn vertices_per_instance(&self) -> u32 {
        self.mesh.vertex_count()
    }

    fn prepare(&mut self, frame: &FrameInputs<'_>) {
        if let Some(len) = self.count.take_resize(self.models_len) {
            self.rebuild_models(&frame.context.device, len);
        }
        let params = TransformParams::new(
            self.data,
            frame.time,
            self.count.get(),
            self.cube_scale,
        );
        frame.context.queue.write_buffer(
            &self.params,
            0,
            bytemuck::cast_slice(&[params]),
        );
    }

    fn encode_compute(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        camera: &wgpu::BindGroup,
    ) {
        let count = self.count.get();
        if count == 0 {
            return;
        }
        let mut pass =
            encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Cube Transform Pass"),
                timestamp_writes: None,
            });
        pass.set_pipeline(&self.compute_pipeline);
        pass.set_bind_group(0, &self.compute_bind_group, &[]);
        pass.set_bind_group(1, camera, &[]);
        pass.dispatch_workgroups(workgroup_count(count), 1, 1);
    }

    fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        camera: &'a wgpu::BindGroup,
        wireframe: bool,
    ) {
        let count = self.count.get();
        if count == 0 {
            return;
        }
        pass.set_pipeline(self.pipelines.select(wireframe));
        pass.set_bind_group(0, &self.draw_bind_group, &[]);
        pass.set_bind_group(1, camera, &[]);
        pass.set_vertex_buffer(0, self.mesh.buffer().slice(..));
        pass.draw(0..self.mesh.vertex_count(), 0..count);
    }

    fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: 0.8,
            g: 0.8,
            b: 0.8,
            a: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instancing::CountLimits;

    #[test]
    fn workgroups_cover_every_instance() {
        assert_eq!(workgroup_count(0), 0);
        assert_eq!(workgroup_count(1), 1);
        assert_eq!(workgroup_count(64), 1);
        assert_eq!(workgroup_count(65), 2);
        assert_eq!(workgroup_count(1_000_000), 15_625);
    }

    #[test]
    fn params_match_wgsl_layout() {
        assert_eq!(size_of::<TransformParams>(), 32);
        let p = TransformParams::new([0.3, 0.6, 0.5, 1.2], 2.0, 1000, 0.2);
        let words: &[u32] = bytemuck::cast_slice(std::slice::from_ref(&p));
        assert_eq!(words[5], 1000);
    }

    #[test]
    fn pool_fits_device_limits() {
        let limits = wgpu::Limits::default();
        assert_eq!(pool_size(1_000_000, &limits), 1_000_000);
        assert_eq!(pool_size(0, &limits), 1);
        // 128 MiB of matrices.
        assert_eq!(pool_size(4_000_000, &limits), 2_097_152);

        let narrow = wgpu::Limits {
            max_compute_workgroups_per_dimension: 100,
            ..wgpu::Limits::default()
        };
        assert_eq!(pool_size(1_000_000, &narrow), 6_400);
    }

    #[test]
    fn count_ceiling_follows_pool() {
        let pool = pool_size(4_000_000, &wgpu::Limits::default());
        let limits = CountLimits {
            ceiling: 4_000_000,
            ..CountLimits::default()
        }
        .capped(pool);
        let mut count = InstanceCount::new(4_000_000, limits);
        assert_eq!(count.increase(), pool);
        assert!(u64::from(count.get()) * MATRIX_SIZE <= 128 << 20);
    }
}
