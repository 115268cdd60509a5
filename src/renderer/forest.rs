//! Forest of trees: transforms generated on the CPU, read by the vertex
//! shader from a storage buffer indexed by `instance_index`.

use rand::rngs::StdRng;

use super::{
    lighting_buffer, shader_module, surface_target, FrameInputs,
    InstancedScene,
};
use crate::camera::controller::CameraController;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::pipeline_helpers::{self, PipelinePair};
use crate::gpu::render_context::RenderContext;
use crate::instancing::{
    demo_rng, GeneratorError, InstanceCount, InstanceRaw, InstanceTable,
};
use crate::mesh::{self, GpuMesh};
use crate::options::{ForestOptions, LightingOptions};

/// Instanced tree renderer.
pub struct ForestScene {
    mesh: GpuMesh,
    table: InstanceTable,
    count: InstanceCount,
    rng: StdRng,

    instances: TypedBuffer<InstanceRaw>,
    lighting: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    pipelines: PipelinePair,
}

impl ForestScene {
    /// Build the tree mesh, the instance table and the pipelines.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] if the extent or scale range in `options`
    /// is invalid.
    pub fn new(
        context: &RenderContext,
        camera: &CameraController,
        options: &ForestOptions,
        lighting: &LightingOptions,
    ) -> Result<Self, GeneratorError> {
        let device = &context.device;
        let generator = options.generator()?;
        let max_trees =
            context.max_storage_items(size_of::<InstanceRaw>() as u64);
        if options.limits.ceiling > max_trees {
            log::warn!(
                "forest: ceiling {} exceeds device limits, using {max_trees}",
                options.limits.ceiling
            );
        }
        let count = InstanceCount::new(
            options.instances,
            options.limits.capped(max_trees),
        );
        let mut rng = demo_rng(options.seed);
        let table = InstanceTable::new(generator, 0, &mut rng);

        let mesh = GpuMesh::upload(
            device,
            "Tree Mesh",
            &mesh::tree(options.tree_segments),
        );

        let instances = TypedBuffer::with_capacity(
            device,
            "Tree Instances",
            count.get() as usize,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        );
        let lighting = lighting_buffer(device, lighting);

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Forest Bind Group Layout"),
                entries: &[
                    pipeline_helpers::storage_buffer(
                        0,
                        wgpu::ShaderStages::VERTEX,
                        true,
                    ),
                    pipeline_helpers::uniform_buffer(
                        1,
                        wgpu::ShaderStages::FRAGMENT,
                    ),
                ],
            });
        let bind_group =
            Self::create_bind_group(device, &layout, &instances, &lighting);

        let shader = shader_module(
            device,
            "Forest Shader",
            include_str!("../../assets/shaders/forest.wgsl"),
        );
        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Forest Pipeline Layout"),
                bind_group_layouts: &[&layout, camera.layout()],
                immediate_size: 0,
            });
        let targets = surface_target(context.format());
        let pipelines =
            PipelinePair::new(context.supports_wireframe(), |wireframe| {
                device.create_render_pipeline(
                    &wgpu::RenderPipelineDescriptor {
                        label: Some("Forest Pipeline"),
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

        Ok(Self {
            mesh,
            table,
            count,
            rng,
            instances,
            lighting,
            layout,
            bind_group,
            pipelines,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        instances: &TypedBuffer<InstanceRaw>,
        lighting: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Forest Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: instances.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting.as_entire_binding(),
                },
            ],
        })
    }

}

impl InstancedScene for ForestScene {
    fn name(&self) -> &'static str {
        "Forest"
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
        let Some(trees) = self.table.sync_to(&mut self.count, &mut self.rng)
        else {
            return;
        };
        let context = frame.context;
        if self.instances.write(
            &context.device,
            &context.queue,
            &self.table.to_raw(),
        ) {
            self.bind_group = Self::create_bind_group(
                &context.device,
                &self.layout,
                &self.instances,
                &self.lighting,
            );
        }
        log::info!("forest: {trees} trees");
    }

    fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        camera: &'a wgpu::BindGroup,
        wireframe: bool,
    ) {
        if self.instances.is_empty() {
            return;
        }
        pass.set_pipeline(self.pipelines.select(wireframe));
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_bind_group(1, camera, &[]);
        pass.set_vertex_buffer(0, self.mesh.buffer().slice(..));
        pass.draw(
            0..self.mesh.vertex_count(),
            0..self.instances.count() as u32,
        );
    }
}
