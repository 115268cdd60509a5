use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

use super::core::{Camera, CameraUniform};
use super::model_transform::ModelTransform;
use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::options::{CameraOptions, InputOptions, ViewOptions};

/// Owns the camera, the mouse-driven scene transform and the camera uniform
/// bind group (group 1 in every scene shader).
pub struct CameraController {
    /// Fixed look-at camera.
    pub camera: Camera,
    /// Scene transform driven by mouse drags.
    pub model: ModelTransform,
    uniform: CameraUniform,
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,

    rotate_speed: f32,
    pan_speed: f32,
    zoom_step: f32,
}

impl CameraController {
    /// Camera looking from `view.eye` to `view.target`, aspect taken from
    /// the surface.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        options: &CameraOptions,
        view: &ViewOptions,
        input: &InputOptions,
    ) -> Self {
        let camera = Camera {
            eye: Vec3::from_array(view.eye),
            target: Vec3::from_array(view.target),
            up: Vec3::Y,
            aspect: context.width() as f32 / context.height().max(1) as f32,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };
        let model = ModelTransform::default();

        let mut uniform = CameraUniform::new();
        uniform.update(&camera, model.matrix());

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[pipeline_helpers::uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT
                        | wgpu::ShaderStages::COMPUTE,
                )],
            },
        );

        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Camera Bind Group"),
                });

        Self {
            camera,
            model,
            uniform,
            buffer,
            layout,
            bind_group,
            rotate_speed: input.rotate_speed,
            pan_speed: input.pan_speed,
            zoom_step: input.zoom_step,
        }
    }

    /// Layout shared by every scene pipeline at group 1.
    #[must_use]
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// The camera bind group.
    #[must_use]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Push the current camera and scene transform to the GPU.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update(&self.camera, self.model.matrix());
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    /// Match the projection to a new surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Spin the scene by a mouse drag in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.model.rotate(delta, self.rotate_speed);
    }

    /// Translate the scene by a mouse drag in pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.model.pan(delta, self.pan_speed);
    }

    /// Step the scene toward or away from the camera.
    pub fn zoom(&mut self, delta: f32) {
        self.model.zoom(delta, self.zoom_step);
    }

    /// Drop all mouse rotation and translation.
    pub fn reset(&mut self) {
        self.model = ModelTransform::default();
    }
}
