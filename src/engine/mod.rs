//! The demo engine: owns the GPU context, camera, scene and HUD, executes
//! commands and renders frames.

mod command;

use std::fmt;
use std::str::FromStr;

pub use command::DemoCommand;
use serde::{Deserialize, Serialize};

use crate::camera::controller::CameraController;
use crate::error::DemoError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DepthTexture;
use crate::input::{InputEvent, InputProcessor};
use crate::instancing::InstanceCount;
use crate::options::Options;
use crate::renderer::{
    overlay_lines, CubeScene, ForestScene, FrameInputs, InstancedScene,
    TextOverlay,
};
use crate::util::frame_timing::FrameTiming;

/// Which demo to run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DemoKind {
    /// CPU-generated tree transforms in a storage buffer.
    #[default]
    Forest,
    /// GPU-generated cube transforms from a seed pool.
    Cubes,
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forest => write!(f, "forest"),
            Self::Cubes => write!(f, "cubes"),
        }
    }
}

impl FromStr for DemoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forest" | "trees" => Ok(Self::Forest),
            "cubes" => Ok(Self::Cubes),
            other => Err(format!(
                "unknown demo '{other}' (expected 'forest' or 'cubes')"
            )),
        }
    }
}

/// Apply an instance-count command. Returns the new count if `command`
/// changed it.
pub fn apply_count_command(
    count: &mut InstanceCount,
    command: DemoCommand,
) -> Option<u32> {
    let before = count.get();
    let after = match command {
        DemoCommand::IncreaseInstances => count.increase(),
        DemoCommand::DecreaseInstances => count.decrease(),
        DemoCommand::SetInstances { count: n } => {
            count.set(n);
            count.get()
        }
        _ => return None,
    };
    (after != before).then_some(after)
}

/// Everything needed to run one demo in a window.
pub struct DemoEngine {
    context: RenderContext,
    depth: DepthTexture,
    camera: CameraController,
    scene: Box<dyn InstancedScene>,
    overlay: TextOverlay,
    frame_timing: FrameTiming,
    input: InputProcessor,
    wireframe: bool,
    kind: DemoKind,
}

impl DemoEngine {
    /// Create the GPU context and build `kind`'s scene.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::Gpu`] if no adapter, device or surface is
    /// available and [`DemoError::Generator`] if the forest options are
    /// out of range.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        kind: DemoKind,
        options: &Options,
    ) -> Result<Self, DemoError> {
        let context = RenderContext::new(window, size).await?;
        let depth = DepthTexture::new(
            &context.device,
            context.width(),
            context.height(),
        );

        let view = match kind {
            DemoKind::Forest => options.forest.view,
            DemoKind::Cubes => options.cubes.view,
        };
        let camera = CameraController::new(
            &context,
            &options.camera,
            &view,
            &options.input,
        );

        let scene: Box<dyn InstancedScene> = match kind {
            DemoKind::Forest => Box::new(ForestScene::new(
                &context,
                &camera,
                &options.forest,
                &options.lighting,
            )?),
            DemoKind::Cubes => Box::new(CubeScene::new(
                &context,
                &camera,
                &options.cubes,
                &options.lighting,
            )),
        };
        log::info!(
            "{} demo: {} instances, {} vertices each",
            scene.name(),
            scene.count().get(),
            scene.vertices_per_instance(),
        );

        let overlay = TextOverlay::new(&context, &options.overlay);
        let input =
            InputProcessor::with_key_bindings(options.keybindings.clone());

        Ok(Self {
            context,
            depth,
            camera,
            scene,
            overlay,
            frame_timing: FrameTiming::new(),
            input,
            wireframe: false,
            kind,
        })
    }

    /// The running demo.
    #[must_use]
    pub fn kind(&self) -> DemoKind {
        self.kind
    }

    /// The active scene.
    #[must_use]
    pub fn scene(&self) -> &dyn InstancedScene {
        self.scene.as_ref()
    }

    /// Frames counted in the last full second.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.frame_timing.fps()
    }

    /// Carry out an engine-level command. Window-level commands are left
    /// to the caller and ignored here.
    pub fn execute(&mut self, command: DemoCommand) {
        match command {
            DemoCommand::RotateScene { delta } => self.camera.rotate(delta),
            DemoCommand::PanScene { delta } => self.camera.pan(delta),
            DemoCommand::Zoom { delta } => self.camera.zoom(delta),
            DemoCommand::ResetView => self.camera.reset(),
            DemoCommand::SetWireframe(on) => self.set_wireframe(on),
            DemoCommand::IncreaseInstances
            | DemoCommand::DecreaseInstances
            | DemoCommand::SetInstances { .. } => {
                if let Some(n) =
                    apply_count_command(self.scene.count_mut(), command)
                {
                    log::info!("{}: instance count -> {n}", self.scene.name());
                }
            }
            DemoCommand::Fullscreen
            | DemoCommand::Windowed
            | DemoCommand::Quit => {
                log::debug!("window command {command:?} reached the engine");
            }
        }
    }

    fn set_wireframe(&mut self, on: bool) {
        if on && !self.context.supports_wireframe() {
            log::warn!("wireframe requested but not supported by adapter");
            return;
        }
        self.wireframe = on;
    }

    /// Feed a raw input event through the input processor. Engine-level
    /// commands are executed; a window-level command is returned.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<DemoCommand> {
        let command = self.input.handle_event(event)?;
        self.dispatch(command)
    }

    /// Look up a physical key (`KeyCode` debug string) in the bindings.
    /// Engine-level commands are executed; a window-level command is
    /// returned.
    pub fn handle_key_press(&mut self, key: &str) -> Option<DemoCommand> {
        let command = self.input.handle_key_press(key)?;
        self.dispatch(command)
    }

    fn dispatch(&mut self, command: DemoCommand) -> Option<DemoCommand> {
        if command.is_window_command() {
            return Some(command);
        }
        self.execute(command);
        None
    }

    /// Resize the surface, depth buffer, projection and text area.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        log::debug!("resize to {width}x{height}");
        self.context.resize(width, height);
        self.depth = DepthTexture::new(&self.context.device, width, height);
        self.camera.resize(width, height);
        self.overlay.resize(width, height);
    }

    /// Render one frame: update uniforms, run the scene's compute work,
    /// draw all instances, then the HUD.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the next swapchain texture cannot
    /// be acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.camera.update_gpu(&self.context.queue);
        self.scene.prepare(&FrameInputs {
            context: &self.context,
            time: self.frame_timing.elapsed_secs(),
        });

        let text = overlay_lines(
            self.scene.name(),
            self.scene.stats(),
            self.frame_timing.fps(),
        );
        self.overlay.set_text(&text);
        let overlay_ready = match self.overlay.prepare(&self.context) {
            Ok(()) => true,
            Err(e) => {
                log::error!("text overlay prepare failed: {e}");
                false
            }
        };

        let mut encoder = self.context.create_encoder();
        self.scene
            .encode_compute(&mut encoder, self.camera.bind_group());

        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Scene Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(
                                    self.scene.clear_color(),
                                ),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            self.scene.draw(
                &mut pass,
                self.camera.bind_group(),
                self.wireframe,
            );
        }

        if overlay_ready {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: None,
                    ..Default::default()
                });
            if let Err(e) = self.overlay.render(&mut pass) {
                log::error!("text overlay render failed: {e}");
            }
        }

        self.context.submit(encoder);
        frame.present();
        self.overlay.trim();

        if let Some(fps) = self.frame_timing.end_frame() {
            log::debug!("{fps} fps");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instancing::CountLimits;

    fn limits() -> CountLimits {
        CountLimits {
            step: 100,
            floor: 100,
            ceiling: 1000,
        }
    }

    #[test]
    fn demo_kind_parses_case_insensitively() {
        assert_eq!("Forest".parse::<DemoKind>(), Ok(DemoKind::Forest));
        assert_eq!("cubes".parse::<DemoKind>(), Ok(DemoKind::Cubes));
        assert!("teapots".parse::<DemoKind>().is_err());
        assert_eq!(DemoKind::Cubes.to_string(), "cubes");
    }

    #[test]
    fn count_commands_step_and_clamp() {
        let mut count = InstanceCount::new(950, limits());
        let _ = count.take_dirty();

        assert_eq!(
            apply_count_command(&mut count, DemoCommand::IncreaseInstances),
            Some(1000)
        );
        assert!(count.is_dirty());
        let _ = count.take_dirty();

        // Already at the ceiling: nothing changes.
        assert_eq!(
            apply_count_command(&mut count, DemoCommand::IncreaseInstances),
            None
        );

        assert_eq!(
            apply_count_command(
                &mut count,
                DemoCommand::SetInstances { count: 150 }
            ),
            Some(150)
        );
        assert_eq!(
            apply_count_command(&mut count, DemoCommand::DecreaseInstances),
            Some(100)
        );
    }

    #[test]
    fn non_count_commands_are_ignored() {
        let mut count = InstanceCount::new(500, limits());
        assert_eq!(
            apply_count_command(&mut count, DemoCommand::SetWireframe(true)),
            None
        );
        assert_eq!(count.get(), 500);
    }
}
