//! HUD text: instance count, FPS and triangle totals drawn over the scene.

use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution,
    Shaping, SwashCache, TextArea, TextAtlas, TextBounds,
    TextRenderer as GlyphonRenderer, Viewport,
};
use wgpu::MultisampleState;

use crate::gpu::render_context::RenderContext;
use crate::options::OverlayOptions;

/// Figures shown in the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStats {
    /// Instances drawn this frame.
    pub instances: u32,
    /// Vertices submitted across all instances.
    pub vertices: u64,
    /// Triangles submitted across all instances.
    pub triangles: u64,
}

impl SceneStats {
    /// Totals for `instances` copies of a triangle-list mesh.
    #[must_use]
    pub fn new(instances: u32, vertices_per_instance: u32) -> Self {
        let vertices =
            u64::from(instances) * u64::from(vertices_per_instance);
        Self {
            instances,
            vertices,
            triangles: vertices / 3,
        }
    }
}

/// The two HUD lines for a scene.
#[must_use]
pub fn overlay_lines(name: &str, stats: SceneStats, fps: u32) -> String {
    format!(
        "{name}: {} instances, {fps} fps\n{} vertices, {} triangles",
        stats.instances, stats.vertices, stats.triangles,
    )
}

/// Screen-space text drawn after the scene with glyphon.
pub struct TextOverlay {
    font_system: FontSystem,
    swash_cache: SwashCache,
    atlas: TextAtlas,
    text_renderer: GlyphonRenderer,
    viewport: Viewport,
    buffer: Buffer,
    color: Color,
    margin: f32,
    enabled: bool,
    text: String,
}

impl TextOverlay {
    /// Set up the glyph atlas for the surface format.
    #[must_use]
    pub fn new(context: &RenderContext, options: &OverlayOptions) -> Self {
        let mut font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(&context.device);
        let mut atlas = TextAtlas::new(
            &context.device,
            &context.queue,
            &cache,
            context.format(),
        );
        let text_renderer = GlyphonRenderer::new(
            &mut atlas,
            &context.device,
            MultisampleState::default(),
            None,
        );
        let viewport = Viewport::new(&context.device, &cache);

        let mut buffer = Buffer::new(
            &mut font_system,
            Metrics::new(options.font_size, options.font_size * 1.25),
        );
        buffer.set_size(
            &mut font_system,
            Some(context.width() as f32),
            Some(context.height() as f32),
        );

        let [r, g, b, a] = options.color;
        Self {
            font_system,
            swash_cache,
            atlas,
            text_renderer,
            viewport,
            buffer,
            color: Color::rgba(r, g, b, a),
            margin: options.margin,
            enabled: options.enabled,
            text: String::new(),
        }
    }

    /// Replace the displayed text. Reshapes only when it changed.
    pub fn set_text(&mut self, text: &str) {
        if !self.enabled || self.text == text {
            return;
        }
        text.clone_into(&mut self.text);
        let attrs = Attrs::new().family(Family::SansSerif).color(self.color);
        self.buffer.set_text(
            &mut self.font_system,
            &self.text,
            &attrs,
            Shaping::Advanced,
            None,
        );
        self.buffer.shape_until_scroll(&mut self.font_system, false);
    }

    /// Match the layout area to the surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.buffer.set_size(
            &mut self.font_system,
            Some(width as f32),
            Some(height as f32),
        );
    }

    /// Upload glyphs for this frame.
    ///
    /// # Errors
    ///
    /// Returns [`glyphon::PrepareError`] if the atlas cannot grow.
    pub fn prepare(
        &mut self,
        context: &RenderContext,
    ) -> Result<(), glyphon::PrepareError> {
        if !self.enabled {
            return Ok(());
        }
        self.viewport.update(
            &context.queue,
            Resolution {
                width: context.width(),
                height: context.height(),
            },
        );
        self.text_renderer.prepare(
            &context.device,
            &context.queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            [TextArea {
                buffer: &self.buffer,
                left: self.margin,
                top: self.margin,
                scale: 1.0,
                bounds: TextBounds {
                    left: 0,
                    top: 0,
                    right: context.width() as i32,
                    bottom: context.height() as i32,
                },
                default_color: self.color,
                custom_glyphs: &[],
            }],
            &mut self.swash_cache,
        )
    }

    /// Draw the prepared text into `pass`.
    ///
    /// # Errors
    ///
    /// Returns [`glyphon::RenderError`] if prepared glyphs were evicted.
    pub fn render<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
    ) -> Result<(), glyphon::RenderError> {
        if !self.enabled {
            return Ok(());
        }
        self.text_renderer.render(&self.atlas, &self.viewport, pass)
    }

    /// Drop glyphs not used since the last frame.
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_every_instance() {
        let stats = SceneStats::new(1000, 36);
        assert_eq!(stats.vertices, 36_000);
        assert_eq!(stats.triangles, 12_000);
    }

    #[test]
    fn stats_do_not_overflow_at_ceiling() {
        let stats = SceneStats::new(1_000_000, 144);
        assert_eq!(stats.vertices, 144_000_000);
        let big = SceneStats::new(u32::MAX, u32::MAX);
        assert!(big.vertices > u64::from(u32::MAX));
    }

    #[test]
    fn overlay_has_two_lines() {
        let text = overlay_lines("Cubes", SceneStats::new(1000, 36), 60);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            ["Cubes: 1000 instances, 60 fps", "36000 vertices, 12000 triangles"]
        );
    }
}
