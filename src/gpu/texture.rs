//! Depth attachments and sampled image textures.

use std::path::Path;

/// Format used for every depth attachment.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A depth texture sized to the surface.
pub struct DepthTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    /// Create a depth texture with the given dimensions.
    #[must_use]
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rgba8Image {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed rows, 4 bytes per pixel.
    pub pixels: Vec<u8>,
}

impl Rgba8Image {
    /// Two-tone checkerboard, `cells` squares per side.
    #[must_use]
    pub fn checkerboard(size: u32, cells: u32) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let light = ((x / cell) + (y / cell)) % 2 == 0;
                let rgba = if light {
                    [196, 150, 92, 255]
                } else {
                    [120, 84, 46, 255]
                };
                pixels.extend_from_slice(&rgba);
            }
        }
        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    /// Decode an image file, or fall back to a checkerboard when it cannot
    /// be read.
    #[must_use]
    pub fn load_or_checkerboard(path: &Path) -> Self {
        match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                log::info!("loaded texture {} ({width}x{height})", path.display());
                Self {
                    width,
                    height,
                    pixels: rgba.into_raw(),
                }
            }
            Err(e) => {
                log::warn!(
                    "could not load texture {}: {e}; using checkerboard",
                    path.display()
                );
                Self::checkerboard(256, 8)
            }
        }
    }
}

/// A 2D RGBA texture with its view and sampler.
pub struct SampledTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Nearest-filter, repeating sampler.
    pub sampler: wgpu::Sampler,
}

impl SampledTexture {
    /// Upload `image` into a new sRGB texture.
    #[must_use]
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &Rgba8Image,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_cells() {
        let img = Rgba8Image::checkerboard(8, 2);
        assert_eq!(img.pixels.len(), 8 * 8 * 4);
        let px = |x: u32, y: u32| {
            let i = ((y * img.width + x) * 4) as usize;
            img.pixels[i]
        };
        assert_eq!(px(0, 0), px(3, 3));
        assert_ne!(px(0, 0), px(4, 0));
        assert_eq!(px(4, 0), px(0, 4));
    }

    #[test]
    fn missing_file_falls_back() {
        let img = Rgba8Image::load_or_checkerboard(Path::new(
            "definitely/not/here.bmp",
        ));
        assert_eq!((img.width, img.height), (256, 256));
    }
}
