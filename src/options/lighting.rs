use serde::{Deserialize, Serialize};

/// Phong material and light parameters shared by both scenes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingOptions {
    /// Light position in world space.
    pub position: [f32; 3],
    /// Ambient light intensity.
    pub la: [f32; 3],
    /// Diffuse light intensity.
    pub ld: [f32; 3],
    /// Specular light intensity.
    pub ls: [f32; 3],
    /// Ambient reflectivity.
    pub ka: [f32; 3],
    /// Diffuse reflectivity.
    pub kd: [f32; 3],
    /// Specular reflectivity.
    pub ks: [f32; 3],
    /// Specular exponent.
    pub shininess: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            position: [2.0, 20.0, 2.0],
            la: [0.1; 3],
            ld: [1.0; 3],
            ls: [0.9; 3],
            ka: [0.1; 3],
            kd: [0.8; 3],
            ks: [1.0; 3],
            shininess: 1000.0,
        }
    }
}

/// GPU layout of [`LightingOptions`]; every vec3 padded to 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Light position, w unused.
    pub position: [f32; 4],
    /// Ambient intensity, w unused.
    pub la: [f32; 4],
    /// Diffuse intensity, w unused.
    pub ld: [f32; 4],
    /// Specular intensity, w unused.
    pub ls: [f32; 4],
    /// Ambient reflectivity, w unused.
    pub ka: [f32; 4],
    /// Diffuse reflectivity, w unused.
    pub kd: [f32; 4],
    /// Specular reflectivity, w holds the shininess exponent.
    pub ks_shininess: [f32; 4],
}

fn pad([x, y, z]: [f32; 3], w: f32) -> [f32; 4] {
    [x, y, z, w]
}

impl From<&LightingOptions> for LightingUniform {
    fn from(o: &LightingOptions) -> Self {
        Self {
            position: pad(o.position, 1.0),
            la: pad(o.la, 0.0),
            ld: pad(o.ld, 0.0),
            ls: pad(o.ls, 0.0),
            ka: pad(o.ka, 0.0),
            kd: pad(o.kd, 0.0),
            ks_shininess: pad(o.ks, o.shininess),
        }
    }
}
