use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 0.05,
            zfar: 350.0,
        }
    }
}

/// Where a demo's camera sits and what it looks at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewOptions {
    /// Eye position in world space.
    pub eye: [f32; 3],
    /// Look-at target.
    pub target: [f32; 3],
}

impl ViewOptions {
    /// Overview of the forest from above and behind.
    #[must_use]
    pub const fn forest() -> Self {
        Self {
            eye: [0.0, 100.0, 180.0],
            target: [0.0, 10.0, 0.0],
        }
    }

    /// Straight-on view of the cube cloud.
    #[must_use]
    pub const fn cubes() -> Self {
        Self {
            eye: [0.0, 1.0, 220.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self::forest()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Mouse sensitivity.
pub struct InputOptions {
    /// Degrees of scene spin per dragged pixel.
    pub rotate_speed: f32,
    /// World units of scene translation per dragged pixel.
    pub pan_speed: f32,
    /// World units moved along Z per wheel notch.
    pub zoom_step: f32,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            rotate_speed: 0.5,
            pan_speed: 0.01,
            zoom_step: 5.0,
        }
    }
}
