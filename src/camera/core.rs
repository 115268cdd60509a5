use glam::{Mat4, Vec3};

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix, the scene's mouse
/// transform and the eye position.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Mouse rotation/translation applied to every instance.
    pub model: [[f32; 4]; 4],
    /// Camera world-space position.
    pub eye: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
}

impl Camera {
    /// View matrix only.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix only.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity matrices.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0; 3],
            _pad: 0.0,
        }
    }

    /// Update uniform fields from the camera and the current scene
    /// transform.
    pub fn update(&mut self, camera: &Camera, model: Mat4) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.model = model.to_cols_array_2d();
        self.eye = camera.eye.to_array();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    fn forest_camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 100.0, 180.0),
            target: Vec3::new(0.0, 10.0, 0.0),
            up: Vec3::Y,
            aspect: 720.0 / 576.0,
            fovy: 45.0,
            znear: 0.05,
            zfar: 350.0,
        }
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let cam = forest_camera();
        let clip = cam.build_matrix() * cam.target.extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn point_behind_eye_is_clipped() {
        let cam = forest_camera();
        let behind = cam.eye + (cam.eye - cam.target);
        let clip = cam.build_matrix() * Vec4::from((behind, 1.0));
        assert!(clip.w < 0.0);
    }

    #[test]
    fn uniform_is_std140_sized() {
        assert_eq!(size_of::<CameraUniform>(), 144);
        let mut u = CameraUniform::new();
        u.update(&forest_camera(), Mat4::from_translation(Vec3::X));
        assert_eq!(u.model[3][0], 1.0);
        assert_eq!(u.eye, [0.0, 100.0, 180.0]);
    }
}
