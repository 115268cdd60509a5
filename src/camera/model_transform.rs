use glam::{Mat4, Vec2, Vec3};

/// Rotation and translation applied to the whole scene by mouse drags.
///
/// Spins are in degrees. The matrix rotates about X first, then Y, then
/// translates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelTransform {
    /// Rotation about the X axis, degrees.
    pub spin_x: f32,
    /// Rotation about the Y axis, degrees.
    pub spin_y: f32,
    /// Scene offset.
    pub position: Vec3,
}

impl ModelTransform {
    /// Horizontal drag spins about Y, vertical drag about X.
    pub fn rotate(&mut self, delta: Vec2, degrees_per_pixel: f32) {
        self.spin_x += degrees_per_pixel * delta.y;
        self.spin_y += degrees_per_pixel * delta.x;
    }

    /// Move in the screen plane; dragging up moves the scene up.
    pub fn pan(&mut self, delta: Vec2, units_per_pixel: f32) {
        self.position.x += units_per_pixel * delta.x;
        self.position.y -= units_per_pixel * delta.y;
    }

    /// Move one fixed `step` along Z per wheel event, toward the viewer for
    /// positive deltas. Zero deltas are ignored.
    pub fn zoom(&mut self, delta: f32, step: f32) {
        if delta > 0.0 {
            self.position.z += step;
        } else if delta < 0.0 {
            self.position.z -= step;
        }
    }

    /// The combined scene matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        let rot_x = Mat4::from_rotation_x(self.spin_x.to_radians());
        let rot_y = Mat4::from_rotation_y(self.spin_y.to_radians());
        Mat4::from_translation(self.position) * rot_y * rot_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        assert_eq!(ModelTransform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn drag_maps_axes() {
        let mut t = ModelTransform::default();
        t.rotate(Vec2::new(10.0, -4.0), 0.5);
        assert_eq!(t.spin_y, 5.0);
        assert_eq!(t.spin_x, -2.0);

        t.pan(Vec2::new(100.0, 100.0), 0.01);
        assert_eq!(t.position.x, 1.0);
        assert_eq!(t.position.y, -1.0);
    }

    #[test]
    fn zoom_steps_ignore_magnitude() {
        let mut t = ModelTransform::default();
        t.zoom(0.1, 5.0);
        t.zoom(3.0, 5.0);
        assert_eq!(t.position.z, 10.0);
        t.zoom(-1.0, 5.0);
        t.zoom(0.0, 5.0);
        assert_eq!(t.position.z, 5.0);
    }

    #[test]
    fn quarter_turn_about_y_then_translate() {
        let t = ModelTransform {
            spin_x: 0.0,
            spin_y: 90.0,
            position: Vec3::new(0.0, 0.0, -5.0),
        };
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, -6.0)).length() < 1e-5);
    }

    #[test]
    fn scene_matrix_is_rigid() {
        let mut t = ModelTransform::default();
        t.rotate(Vec2::new(37.0, -81.0), 0.5);
        t.pan(Vec2::new(12.0, 40.0), 0.01);
        t.zoom(1.0, 5.0);
        let m = glam::Mat3::from_mat4(t.matrix());
        // Orthonormal: normals pass through without an inverse-transpose.
        let error = (m.transpose() * m - glam::Mat3::IDENTITY)
            .to_cols_array()
            .iter()
            .fold(0.0f32, |acc, v| acc.max(v.abs()));
        assert!(error < 1e-5);
    }
}
