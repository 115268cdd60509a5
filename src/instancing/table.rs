use glam::{Mat3, Mat4};
use rand::Rng;

use super::count::InstanceCount;
use super::generator::TransformGenerator;

/// Per-instance data for the storage buffer.
/// Must match the WGSL `Instance` struct layout (std430: `mat3x3` columns
/// are padded to 16 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model's upper 3x3, one padded column each.
    pub normal: [[f32; 4]; 3],
}

/// Matrix that keeps normals perpendicular to surfaces under `model`.
#[must_use]
pub fn normal_matrix(model: &Mat4) -> Mat3 {
    Mat3::from_mat4(*model).inverse().transpose()
}

impl From<&Mat4> for InstanceRaw {
    fn from(m: &Mat4) -> Self {
        let n = normal_matrix(m);
        Self {
            model: m.to_cols_array_2d(),
            normal: [n.x_axis, n.y_axis, n.z_axis]
                .map(|c| c.extend(0.0).to_array()),
        }
    }
}

/// Dense, ordered model matrices, one per rendered instance.
///
/// The length always equals the instance count the table was last
/// (re)generated for. Entries are only replaced wholesale.
pub struct InstanceTable {
    generator: TransformGenerator,
    transforms: Vec<Mat4>,
}

impl InstanceTable {
    /// Generate a table of `count` transforms.
    pub fn new<R: Rng + ?Sized>(
        generator: TransformGenerator,
        count: usize,
        rng: &mut R,
    ) -> Self {
        Self {
            transforms: generator.generate(count, rng),
            generator,
        }
    }

    /// Throw away every entry and sample `count` fresh ones.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        self.transforms = self.generator.generate(count, rng);
        log::debug!("instance table regenerated: {count} transforms");
    }

    /// Regenerate when `count` was changed to a length other than the
    /// table's. Returns the new length if the table was rebuilt.
    pub fn sync_to<R: Rng + ?Sized>(
        &mut self,
        count: &mut InstanceCount,
        rng: &mut R,
    ) -> Option<usize> {
        let len = count.take_resize(self.len())?;
        self.regenerate(len, rng);
        Some(len)
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the table holds no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// The transforms in draw order.
    #[must_use]
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    /// The generator this table samples from.
    #[must_use]
    pub fn generator(&self) -> &TransformGenerator {
        &self.generator
    }

    /// GPU-layout copy of the table.
    #[must_use]
    pub fn to_raw(&self) -> Vec<InstanceRaw> {
        self.transforms.iter().map(InstanceRaw::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::instancing::{CountLimits, Extent, ScaleMode, ScaleRange};

    fn table(count: usize, rng: &mut StdRng) -> InstanceTable {
        let gen = TransformGenerator::new(
            Extent::new(50.0).unwrap(),
            ScaleRange::new(0.5, 1.5).unwrap(),
        );
        InstanceTable::new(gen, count, rng)
    }

    #[test]
    fn regenerate_resizes_to_new_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut t = table(1000, &mut rng);
        assert_eq!(t.len(), 1000);

        t.regenerate(11_000, &mut rng);
        assert_eq!(t.len(), 11_000);

        t.regenerate(0, &mut rng);
        assert!(t.is_empty());
    }

    #[test]
    fn raw_layout_matches_matrix() {
        let mut rng = StdRng::seed_from_u64(5);
        let t = table(8, &mut rng);
        let raw = t.to_raw();
        assert_eq!(raw.len(), 8);
        assert_eq!(size_of::<InstanceRaw>(), 112);
        for (r, m) in raw.iter().zip(t.transforms()) {
            assert_eq!(Mat4::from_cols_array_2d(&r.model), *m);
        }
    }

    #[test]
    fn sync_follows_the_dirty_count() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut t = table(0, &mut rng);
        let mut count = InstanceCount::new(2_000, CountLimits::default());

        assert_eq!(t.sync_to(&mut count, &mut rng), Some(2_000));
        assert_eq!(t.len(), 2_000);

        let before = t.transforms().to_vec();
        assert_eq!(t.sync_to(&mut count, &mut rng), None);
        assert_eq!(t.transforms(), before.as_slice());

        let _ = count.increase();
        assert_eq!(t.sync_to(&mut count, &mut rng), Some(12_000));
        assert_eq!(t.len(), 12_000);
    }

    #[test]
    fn sync_at_ceiling_keeps_layout() {
        let mut rng = StdRng::seed_from_u64(17);
        let limits = CountLimits {
            step: 10,
            floor: 10,
            ceiling: 50,
        };
        let mut count = InstanceCount::new(50, limits);
        let mut t = table(0, &mut rng);
        let _ = t.sync_to(&mut count, &mut rng);
        let before = t.transforms().to_vec();

        let _ = count.increase();
        assert_eq!(t.sync_to(&mut count, &mut rng), None);
        assert_eq!(t.transforms(), before.as_slice());
    }

    #[test]
    fn normals_stay_perpendicular_under_vertical_scale() {
        let mut rng = StdRng::seed_from_u64(19);
        let gen = TransformGenerator::new(
            Extent::new(10.0).unwrap(),
            ScaleRange::new(2.0, 3.0).unwrap(),
        )
        .with_mode(ScaleMode::Vertical);
        let t = InstanceTable::new(gen, 16, &mut rng);

        // A cone flank: tangent up the slope, normal facing out and up.
        let tangent = glam::Vec3::new(-1.0, 1.0, 0.0);
        let normal = glam::Vec3::new(1.0, 1.0, 0.0);
        for (raw, m) in t.to_raw().iter().zip(t.transforms()) {
            let n = Mat3::from_cols(
                glam::Vec4::from_array(raw.normal[0]).truncate(),
                glam::Vec4::from_array(raw.normal[1]).truncate(),
                glam::Vec4::from_array(raw.normal[2]).truncate(),
            );
            let world_n = n * normal;
            let world_t = m.transform_vector3(tangent);
            assert!(world_n.dot(world_t).abs() < 1e-4);
            // The plain model matrix would skew it.
            assert!(m.transform_vector3(normal).dot(world_t).abs() > 1e-2);
        }
    }

    #[test]
    fn regenerated_positions_stay_in_extent() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut t = table(10, &mut rng);
        t.regenerate(500, &mut rng);
        let extent = t.generator().extent();
        for m in t.transforms() {
            assert!(extent.contains(m.w_axis.truncate()));
        }
    }
}
