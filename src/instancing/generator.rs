use std::fmt;

use glam::{Mat4, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Invalid generator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeneratorError {
    /// Extent was negative or not finite.
    InvalidExtent(f32),
    /// Scale range was non-positive, inverted or not finite.
    InvalidScaleRange {
        /// Requested lower bound.
        min: f32,
        /// Requested upper bound.
        max: f32,
    },
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidExtent(e) => {
                write!(f, "extent must be finite and >= 0, got {e}")
            }
            Self::InvalidScaleRange { min, max } => write!(
                f,
                "scale range must satisfy 0 < min <= max, got [{min}, {max}]"
            ),
        }
    }
}

impl std::error::Error for GeneratorError {}

/// Half-width of the square placement region on the XZ plane.
///
/// Positions are sampled from `[-extent, extent]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent(f32);

impl Extent {
    /// Validate and wrap a half-width.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidExtent`] for negative or non-finite
    /// values.
    pub fn new(half_width: f32) -> Result<Self, GeneratorError> {
        if half_width.is_finite() && half_width >= 0.0 {
            Ok(Self(half_width))
        } else {
            Err(GeneratorError::InvalidExtent(half_width))
        }
    }

    /// The half-width.
    #[must_use]
    pub fn half_width(self) -> f32 {
        self.0
    }

    /// Whether `p` lies inside the region (Y is ignored).
    #[must_use]
    pub fn contains(self, p: Vec3) -> bool {
        p.x.abs() <= self.0 && p.z.abs() <= self.0
    }
}

/// Strictly positive scale interval `[min, max)`; `min == max` pins the
/// scale to a single value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRange {
    min: f32,
    max: f32,
}

impl ScaleRange {
    /// Validate and build a scale range.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidScaleRange`] unless
    /// `0 < min <= max` and both bounds are finite.
    pub fn new(min: f32, max: f32) -> Result<Self, GeneratorError> {
        if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
            Ok(Self { min, max })
        } else {
            Err(GeneratorError::InvalidScaleRange { min, max })
        }
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub fn min(self) -> f32 {
        self.min
    }

    /// Upper bound (exclusive unless equal to `min`).
    #[must_use]
    pub fn max(self) -> f32 {
        self.max
    }

    fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> f32 {
        if self.min == self.max {
            self.min
        } else {
            rng.random_range(self.min..self.max)
        }
    }
}

/// Which axes the sampled scale factor applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Same factor on X, Y and Z.
    #[default]
    Uniform,
    /// Factor on Y only (trees grow taller, not wider).
    Vertical,
}

/// Order in which scale and translation are combined.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ComposeOrder {
    /// Scale about the local origin, then move into place (`T * S`).
    #[default]
    ScaleThenTranslate,
    /// Move into place, then scale about the world origin (`S * T`).
    TranslateThenScale,
}

/// One sampled instance before composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceSample {
    /// World-space position on the XZ plane (`y == 0`).
    pub position: Vec3,
    /// Positive scale factor.
    pub scale: f32,
}

/// Samples independent random transforms inside a square region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformGenerator {
    extent: Extent,
    scale: ScaleRange,
    mode: ScaleMode,
    order: ComposeOrder,
}

impl TransformGenerator {
    /// Generator with uniform scale, composed scale-then-translate.
    #[must_use]
    pub fn new(extent: Extent, scale: ScaleRange) -> Self {
        Self {
            extent,
            scale,
            mode: ScaleMode::default(),
            order: ComposeOrder::default(),
        }
    }

    /// Set which axes receive the scale factor.
    #[must_use]
    pub fn with_mode(mut self, mode: ScaleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the composition order.
    #[must_use]
    pub fn with_order(mut self, order: ComposeOrder) -> Self {
        self.order = order;
        self
    }

    /// Placement region.
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Scale interval.
    #[must_use]
    pub fn scale_range(&self) -> ScaleRange {
        self.scale
    }

    /// Draw one position and scale.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> InstanceSample {
        // Unit samples scaled afterwards: `-e..=e` overflows for e > MAX / 2.
        let e = self.extent.half_width();
        let x = rng.random_range(-1.0f32..=1.0) * e;
        let z = rng.random_range(-1.0f32..=1.0) * e;
        InstanceSample {
            position: Vec3::new(x, 0.0, z),
            scale: self.scale.sample(rng),
        }
    }

    /// Combine a sample into a model matrix.
    #[must_use]
    pub fn compose(&self, sample: InstanceSample) -> Mat4 {
        let scale = match self.mode {
            ScaleMode::Uniform => Mat4::from_scale(Vec3::splat(sample.scale)),
            ScaleMode::Vertical => {
                Mat4::from_scale(Vec3::new(1.0, sample.scale, 1.0))
            }
        };
        let translate = Mat4::from_translation(sample.position);
        match self.order {
            ComposeOrder::ScaleThenTranslate => translate * scale,
            ComposeOrder::TranslateThenScale => scale * translate,
        }
    }

    /// Generate `count` independent transforms.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Vec<Mat4> {
        (0..count).map(|_| self.compose(self.sample(rng))).collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn forest_generator() -> TransformGenerator {
        TransformGenerator::new(
            Extent::new(140.0).unwrap(),
            ScaleRange::new(0.5, 2.5).unwrap(),
        )
        .with_mode(ScaleMode::Vertical)
    }

    #[test]
    fn generates_exactly_n() {
        let mut rng = StdRng::seed_from_u64(7);
        let gen = forest_generator();
        assert_eq!(gen.generate(0, &mut rng).len(), 0);
        assert_eq!(gen.generate(1, &mut rng).len(), 1);
        assert_eq!(gen.generate(15_000, &mut rng).len(), 15_000);
    }

    #[test]
    fn samples_stay_inside_extent_with_positive_scale() {
        let mut rng = StdRng::seed_from_u64(42);
        let gen = forest_generator();
        for _ in 0..10_000 {
            let s = gen.sample(&mut rng);
            assert!(gen.extent().contains(s.position), "{:?}", s.position);
            assert_eq!(s.position.y, 0.0);
            assert!(s.scale > 0.0);
            assert!(s.scale >= 0.5 && s.scale < 2.5);
        }
    }

    #[test]
    fn scale_then_translate_keeps_translation_column() {
        let gen = forest_generator();
        let m = gen.compose(InstanceSample {
            position: Vec3::new(10.0, 0.0, -20.0),
            scale: 2.0,
        });
        assert_eq!(m.w_axis.truncate(), Vec3::new(10.0, 0.0, -20.0));
        // Vertical mode leaves X and Z unscaled.
        assert_eq!(m.x_axis.x, 1.0);
        assert_eq!(m.y_axis.y, 2.0);
        assert_eq!(m.z_axis.z, 1.0);
    }

    #[test]
    fn translate_then_scale_scales_the_offset() {
        let gen = TransformGenerator::new(
            Extent::new(10.0).unwrap(),
            ScaleRange::new(1.0, 3.0).unwrap(),
        )
        .with_order(ComposeOrder::TranslateThenScale);
        let m = gen.compose(InstanceSample {
            position: Vec3::new(1.0, 0.0, 2.0),
            scale: 3.0,
        });
        assert_eq!(m.w_axis.truncate(), Vec3::new(3.0, 0.0, 6.0));
        let p = m.transform_point3(Vec3::ONE);
        assert_eq!(p, Vec3::new(6.0, 3.0, 9.0));
    }

    #[test]
    fn zero_extent_places_everything_at_origin() {
        let mut rng = StdRng::seed_from_u64(1);
        let gen = TransformGenerator::new(
            Extent::new(0.0).unwrap(),
            ScaleRange::new(1.0, 1.0).unwrap(),
        );
        for m in gen.generate(16, &mut rng) {
            assert_eq!(m, Mat4::IDENTITY);
        }
    }

    #[test]
    fn huge_extent_still_generates() {
        let mut rng = StdRng::seed_from_u64(1);
        let extent = Extent::new(f32::MAX).unwrap();
        let gen = TransformGenerator::new(
            extent,
            ScaleRange::new(1.0, 2.0).unwrap(),
        );
        let table = gen.generate(4, &mut rng);
        assert_eq!(table.len(), 4);
        for m in table {
            assert!(m.w_axis.is_finite());
            assert!(extent.contains(m.w_axis.truncate()));
        }
    }

    #[test]
    fn same_seed_same_table() {
        let gen = forest_generator();
        let a = gen.generate(64, &mut StdRng::seed_from_u64(99));
        let b = gen.generate(64, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(Extent::new(-1.0).is_err());
        assert!(Extent::new(f32::NAN).is_err());
        assert!(ScaleRange::new(0.0, 1.0).is_err());
        assert!(ScaleRange::new(2.0, 1.0).is_err());
        assert!(ScaleRange::new(1.0, f32::INFINITY).is_err());
        assert_eq!(
            ScaleRange::new(-1.0, 1.0),
            Err(GeneratorError::InvalidScaleRange { min: -1.0, max: 1.0 })
        );
    }
}
