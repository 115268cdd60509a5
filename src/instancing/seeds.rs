use std::f32::consts::PI;

use glam::{Vec3, Vec4};
use rand::Rng;

/// Exponent shaping the super-torus cross-section.
const SUPERTORUS_EXPONENT: f32 = 1.2;
/// Stretch applied to the cross-section before jittering.
const SPREAD: f32 = 80.0;

/// Uniform sample in `[-r, r]` (or `[r, -r]` for negative `r`).
fn signed<R: Rng + ?Sized>(rng: &mut R, r: f32) -> f32 {
    rng.random_range(-1.0f32..=1.0) * r
}

/// One point of the super-torus distribution.
///
/// A point on a squashed unit ring gives the half-extents of a box, and the
/// returned point is uniform inside that box.
pub fn supertorus_point<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let angle = signed(rng, PI);
    let radius = signed(rng, 1.0);
    let (sa, ca) = angle.sin_cos();
    let x = radius * ca.signum() * ca.abs().powf(SUPERTORUS_EXPONENT);
    let y = radius * sa.signum() * sa.abs().powf(SUPERTORUS_EXPONENT);

    Vec3::new(
        signed(rng, x * SPREAD),
        signed(rng, y),
        signed(rng, x + y * SPREAD),
    )
}

/// `count` seed points as `vec4` (w = 1) for a std430 storage buffer.
pub fn supertorus_points<R: Rng + ?Sized>(
    count: usize,
    rng: &mut R,
) -> Vec<Vec4> {
    (0..count)
        .map(|_| supertorus_point(rng).extend(1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn points_stay_inside_analytic_bounds() {
        let mut rng = StdRng::seed_from_u64(2024);
        for p in supertorus_points(20_000, &mut rng) {
            assert!(p.x.abs() <= SPREAD + 1e-3, "{p:?}");
            assert!(p.y.abs() <= 1.0 + 1e-6, "{p:?}");
            assert!(p.z.abs() <= SPREAD + 1.0 + 1e-3, "{p:?}");
            assert_eq!(p.w, 1.0);
        }
    }

    #[test]
    fn produces_requested_count() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(supertorus_points(0, &mut rng).is_empty());
        assert_eq!(supertorus_points(1234, &mut rng).len(), 1234);
    }

    #[test]
    fn cloud_is_spread_out() {
        let mut rng = StdRng::seed_from_u64(8);
        let pts = supertorus_points(5000, &mut rng);
        let max_x = pts.iter().map(|p| p.x.abs()).fold(0.0f32, f32::max);
        assert!(max_x > 10.0);
    }
}
