use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::{MeshData, Vertex};

const TRUNK_COLOR: [f32; 3] = [0.45, 0.3, 0.15];
const LOWER_CANOPY_COLOR: [f32; 3] = [0.18, 0.5, 0.2];
const UPPER_CANOPY_COLOR: [f32; 3] = [0.24, 0.6, 0.26];

/// Push one flat-shaded triangle whose normal faces along `outward`.
fn push_triangle(
    mesh: &mut MeshData,
    corners: [(Vec3, Vec2); 3],
    outward: Vec3,
    color: [f32; 3],
) {
    let [a, mut b, mut c] = corners;
    let mut normal = (b.0 - a.0).cross(c.0 - a.0).normalize_or_zero();
    if normal.dot(outward) < 0.0 {
        std::mem::swap(&mut b, &mut c);
        normal = -normal;
    }
    for (p, uv) in [a, b, c] {
        mesh.vertices.push(Vertex {
            position: p.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
            color,
        });
    }
}

/// Axis-aligned cube centred on the origin with `half_size` half-extent.
///
/// Each face carries the full `[0, 1]` texture square.
#[must_use]
pub fn cube(half_size: f32) -> MeshData {
    // (normal, u, v) with u x v == normal so both triangles wind CCW.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (n, u, v) in FACES {
        let corner = |a: f32, b: f32| {
            let p = (n + u * a + v * b) * half_size;
            let uv = Vec2::new((a + 1.0) * 0.5, (1.0 - b) * 0.5);
            (p, uv)
        };
        let (c00, c10, c11, c01) = (
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        );
        push_triangle(&mut mesh, [c00, c10, c11], n, [1.0; 3]);
        push_triangle(&mut mesh, [c00, c11, c01], n, [1.0; 3]);
    }
    mesh
}

fn ring_point(radius: f32, y: f32, i: u32, segments: u32) -> Vec3 {
    let theta = TAU * i as f32 / segments as f32;
    Vec3::new(radius * theta.cos(), y, radius * theta.sin())
}

/// Open cylinder side wall between `y0` and `y1`.
fn cylinder(
    mesh: &mut MeshData,
    radius: f32,
    (y0, y1): (f32, f32),
    segments: u32,
    color: [f32; 3],
) {
    for i in 0..segments {
        let (a0, b0) = (
            ring_point(radius, y0, i, segments),
            ring_point(radius, y0, i + 1, segments),
        );
        let (a1, b1) = (
            ring_point(radius, y1, i, segments),
            ring_point(radius, y1, i + 1, segments),
        );
        let outward = ((a0 + b0) * 0.5).with_y(0.0);
        let uv = Vec2::ZERO;
        push_triangle(mesh, [(a0, uv), (b0, uv), (b1, uv)], outward, color);
        push_triangle(mesh, [(a0, uv), (b1, uv), (a1, uv)], outward, color);
    }
}

/// Cone with a closed base at `y0` and apex at `y1`.
fn cone(
    mesh: &mut MeshData,
    radius: f32,
    (y0, y1): (f32, f32),
    segments: u32,
    color: [f32; 3],
) {
    let apex = Vec3::new(0.0, y1, 0.0);
    let centre = Vec3::new(0.0, y0, 0.0);
    let uv = Vec2::ZERO;
    for i in 0..segments {
        let a = ring_point(radius, y0, i, segments);
        let b = ring_point(radius, y0, i + 1, segments);
        let outward = ((a + b) * 0.5 - centre) + Vec3::Y * radius;
        push_triangle(mesh, [(a, uv), (b, uv), (apex, uv)], outward, color);
        push_triangle(mesh, [(centre, uv), (b, uv), (a, uv)], Vec3::NEG_Y, color);
    }
}

/// Low-poly tree: a trunk topped by two stacked cones, base at `y = 0`.
#[must_use]
pub fn tree(segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut mesh = MeshData::default();
    cylinder(&mut mesh, 0.5, (0.0, 3.0), segments, TRUNK_COLOR);
    cone(&mut mesh, 3.0, (2.5, 8.0), segments, LOWER_CANOPY_COLOR);
    cone(&mut mesh, 2.2, (6.0, 11.0), segments, UPPER_CANOPY_COLOR);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_36_outward_facing_vertices() {
        let mesh = cube(0.2);
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(p.dot(n) > 0.0);
            assert!(p.abs().max_element() <= 0.2 + 1e-6);
            assert!(v.uv.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn cube_triangles_wind_counter_clockwise_from_outside() {
        let mesh = cube(1.0);
        for tri in mesh.vertices.chunks(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|v| Vec3::from_array(v.position));
            let n = Vec3::from_array(tri[0].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn tree_vertex_count_follows_segments() {
        // trunk: 2 tris/segment, each cone: 2 tris/segment
        assert_eq!(tree(8).vertex_count(), 3 * 6 * 8);
        assert_eq!(tree(1).vertex_count(), 3 * 6 * 3);
    }

    #[test]
    fn tree_sits_on_ground_plane() {
        let mesh = tree(12);
        let min_y = mesh
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::INFINITY, f32::min);
        let max_y = mesh
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min_y, 0.0);
        assert_eq!(max_y, 11.0);
    }
}
