//! Per-cell surface extraction.
//!
//! Works on a single cube given its eight corner positions and the signed
//! distance of the remaining material at each corner (negative = material).
//! The octree calls these once per leaf and concatenates the results.

pub mod tables;

pub use tables::{CORNER_OFFSETS, EDGE_CONNECTIONS, EDGE_TABLE, TRI_TABLE};

use crate::core::types::Vec3;
use crate::math::Triangle;

/// Iso-level separating material (below) from empty space (above)
pub const ISO_LEVEL: f32 = 0.0;

/// Corner indices of the six cube faces, ordered -x, +x, -y, +y, -z, +z.
/// Each quad winds counter-clockwise seen from outside the cube.
pub const FACE_CORNERS: [[usize; 4]; 6] = [
    [0, 4, 7, 3],
    [1, 2, 6, 5],
    [0, 1, 5, 4],
    [3, 7, 6, 2],
    [0, 3, 2, 1],
    [4, 5, 6, 7],
];

#[inline]
fn is_material(value: f32) -> bool {
    value < ISO_LEVEL
}

/// Linear interpolation of the iso crossing between two corners
#[inline]
fn interpolate_vertex(p1: Vec3, p2: Vec3, v1: f32, v2: f32) -> Vec3 {
    let denom = v2 - v1;
    if denom.abs() < 1e-12 {
        return (p1 + p2) * 0.5;
    }
    let t = ((ISO_LEVEL - v1) / denom).clamp(0.0, 1.0);
    p1 + (p2 - p1) * t
}

/// Marching-cubes triangles for one cell, appended to `out`.
///
/// `corners` and `values` use the numbering of [`CORNER_OFFSETS`].
pub fn cell_triangles(corners: &[Vec3; 8], values: &[f32; 8], out: &mut Vec<Triangle>) {
    let mut cube_index = 0usize;
    for (i, v) in values.iter().enumerate() {
        if is_material(*v) {
            cube_index |= 1 << i;
        }
    }

    let edges = EDGE_TABLE[cube_index];
    if edges == 0 {
        return;
    }

    let mut edge_vertices = [Vec3::ZERO; 12];
    for (i, vertex) in edge_vertices.iter_mut().enumerate() {
        if edges & (1 << i) != 0 {
            let [e0, e1] = EDGE_CONNECTIONS[i];
            *vertex = interpolate_vertex(corners[e0], corners[e1], values[e0], values[e1]);
        }
    }

    for tri in TRI_TABLE[cube_index].chunks_exact(3) {
        if tri[0] < 0 {
            break;
        }
        out.push(Triangle::new(
            edge_vertices[tri[0] as usize],
            edge_vertices[tri[1] as usize],
            edge_vertices[tri[2] as usize],
        ));
    }
}

/// Triangles covering the material part of one face quad, appended to `out`.
///
/// The quad is clipped against the iso-level with linear interpolation along
/// its edges and the resulting convex polygon is fan-triangulated, keeping the
/// winding of the input quad.
pub fn face_triangles(quad: &[Vec3; 4], values: &[f32; 4], out: &mut Vec<Triangle>) {
    let mut polygon: Vec<Vec3> = Vec::with_capacity(8);
    for i in 0..4 {
        let j = (i + 1) % 4;
        let (a, b) = (values[i], values[j]);
        if is_material(a) {
            polygon.push(quad[i]);
        }
        if is_material(a) != is_material(b) {
            polygon.push(interpolate_vertex(quad[i], quad[j], a, b));
        }
    }

    if polygon.len() < 3 {
        return;
    }
    for k in 1..polygon.len() - 1 {
        out.push(Triangle::new(polygon[0], polygon[k], polygon[k + 1]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> [Vec3; 8] {
        std::array::from_fn(|i| {
            let [x, y, z] = CORNER_OFFSETS[i];
            Vec3::new(x as f32, y as f32, z as f32)
        })
    }

    fn total_area(tris: &[Triangle]) -> f32 {
        tris.iter().map(Triangle::area).sum()
    }

    #[test]
    fn test_uniform_cells_produce_nothing() {
        let mut out = Vec::new();
        cell_triangles(&unit_cube(), &[-1.0; 8], &mut out);
        cell_triangles(&unit_cube(), &[1.0; 8], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_material_corner() {
        let mut values = [1.0; 8];
        values[0] = -1.0;
        let mut out = Vec::new();
        cell_triangles(&unit_cube(), &values, &mut out);

        assert_eq!(out.len(), 1);
        for p in out[0].p {
            // Each vertex sits halfway along an edge leaving corner 0
            assert!((p.length() - 0.5).abs() < 1e-6);
        }
        assert!((out[0].area() - 3.0_f32.sqrt() / 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_half_cell_plane() {
        // Material below z = 0.25
        let corners = unit_cube();
        let values: [f32; 8] = std::array::from_fn(|i| corners[i].z - 0.25);
        let mut out = Vec::new();
        cell_triangles(&corners, &values, &mut out);

        assert_eq!(out.len(), 2);
        assert!((total_area(&out) - 1.0).abs() < 1e-5);
        for t in &out {
            for p in t.p {
                assert!((p.z - 0.25).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_face_quads_wind_outward() {
        let corners = unit_cube();
        let outward = [-Vec3::X, Vec3::X, -Vec3::Y, Vec3::Y, -Vec3::Z, Vec3::Z];
        for (face, normal) in FACE_CORNERS.iter().zip(outward) {
            let quad = face.map(|i| corners[i]);
            let mut out = Vec::new();
            face_triangles(&quad, &[-1.0; 4], &mut out);
            assert_eq!(out.len(), 2);
            assert!((total_area(&out) - 1.0).abs() < 1e-6);
            for t in &out {
                assert!((t.normal() - normal).length() < 1e-6);
            }
        }
    }

    #[test]
    fn test_face_clipping() {
        let quad = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
        let mut out = Vec::new();

        face_triangles(&quad, &[1.0; 4], &mut out);
        assert!(out.is_empty());

        face_triangles(&quad, &[-1.0, 1.0, 1.0, -1.0], &mut out);
        assert_eq!(out.len(), 2);
        assert!((total_area(&out) - 0.5).abs() < 1e-6);

        out.clear();
        face_triangles(&quad, &[-1.0, 1.0, 1.0, 1.0], &mut out);
        assert_eq!(out.len(), 1);
        assert!((total_area(&out) - 0.125).abs() < 1e-6);
    }
}
