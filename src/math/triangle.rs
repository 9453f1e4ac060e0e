//! Output triangle type

use bytemuck::{Pod, Zeroable};

use crate::core::types::Vec3;

/// A single triangle of an extracted surface.
///
/// `#[repr(C)]` and `Pod` so that a slice of triangles can be uploaded to a
/// vertex buffer without conversion (see [`triangles_as_bytes`]).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Triangle {
    pub p: [Vec3; 3],
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { p: [a, b, c] }
    }

    /// Unnormalized face normal, counter-clockwise winding
    pub fn cross(&self) -> Vec3 {
        (self.p[1] - self.p[0]).cross(self.p[2] - self.p[0])
    }

    /// Unit face normal, or zero for a degenerate triangle
    pub fn normal(&self) -> Vec3 {
        self.cross().normalize_or_zero()
    }

    pub fn area(&self) -> f32 {
        self.cross().length() * 0.5
    }
}

/// View a triangle list as raw bytes (nine native-endian f32 per triangle)
pub fn triangles_as_bytes(triangles: &[Triangle]) -> &[u8] {
    bytemuck::cast_slice(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        assert_eq!(std::mem::size_of::<Triangle>(), 36);
    }

    #[test]
    fn test_normal_and_area() {
        let t = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(t.normal(), Vec3::Z);
        assert!((t.area() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_as_bytes() {
        let tris = [Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y); 2];
        assert_eq!(triangles_as_bytes(&tris).len(), 72);
    }
}
