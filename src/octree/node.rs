//! Octree node: one cube of the stock model.
//!
//! Nodes live in the [`Octree`](super::Octree) node arena and refer to each
//! other by [`NodeId`]. A parent owns its children; the `parent` back-reference
//! is only used to find and clear the owning slot when a node is deleted.

use crate::core::types::Vec3;
use crate::math::{Aabb, Triangle};
use crate::mesh::{self, CORNER_OFFSETS, FACE_CORNERS};
use crate::volume::{Containment, Volume};

/// Index of a node in the octree's node arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root always occupies the first arena slot and is never freed
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Relative slack on corner distances when deciding a cube is cleared
const CLEARED_TOLERANCE: f32 = 1e-5;

/// Cube faces in `surface` order
pub const FACE_NAMES: [&str; 6] = ["-x", "+x", "-y", "+y", "-z", "+z"];

/// A cube of the subdivided stock.
///
/// `f` holds the signed distance of the remaining material at the eight
/// corners (negative = material), numbered as in [`CORNER_OFFSETS`]. Children
/// are numbered by octant: bit 0 = +x, bit 1 = +y, bit 2 = +z.
#[derive(Clone, Debug)]
pub struct Octnode {
    /// Owning node, `None` for the root
    pub parent: Option<NodeId>,
    /// Slot of this node in the parent's `child` array
    pub idx: u8,
    /// Distance from the root
    pub depth: u8,
    pub center: Vec3,
    /// Half-width of the cube
    pub scale: f32,
    pub bb: Aabb,
    pub child: [Option<NodeId>; 8],
    /// Number of occupied `child` slots, 0 for a leaf
    pub childcount: u8,
    /// Set by the last evaluation: the cube lies entirely inside the volume
    pub inside: bool,
    /// Set by the last evaluation: the cube does not touch the volume
    pub outside: bool,
    /// Which faces lie on the outer boundary of the stock
    pub surface: [bool; 6],
    /// Material distance at each corner
    pub f: [f32; 8],
}

impl Octnode {
    /// The root cube: all six faces are stock boundary and every corner is
    /// inside material.
    pub fn root(center: Vec3, scale: f32) -> Self {
        Self {
            parent: None,
            idx: 0,
            depth: 0,
            center,
            scale,
            bb: Aabb::cube(center, scale),
            child: [None; 8],
            childcount: 0,
            inside: false,
            outside: false,
            surface: [true; 6],
            f: [-scale; 8],
        }
    }

    /// Build the child cube in octant `idx`, owned by `parent`.
    ///
    /// Boundary faces are inherited where the child shares them with this
    /// node, and corner distances are seeded by trilinear interpolation.
    pub fn make_child(&self, parent: NodeId, idx: u8) -> Self {
        debug_assert!(idx < 8);
        let bits = [idx & 1, (idx >> 1) & 1, (idx >> 2) & 1];
        let half = self.scale * 0.5;
        let sign = |b: u8| if b != 0 { 1.0 } else { -1.0 };
        let center = self.center + Vec3::new(sign(bits[0]), sign(bits[1]), sign(bits[2])) * half;

        let mut surface = [false; 6];
        for axis in 0..3 {
            surface[2 * axis] = self.surface[2 * axis] && bits[axis] == 0;
            surface[2 * axis + 1] = self.surface[2 * axis + 1] && bits[axis] == 1;
        }

        let mut child = Self {
            parent: Some(parent),
            idx,
            depth: self.depth + 1,
            center,
            scale: half,
            bb: Aabb::cube(center, half),
            child: [None; 8],
            childcount: 0,
            inside: false,
            outside: false,
            surface,
            f: [0.0; 8],
        };
        child.f = child.corners().map(|p| self.sample(p));
        child
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.childcount == 0
    }

    /// Neither inside nor outside after the last evaluation
    #[inline]
    pub fn is_undetermined(&self) -> bool {
        !self.inside && !self.outside
    }

    /// No corner of the accumulated field still holds material.
    ///
    /// Every cut folded into `f` counts here, not only the last one, so this
    /// is the test for a cube that several volumes consumed between them.
    /// Corners sitting exactly on a cut surface read as zero, give or take
    /// rounding, hence the small tolerance.
    pub fn is_cleared(&self) -> bool {
        let tolerance = CLEARED_TOLERANCE * self.scale;
        self.f.iter().all(|v| *v >= -tolerance)
    }

    /// Volume of the cube
    pub fn cube_volume(&self) -> f32 {
        let w = 2.0 * self.scale;
        w * w * w
    }

    /// Position of corner `i` (see [`CORNER_OFFSETS`])
    pub fn corner(&self, i: usize) -> Vec3 {
        let [x, y, z] = CORNER_OFFSETS[i];
        let offset = Vec3::new(x as f32, y as f32, z as f32) * 2.0 - Vec3::ONE;
        self.center + offset * self.scale
    }

    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| self.corner(i))
    }

    /// Trilinear interpolation of the corner distances at `p`
    pub fn sample(&self, p: Vec3) -> f32 {
        let u = ((p - self.bb.min) / (2.0 * self.scale)).clamp(Vec3::ZERO, Vec3::ONE);
        let mut value = 0.0;
        for (i, [x, y, z]) in CORNER_OFFSETS.iter().enumerate() {
            let wx = if *x == 1 { u.x } else { 1.0 - u.x };
            let wy = if *y == 1 { u.y } else { 1.0 - u.y };
            let wz = if *z == 1 { u.z } else { 1.0 - u.z };
            value += self.f[i] * wx * wy * wz;
        }
        value
    }

    /// Classify this cube against `vol` and fold the volume into the corner
    /// distances (CSG difference).
    pub fn evaluate(&mut self, vol: &dyn Volume) {
        let containment = vol.classify(&self.bb);
        self.inside = containment == Containment::Inside;
        self.outside = containment == Containment::Outside;

        let corners = self.corners();
        for (f, p) in self.f.iter_mut().zip(corners) {
            *f = f.max(-vol.dist(p));
        }
    }

    /// Isosurface triangles of this cell. Consumed cells have none.
    pub fn mc_triangles(&self) -> Vec<Triangle> {
        let mut tris = Vec::new();
        if !self.inside {
            mesh::cell_triangles(&self.corners(), &self.f, &mut tris);
        }
        tris
    }

    /// Triangles covering the material part of the faces that lie on the
    /// stock boundary.
    pub fn side_triangles(&self) -> Vec<Triangle> {
        let mut tris = Vec::new();
        if self.inside {
            return tris;
        }
        let corners = self.corners();
        for (face, on_boundary) in FACE_CORNERS.iter().zip(self.surface) {
            if on_boundary {
                let quad = face.map(|i| corners[i]);
                let values = face.map(|i| self.f[i]);
                mesh::face_triangles(&quad, &values, &mut tris);
            }
        }
        tris
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::{BoxVolume, SphereVolume};

    fn area(tris: &[Triangle]) -> f32 {
        tris.iter().map(Triangle::area).sum()
    }

    #[test]
    fn test_root() {
        let root = Octnode::root(Vec3::ZERO, 10.0);
        assert!(root.is_leaf());
        assert!(root.is_undetermined());
        assert_eq!(root.surface, [true; 6]);
        assert_eq!(root.bb.min, Vec3::splat(-10.0));
        assert_eq!(root.cube_volume(), 8000.0);
        assert!(root.f.iter().all(|v| *v < 0.0));
    }

    #[test]
    fn test_child_geometry() {
        let root = Octnode::root(Vec3::ZERO, 10.0);
        let child = root.make_child(NodeId::ROOT, 5); // +x, -y, +z

        assert_eq!(child.parent, Some(NodeId::ROOT));
        assert_eq!(child.idx, 5);
        assert_eq!(child.depth, 1);
        assert_eq!(child.scale, 5.0);
        assert_eq!(child.center, Vec3::new(5.0, -5.0, 5.0));
        assert_eq!(child.bb, root.bb.child_octant(5));
    }

    #[test]
    fn test_surface_inheritance() {
        let root = Octnode::root(Vec3::ZERO, 10.0);
        let c0 = root.make_child(NodeId::ROOT, 0);
        assert_eq!(c0.surface, [true, false, true, false, true, false]);
        let c7 = root.make_child(NodeId::ROOT, 7);
        assert_eq!(c7.surface, [false, true, false, true, false, true]);

        // The +x,+y,+z grandchild of the -x,-y,-z child touches no boundary
        let inner = c0.make_child(NodeId(1), 7);
        assert_eq!(inner.surface, [false; 6]);
    }

    #[test]
    fn test_interpolation_reproduces_linear_field() {
        let mut root = Octnode::root(Vec3::ZERO, 2.0);
        let field = |p: Vec3| 0.5 * p.x - p.y + 2.0 * p.z + 1.0;
        root.f = root.corners().map(field);

        for idx in 0..8 {
            let child = root.make_child(NodeId::ROOT, idx);
            for (value, p) in child.f.iter().zip(child.corners()) {
                assert!((value - field(p)).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_evaluate_sets_exclusive_flags() {
        let mut node = Octnode::root(Vec3::ZERO, 1.0);

        node.evaluate(&SphereVolume::new(Vec3::ZERO, 5.0));
        assert!(node.inside && !node.outside);
        assert!(node.f.iter().all(|v| *v > 0.0));

        node.evaluate(&SphereVolume::new(Vec3::splat(20.0), 1.0));
        assert!(!node.inside && node.outside);

        node.evaluate(&SphereVolume::new(Vec3::splat(1.0), 1.0));
        assert!(node.is_undetermined());
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let mut node = Octnode::root(Vec3::ZERO, 1.0);
        let sphere = SphereVolume::new(Vec3::ONE, 1.5);
        node.evaluate(&sphere);
        let once = node.f;
        node.evaluate(&sphere);
        assert_eq!(node.f, once);
    }

    #[test]
    fn test_cleared_by_accumulated_cuts() {
        let mut node = Octnode::root(Vec3::ZERO, 1.0);
        assert!(!node.is_cleared());

        // Two half-space boxes that only cover the cube together
        let left = BoxVolume::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 2.0));
        let right = BoxVolume::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 2.0));
        node.evaluate(&left);
        assert!(!node.inside && !node.is_cleared());
        node.evaluate(&right);
        assert!(!node.inside);
        assert!(node.is_cleared());
    }

    #[test]
    fn test_consumed_node_has_no_triangles() {
        let mut node = Octnode::root(Vec3::ZERO, 1.0);
        node.evaluate(&SphereVolume::new(Vec3::ZERO, 5.0));
        assert!(node.mc_triangles().is_empty());
        assert!(node.side_triangles().is_empty());
    }

    #[test]
    fn test_root_side_triangles_cover_the_cube() {
        let root = Octnode::root(Vec3::ZERO, 1.0);
        let tris = root.side_triangles();
        assert_eq!(tris.len(), 12);
        assert!((area(&tris) - 24.0).abs() < 1e-4);
        assert!(root.mc_triangles().is_empty());
    }

    #[test]
    fn test_corner_cut_produces_isosurface() {
        let mut node = Octnode::root(Vec3::ZERO, 1.0);
        node.evaluate(&SphereVolume::new(Vec3::ONE, 1.0));
        assert!(node.is_undetermined());

        let tris = node.mc_triangles();
        assert!(!tris.is_empty());
        for t in &tris {
            for p in t.p {
                assert!((p.distance(Vec3::ONE) - 1.0).abs() < 0.05);
            }
        }
        // Three faces lose a quarter disc each
        let sides = area(&node.side_triangles());
        assert!(sides < 24.0 && sides > 24.0 - 3.0);
    }
}
