//! Volumes that can be subtracted from the stock model.
//!
//! A volume is consumed through two queries only: an axis-aligned bounding
//! box for cheap rejection, and a classification of an octree cell against
//! the solid. Signed distance (negative inside) backs both the default
//! classification and the corner samples used for surface extraction.

pub mod primitives;

pub use primitives::{BoxVolume, CapsuleVolume, CylinderVolume, SphereVolume};

use crate::core::types::Vec3;
use crate::math::Aabb;

/// Result of classifying a cube against a volume
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Containment {
    /// The whole cube lies inside the volume
    Inside,
    /// The cube and the volume do not overlap
    Outside,
    /// The volume boundary passes through the cube, or the test could not
    /// decide. Cells in this state are refined further.
    Boundary,
}

/// A solid that can be subtracted from an octree.
///
/// Implementations must keep `classify` monotone: a cube whose eight octants
/// all classify as [`Containment::Inside`] must itself classify as `Inside`.
/// The octree relies on this when it re-evaluates a parent after pruning its
/// last child.
pub trait Volume {
    /// Bounding box of the solid
    fn bounding_box(&self) -> Aabb;

    /// Signed distance from `p` to the surface, negative inside.
    ///
    /// Only the sign needs to be exact; magnitudes are used to place
    /// isosurface vertices and to bound the default classification.
    fn dist(&self, p: Vec3) -> f32;

    /// Classify an axis-aligned cube against this volume.
    ///
    /// The default assumes a convex solid with a true distance field: a cube
    /// is inside when all eight corners are, and outside when its center is
    /// further from the surface than its half diagonal. Anything else is
    /// reported as a boundary cube, which costs refinement but never
    /// correctness.
    fn classify(&self, cube: &Aabb) -> Containment {
        if !self.bounding_box().intersects(cube) {
            return Containment::Outside;
        }
        if cube.corners().iter().all(|c| self.dist(*c) <= 0.0) {
            return Containment::Inside;
        }
        if self.dist(cube.center()) > cube.half_extent().length() {
            return Containment::Outside;
        }
        Containment::Boundary
    }
}

impl<V: Volume + ?Sized> Volume for &V {
    fn bounding_box(&self) -> Aabb {
        (**self).bounding_box()
    }

    fn dist(&self, p: Vec3) -> f32 {
        (**self).dist(p)
    }

    fn classify(&self, cube: &Aabb) -> Containment {
        (**self).classify(cube)
    }
}

impl<V: Volume + ?Sized> Volume for Box<V> {
    fn bounding_box(&self) -> Aabb {
        (**self).bounding_box()
    }

    fn dist(&self, p: Vec3) -> f32 {
        (**self).dist(p)
    }

    fn classify(&self, cube: &Aabb) -> Containment {
        (**self).classify(cube)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Half-space z <= 0, clipped to a finite box, using the default classify
    struct Slab;

    impl Volume for Slab {
        fn bounding_box(&self) -> Aabb {
            Aabb::new(Vec3::new(-100.0, -100.0, -100.0), Vec3::new(100.0, 100.0, 0.0))
        }

        fn dist(&self, p: Vec3) -> f32 {
            p.z
        }
    }

    #[test]
    fn test_default_classify() {
        let slab = Slab;
        assert_eq!(slab.classify(&Aabb::cube(Vec3::new(0.0, 0.0, -5.0), 1.0)), Containment::Inside);
        assert_eq!(slab.classify(&Aabb::cube(Vec3::new(0.0, 0.0, 5.0), 1.0)), Containment::Outside);
        assert_eq!(slab.classify(&Aabb::cube(Vec3::ZERO, 1.0)), Containment::Boundary);
    }

    #[test]
    fn test_default_classify_rejects_by_bounding_box() {
        let slab = Slab;
        assert_eq!(
            slab.classify(&Aabb::cube(Vec3::new(500.0, 0.0, -5.0), 1.0)),
            Containment::Outside
        );
    }

    #[test]
    fn test_reference_forwarding() {
        let boxed: Box<dyn Volume> = Box::new(Slab);
        assert_eq!(boxed.dist(Vec3::new(0.0, 0.0, 2.0)), 2.0);
        assert_eq!((&boxed).bounding_box(), Slab.bounding_box());
    }
}
