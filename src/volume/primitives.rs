//! Stock cutter and test shapes.
//!
//! Distances follow the usual SDF convention (negative inside). Sphere and box
//! override [`Volume::classify`] with exact cube tests; the cutter shapes are
//! convex and rely on the default corner test.

use crate::core::types::Vec3;
use crate::math::Aabb;

use super::{Containment, Volume};

/// Solid sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereVolume {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereVolume {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Volume for SphereVolume {
    fn bounding_box(&self) -> Aabb {
        Aabb::from_center_half_extent(self.center, Vec3::splat(self.radius))
    }

    fn dist(&self, p: Vec3) -> f32 {
        (p - self.center).length() - self.radius
    }

    fn classify(&self, cube: &Aabb) -> Containment {
        let nearest = cube.closest_point(self.center);
        if nearest.distance_squared(self.center) > self.radius * self.radius {
            return Containment::Outside;
        }
        // The point of a box furthest from any point is one of its corners
        let far = cube
            .corners()
            .iter()
            .map(|c| c.distance_squared(self.center))
            .fold(0.0_f32, f32::max);
        if far <= self.radius * self.radius {
            Containment::Inside
        } else {
            Containment::Boundary
        }
    }
}

/// Solid axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxVolume {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl BoxVolume {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    pub fn from_aabb(aabb: Aabb) -> Self {
        Self {
            center: aabb.center(),
            half_extents: aabb.half_extent(),
        }
    }
}

impl Volume for BoxVolume {
    fn bounding_box(&self) -> Aabb {
        Aabb::from_center_half_extent(self.center, self.half_extents)
    }

    fn dist(&self, p: Vec3) -> f32 {
        let q = (p - self.center).abs() - self.half_extents;
        q.max(Vec3::ZERO).length() + q.x.max(q.y.max(q.z)).min(0.0)
    }

    fn classify(&self, cube: &Aabb) -> Containment {
        let bb = self.bounding_box();
        if bb.contains_aabb(cube) {
            Containment::Inside
        } else if bb.overlaps_interior(cube) {
            Containment::Boundary
        } else {
            Containment::Outside
        }
    }
}

/// Flat end-mill: a cylinder along +Z whose flat bottom sits at `tip`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderVolume {
    pub tip: Vec3,
    pub radius: f32,
    pub length: f32,
}

impl CylinderVolume {
    pub fn new(tip: Vec3, radius: f32, length: f32) -> Self {
        Self { tip, radius, length }
    }
}

impl Volume for CylinderVolume {
    fn bounding_box(&self) -> Aabb {
        Aabb::new(
            self.tip - Vec3::new(self.radius, self.radius, 0.0),
            self.tip + Vec3::new(self.radius, self.radius, self.length),
        )
    }

    fn dist(&self, p: Vec3) -> f32 {
        let half_height = self.length * 0.5;
        let local = p - (self.tip + Vec3::Z * half_height);
        let d_radial = local.truncate().length() - self.radius;
        let d_height = local.z.abs() - half_height;
        let outside = Vec3::new(d_radial.max(0.0), d_height.max(0.0), 0.0).length();
        let inside = d_radial.max(d_height).min(0.0);
        outside + inside
    }
}

/// Ball-end cutter swept along a straight move from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleVolume {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl CapsuleVolume {
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }
}

impl Volume for CapsuleVolume {
    fn bounding_box(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::new(self.start.min(self.end) - r, self.start.max(self.end) + r)
    }

    fn dist(&self, p: Vec3) -> f32 {
        let ab = self.end - self.start;
        let ap = p - self.start;
        let len_sq = ab.length_squared();
        let t = if len_sq > 0.0 {
            (ap.dot(ab) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = self.start + ab * t;
        (p - closest).length() - self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_classify() {
        let s = SphereVolume::new(Vec3::ZERO, 2.0);
        assert_eq!(s.classify(&Aabb::cube(Vec3::ZERO, 1.0)), Containment::Inside);
        assert_eq!(s.classify(&Aabb::cube(Vec3::splat(5.0), 1.0)), Containment::Outside);
        assert_eq!(s.classify(&Aabb::cube(Vec3::ZERO, 2.0)), Containment::Boundary);
        // Bounding boxes overlap but the sphere misses the cube corner region
        assert_eq!(s.classify(&Aabb::cube(Vec3::splat(2.5), 1.0)), Containment::Outside);
    }

    #[test]
    fn test_box_classify_is_strict_on_touching_faces() {
        let b = BoxVolume::new(Vec3::ZERO, Vec3::splat(1.0));
        assert_eq!(b.classify(&Aabb::cube(Vec3::ZERO, 0.5)), Containment::Inside);
        assert_eq!(b.classify(&Aabb::cube(Vec3::new(2.0, 0.0, 0.0), 1.0)), Containment::Outside);
        assert_eq!(b.classify(&Aabb::cube(Vec3::new(1.0, 0.0, 0.0), 0.5)), Containment::Boundary);
    }

    #[test]
    fn test_box_dist() {
        let b = BoxVolume::new(Vec3::ZERO, Vec3::splat(1.0));
        assert!((b.dist(Vec3::new(3.0, 0.0, 0.0)) - 2.0).abs() < 1e-6);
        assert!((b.dist(Vec3::ZERO) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cylinder_dist_and_bounds() {
        let c = CylinderVolume::new(Vec3::ZERO, 1.0, 4.0);
        assert!(c.dist(Vec3::new(0.0, 0.0, 2.0)) < 0.0);
        assert!((c.dist(Vec3::new(0.0, 0.0, -1.0)) - 1.0).abs() < 1e-6);
        assert!((c.dist(Vec3::new(3.0, 0.0, 2.0)) - 2.0).abs() < 1e-6);
        let bb = c.bounding_box();
        assert_eq!(bb.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(bb.max, Vec3::new(1.0, 1.0, 4.0));
    }

    #[test]
    fn test_capsule_dist() {
        let c = CapsuleVolume::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), 1.0);
        assert!((c.dist(Vec3::new(2.0, 3.0, 0.0)) - 2.0).abs() < 1e-6);
        assert!((c.dist(Vec3::new(-2.0, 0.0, 0.0)) - 1.0).abs() < 1e-6);
        assert!(c.dist(Vec3::new(4.0, 0.5, 0.0)) < 0.0);
    }

    #[test]
    fn test_degenerate_capsule_is_a_sphere() {
        let c = CapsuleVolume::new(Vec3::ONE, Vec3::ONE, 1.0);
        let s = SphereVolume::new(Vec3::ONE, 1.0);
        let p = Vec3::new(3.0, 1.0, 1.0);
        assert!((c.dist(p) - s.dist(p)).abs() < 1e-6);
    }

    #[test]
    fn test_capsule_classify() {
        let c = CapsuleVolume::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0), 2.0);
        assert_eq!(c.classify(&Aabb::cube(Vec3::ZERO, 0.5)), Containment::Inside);
        assert_eq!(c.classify(&Aabb::cube(Vec3::new(0.0, 10.0, 0.0), 1.0)), Containment::Outside);
        assert_eq!(c.classify(&Aabb::cube(Vec3::new(0.0, 2.0, 0.0), 0.5)), Containment::Boundary);
    }
}
