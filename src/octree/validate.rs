//! Structural validation of the octree.
//!
//! Checks invariants that must hold after any sequence of operations:
//! - Child counts match the occupied child slots
//! - Parent and slot back-references agree with the owning node
//! - Depth and cube size follow from the parent
//! - Consumed cubes have been removed, except a consumed root
//! - Every live node is reachable from the root

use super::node::NodeId;
use super::octree::Octree;
use crate::core::{Error, Result};

const SCALE_TOLERANCE: f32 = 1e-4;

impl Octree {
    /// Walk the whole tree and report every broken invariant at once
    pub fn check_invariants(&self) -> Result<()> {
        let mut errors = Vec::new();

        let root = self.node(NodeId::ROOT);
        if root.parent.is_some() || root.depth != 0 {
            errors.push(format!(
                "root has parent {:?} and depth {}",
                root.parent, root.depth
            ));
        }

        let reachable = self.all_nodes();
        for &id in &reachable {
            let node = self.node(id);

            let occupied = node.child.iter().flatten().count();
            if usize::from(node.childcount) != occupied {
                errors.push(format!(
                    "{:?} has childcount {} but {} occupied slots",
                    id, node.childcount, occupied
                ));
            }

            if node.depth > self.max_depth() {
                errors.push(format!(
                    "{:?} at depth {} exceeds max_depth {}",
                    id,
                    node.depth,
                    self.max_depth()
                ));
            }

            let expected_scale = self.root_scale() / (1u32 << node.depth) as f32;
            if (node.scale - expected_scale).abs() > SCALE_TOLERANCE * self.root_scale() {
                errors.push(format!(
                    "{:?} has scale {} (expected {} at depth {})",
                    id, node.scale, expected_scale, node.depth
                ));
            }

            if node.inside && node.outside {
                errors.push(format!("{:?} is both inside and outside", id));
            }

            if node.is_leaf() && node.inside && id != NodeId::ROOT {
                errors.push(format!("consumed leaf {:?} was not removed", id));
            }

            for (m, child_id) in node.child.iter().enumerate() {
                let Some(child_id) = *child_id else { continue };
                let Some(child) = self.get(child_id) else {
                    errors.push(format!("{:?} slot {} points at freed {:?}", id, m, child_id));
                    continue;
                };
                if child.parent != Some(id) || usize::from(child.idx) != m {
                    errors.push(format!(
                        "{:?} in slot {} of {:?} records parent {:?} slot {}",
                        child_id, m, id, child.parent, child.idx
                    ));
                }
                if child.depth != node.depth + 1 {
                    errors.push(format!(
                        "{:?} at depth {} under {:?} at depth {}",
                        child_id, child.depth, id, node.depth
                    ));
                }
            }
        }

        if reachable.len() != self.node_count() {
            errors.push(format!(
                "{} nodes reachable from the root, {} live",
                reachable.len(),
                self.node_count()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::inconsistency(errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::volume::{CylinderVolume, SphereVolume};

    #[test]
    fn test_fresh_tree_is_valid() {
        let mut octree = Octree::new(10.0, 4, Vec3::ZERO).expect("valid octree");
        octree.check_invariants().expect("single root");
        octree.init(3).expect("init");
        octree.check_invariants().expect("refined");
    }

    #[test]
    fn test_valid_after_cuts_and_arena_reuse() {
        let mut octree = Octree::new(10.0, 5, Vec3::ZERO).expect("valid octree");
        octree
            .diff_negative_root(&SphereVolume::new(Vec3::new(0.0, 0.0, 10.0), 6.0))
            .expect("diff");
        let before = octree.node_count();

        // Plunge through freed space so the arena recycles slots
        octree
            .diff_negative_root(&CylinderVolume::new(Vec3::new(3.0, 3.0, -4.0), 2.5, 20.0))
            .expect("diff");
        octree.check_invariants().expect("invariants");
        assert_ne!(octree.node_count(), before);
    }
}
