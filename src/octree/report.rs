//! Tree statistics and the text summary.

use std::fmt;

use serde::Serialize;

use super::octree::Octree;

/// Snapshot of the tree shape, written by the demo as JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OctreeStats {
    pub node_count: usize,
    pub leaf_count: usize,
    /// Leaf count indexed by depth, `max_depth + 1` entries
    pub leaves_per_depth: Vec<usize>,
    /// Leaves at maximum depth that still cross a cut surface
    pub undetermined_at_max_depth: usize,
    pub remaining_volume: f64,
    pub max_depth: u8,
    pub root_scale: f32,
}

impl Octree {
    /// Number of leaves at each depth `0..=max_depth`
    pub fn depth_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; usize::from(self.max_depth()) + 1];
        for id in self.leaf_nodes() {
            histogram[usize::from(self.node(id).depth)] += 1;
        }
        histogram
    }

    /// Leaves that were neither inside nor outside the last volume to reach them
    pub fn undetermined_leaf_count(&self) -> usize {
        self.leaf_nodes()
            .iter()
            .filter(|id| self.node(**id).is_undetermined())
            .count()
    }

    /// Total cube volume of the leaves still holding material.
    ///
    /// Boundary cells count in full, so this never drops below the exact
    /// remaining volume.
    pub fn remaining_volume(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.leaf_nodes()
            .iter()
            .map(|id| f64::from(self.node(*id).cube_volume()))
            .sum()
    }

    pub fn stats(&self) -> OctreeStats {
        let leaves = self.leaf_nodes();
        let max_depth = self.max_depth();
        OctreeStats {
            node_count: self.node_count(),
            leaf_count: leaves.len(),
            leaves_per_depth: self.depth_histogram(),
            undetermined_at_max_depth: leaves
                .iter()
                .map(|id| self.node(*id))
                .filter(|n| n.depth == max_depth && n.is_undetermined())
                .count(),
            remaining_volume: self.remaining_volume(),
            max_depth,
            root_scale: self.root_scale(),
        }
    }
}

impl fmt::Display for Octree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let histogram = self.depth_histogram();
        writeln!(f, "Octree:")?;
        writeln!(f, "  {} leaf-nodes:", histogram.iter().sum::<usize>())?;
        for (depth, count) in histogram.iter().enumerate() {
            writeln!(f, "  depth={} has {} nodes", depth, count)?;
        }
        Ok(())
    }
}
