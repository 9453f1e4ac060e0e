//! Stock octree container and CSG subtraction.
//!
//! The tree starts as a single solid cube. Subtracting a volume descends only
//! into cells whose bounding box overlaps the volume, deletes cells that end
//! up entirely inside it, and subdivides boundary cells until `max_depth`.
//! The remaining leaves are triangulated cell by cell.

use log::{debug, info, trace, warn};

use crate::core::types::Vec3;
use crate::core::{Error, Result};
use crate::math::Triangle;
use crate::volume::Volume;

use super::config::{validate_dimensions, OctreeConfig};
use super::node::{NodeId, Octnode};

/// Adaptive octree over a cubic block of stock
#[derive(Debug, Clone)]
pub struct Octree {
    /// Node arena; freed slots are `None` and recycled through `free`
    nodes: Vec<Option<Octnode>>,
    free: Vec<u32>,
    /// Half-width of the root cube
    root_scale: f32,
    /// Maximum tree depth (affects minimum cell size)
    max_depth: u8,
}

impl Octree {
    /// Create a tree holding a single solid root cube.
    ///
    /// Fails with [`Error::InvalidConfiguration`] for a non-positive or
    /// non-finite scale, a zero depth, or a depth above
    /// [`MAX_SUPPORTED_DEPTH`](super::config::MAX_SUPPORTED_DEPTH).
    pub fn new(root_scale: f32, max_depth: u8, center: Vec3) -> Result<Self> {
        validate_dimensions(root_scale, max_depth)?;
        if !center.is_finite() {
            return Err(Error::config(format!("center {} is not finite", center)));
        }
        info!(
            "Octree: scale {} depth {} center {} (leaf width {})",
            root_scale,
            max_depth,
            center,
            2.0 * root_scale / (1u32 << max_depth) as f32
        );
        Ok(Self {
            nodes: vec![Some(Octnode::root(center, root_scale))],
            free: Vec::new(),
            root_scale,
            max_depth,
        })
    }

    /// Build from a config and apply its uniform pre-refinement
    pub fn from_config(config: &OctreeConfig) -> Result<Self> {
        config.validate()?;
        let mut octree = Self::new(config.root_scale, config.max_depth, config.center())?;
        octree.init(u32::from(config.init_depth))?;
        Ok(octree)
    }

    /// Root node id
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get node by id
    ///
    /// # Panics
    /// If `id` does not refer to a live node.
    pub fn node(&self, id: NodeId) -> &Octnode {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale octree node id {:?}", id),
        }
    }

    /// Get node by id, `None` if the slot was freed
    pub fn get(&self, id: NodeId) -> Option<&Octnode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn slot(&self, id: NodeId) -> Result<&Octnode> {
        self.get(id)
            .ok_or_else(|| Error::inconsistency(format!("node {:?} is not live", id)))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Octnode> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::inconsistency(format!("node {:?} is not live", id)))
    }

    /// Get maximum depth
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Half-width of the root cube
    pub fn root_scale(&self) -> f32 {
        self.root_scale
    }

    /// Width of a cell at maximum depth
    pub fn leaf_scale(&self) -> f32 {
        (2.0 * self.root_scale) / (1u32 << self.max_depth) as f32
    }

    pub fn center(&self) -> Vec3 {
        self.node(NodeId::ROOT).center
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// True once all material has been removed: the root is a leaf lying
    /// entirely inside a subtracted volume.
    pub fn is_empty(&self) -> bool {
        let root = self.node(NodeId::ROOT);
        root.is_leaf() && root.inside
    }

    fn alloc(&mut self, node: Octnode) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.nodes[index as usize] = Some(node);
                NodeId(index)
            }
            None => {
                let index = self.nodes.len() as u32;
                self.nodes.push(Some(node));
                NodeId(index)
            }
        }
    }

    /// Release a node and everything below it
    fn free_subtree(&mut self, id: NodeId) {
        let mut to_free = vec![id];
        while let Some(current) = to_free.pop() {
            if let Some(node) = self.nodes.get_mut(current.index()).and_then(Option::take) {
                to_free.extend(node.child.iter().flatten());
                self.free.push(current.0);
            }
        }
    }

    /// Replace a leaf with eight children
    fn subdivide(&mut self, id: NodeId) -> Result<()> {
        let node = self.slot(id)?;
        if !node.is_leaf() {
            return Err(Error::inconsistency(format!(
                "subdivide of non-leaf {:?} with {} children",
                id, node.childcount
            )));
        }
        if node.depth >= self.max_depth {
            return Err(Error::inconsistency(format!(
                "subdivide of {:?} at depth {} (max {})",
                id, node.depth, self.max_depth
            )));
        }

        let children: [Octnode; 8] = std::array::from_fn(|m| node.make_child(id, m as u8));
        let mut ids = [None; 8];
        for (slot, child) in ids.iter_mut().zip(children) {
            *slot = Some(self.alloc(child));
        }

        let node = self.slot_mut(id)?;
        node.child = ids;
        node.childcount = 8;
        trace!("subdivided {:?} at depth {}", id, node.depth);
        Ok(())
    }

    /// Uniformly refine the tree: `n` passes of subdividing every leaf.
    ///
    /// The leaf count grows eightfold per pass. Fails without touching the
    /// tree if any leaf would end up deeper than `max_depth`. A fully consumed
    /// root is left as it is.
    pub fn init(&mut self, n: u32) -> Result<()> {
        if n == 0 || self.is_empty() {
            return Ok(());
        }
        let deepest = self
            .leaf_nodes()
            .iter()
            .map(|id| self.node(*id).depth)
            .max()
            .unwrap_or(0);
        if u32::from(deepest) + n > u32::from(self.max_depth) {
            return Err(Error::config(format!(
                "{} refinement passes from depth {} exceed max_depth {}",
                n, deepest, self.max_depth
            )));
        }

        for pass in 0..n {
            let leaves = self.leaf_nodes();
            for id in &leaves {
                self.subdivide(*id)?;
            }
            debug!("init pass {}: subdivided {} leaves", pass + 1, leaves.len());
        }
        Ok(())
    }

    /// All leaves, depth-first with children in index order
    pub fn leaf_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_leaf_nodes(NodeId::ROOT, &mut out);
        out
    }

    fn collect_leaf_nodes(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.get(id) else { return };
        if node.is_leaf() {
            out.push(id);
        } else {
            for child in node.child.iter().flatten() {
                self.collect_leaf_nodes(*child, out);
            }
        }
    }

    /// All nodes, depth-first pre-order with children in index order
    pub fn all_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.node_count());
        self.collect_all_nodes(NodeId::ROOT, &mut out);
        out
    }

    fn collect_all_nodes(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.get(id) else { return };
        out.push(id);
        for child in node.child.iter().flatten() {
            self.collect_all_nodes(*child, out);
        }
    }

    /// Marching-cubes isosurface of the remaining material
    pub fn mc(&self) -> Vec<Triangle> {
        let leaves = self.leaf_nodes();
        let triangles: Vec<Triangle> = leaves
            .iter()
            .flat_map(|id| self.node(*id).mc_triangles())
            .collect();
        debug!("mc: {} triangles from {} leaves", triangles.len(), leaves.len());
        triangles
    }

    /// Triangles covering the remaining material on the outer faces of the stock
    pub fn side_triangles(&self) -> Vec<Triangle> {
        let leaves = self.leaf_nodes();
        let triangles: Vec<Triangle> = leaves
            .iter()
            .flat_map(|id| self.node(*id).side_triangles())
            .collect();
        debug!("side_triangles: {} triangles from {} leaves", triangles.len(), leaves.len());
        triangles
    }

    /// Subtract `vol` from the stock.
    ///
    /// A volume that misses the root cube, or a tree with no material left,
    /// is a no-op. On [`Error::InternalInconsistency`] the operation stops
    /// part way and the tree contents are unspecified.
    pub fn diff_negative_root(&mut self, vol: &dyn Volume) -> Result<()> {
        if self.is_empty() {
            debug!("diff: stock already consumed");
            return Ok(());
        }
        let vol_bb = vol.bounding_box();
        if !vol_bb.intersects(&self.node(NodeId::ROOT).bb) {
            debug!("diff: volume {:?} misses the stock", vol_bb);
            return Ok(());
        }

        let before = self.node_count();
        self.diff_negative(NodeId::ROOT, vol)?;
        debug!(
            "diff: {:?} -> nodes {} -> {}",
            vol_bb,
            before,
            self.node_count()
        );
        Ok(())
    }

    fn diff_negative(&mut self, id: NodeId, vol: &dyn Volume) -> Result<()> {
        self.slot_mut(id)?.evaluate(vol);

        let node = self.slot(id)?;
        if node.is_leaf() {
            if node.inside {
                return self.remove_consumed(id);
            }
            if node.outside {
                return Ok(());
            }
            if node.depth >= self.max_depth {
                // Resolution limit: stays a boundary leaf
                return Ok(());
            }
            self.subdivide(id)?;
        }

        let vol_bb = vol.bounding_box();
        for m in 0..8 {
            let Some(child) = self.slot(id)?.child[m] else { continue };
            if vol_bb.intersects(&self.slot(child)?.bb) {
                self.diff_negative(child, vol)?;
            }
        }

        if self.slot(id)?.is_leaf() {
            // Every child was consumed, by this volume alone or together with
            // earlier cuts, so this cube must be as well
            let node = self.slot_mut(id)?;
            node.evaluate(vol);
            if !node.inside {
                if !node.is_cleared() {
                    return Err(Error::inconsistency(format!(
                        "{:?} at depth {} lost all children but still holds material (f = {:?})",
                        id, node.depth, node.f
                    )));
                }
                node.inside = true;
                node.outside = false;
            }
            return self.remove_consumed(id);
        }
        Ok(())
    }

    /// Delete a leaf that lies inside the subtracted volume.
    ///
    /// The root has no owner to be removed from; it stays behind as a leaf
    /// flagged `inside`, which marks the tree as empty.
    fn remove_consumed(&mut self, id: NodeId) -> Result<()> {
        let node = self.slot(id)?;
        debug_assert!(node.is_leaf() && node.inside);
        let Some(parent_id) = node.parent else {
            warn!("stock fully consumed, octree is now empty");
            return Ok(());
        };
        let idx = usize::from(node.idx);

        let parent = self.slot_mut(parent_id)?;
        if parent.child.get(idx).copied().flatten() != Some(id) {
            return Err(Error::inconsistency(format!(
                "{:?} is not child {} of its parent {:?}",
                id, idx, parent_id
            )));
        }
        parent.child[idx] = None;
        parent.childcount = parent.childcount.checked_sub(1).ok_or_else(|| {
            Error::inconsistency(format!("childcount underflow in {:?}", parent_id))
        })?;
        debug_assert!(
            parent.childcount as usize == parent.child.iter().flatten().count(),
            "childcount out of sync"
        );

        self.free_subtree(id);
        trace!("deleted {:?} from {:?}", id, parent_id);
        Ok(())
    }
}
