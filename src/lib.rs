//! Cutsim - Adaptive octree stock model for machining simulation
//!
//! Stock starts as a solid cube. Cutter volumes are subtracted from it, the
//! octree refines only along the cut surfaces, and the remaining material is
//! triangulated with marching cubes.

pub mod core;
pub mod math;
pub mod mesh;
pub mod octree;
pub mod volume;

pub use crate::core::{Error, Result};
pub use crate::math::{Aabb, Triangle};
pub use crate::octree::{NodeId, Octnode, Octree, OctreeConfig, OctreeStats};
pub use crate::volume::{Containment, Volume};
