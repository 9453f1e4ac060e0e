//! Adaptive octree stock model

pub mod config;
pub mod node;
pub mod octree;
pub mod report;
pub mod validate;

pub use config::{OctreeConfig, MAX_SUPPORTED_DEPTH};
pub use node::{NodeId, Octnode, FACE_NAMES};
pub use octree::Octree;
pub use report::OctreeStats;
