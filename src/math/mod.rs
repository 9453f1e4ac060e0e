//! Geometry primitives

pub mod aabb;
pub mod triangle;

pub use aabb::Aabb;
pub use triangle::{Triangle, triangles_as_bytes};
