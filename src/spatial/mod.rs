//! Spatial data structures
//!
//! This module contains spatial-related functionality including:
//! - Context vectors and predecessor-chain enumeration
//! - The raster dependency graph
//! - K-d trees keyed by context vectors
//! - Tile data structures and extraction

/// Context vectors built from predecessor chains
pub mod context;
/// Directed dependency graph over raster positions
pub mod graph;
/// K-dimensional search tree with range queries
pub mod kdtree;
/// Tile and raster data structures
pub mod tiles;

pub use graph::{Digraph, VertexId};
pub use kdtree::KdMap;
