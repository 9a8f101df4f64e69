//! Spatial indexing over particle layouts.
//!
//! This module provides an R-tree based spatial index used to find
//! neighboring particles without comparing every pair.

mod rtree;

pub use rtree::SpatialIndex;
